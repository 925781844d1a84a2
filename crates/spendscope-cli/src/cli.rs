use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0usize, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|index| bytes[*index].is_ascii_digit());
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }
    Ok(IsoDate(value.to_string()))
}

pub fn parse_group_by(value: &str) -> Result<String, String> {
    match value {
        "day" | "week" | "month" => Ok(value.to_string()),
        _ => Err("group-by must be one of: day, week, month".to_string()),
    }
}

pub fn parse_week_start(value: &str) -> Result<String, String> {
    match value.to_ascii_lowercase().as_str() {
        "sunday" | "monday" => Ok(value.to_ascii_lowercase()),
        _ => Err("week-start must be one of: sunday, monday".to_string()),
    }
}

/// Extended help shown after `spendscope import create --help`.
pub const IMPORT_CREATE_AFTER_HELP: &str = "\
How import works:
  <path> is a CSV export with one header row. Headers are matched
  case-insensitively.

  Required headers:
    Date     YYYY-MM-DD, MM/DD/YYYY or YYYY/MM/DD
    Amount   negative = money out, positive = money in
             `$` and thousands separators are ignored

  Optional headers:
    Description   defaults to `Unknown`
    Category      `Group - Sub` or just `Group`; defaults to `<none>`
    Account
    Tags          comma separated

  Rows without a date or amount, or with an unreadable date, are skipped
  and reported. Everything else is stored as one file.

Example:
  Date,Description,Category,Account,Tags,Amount
  2026-03-02,Corner Market,Food - Groceries,Checking,weekly,-30.00
  2026-03-10,Employer,Income - Salary,Checking,,2500.00

What to do next:
  1. Run `spendscope import create <path>`.
  2. Run `spendscope drill <file-id>` to explore spending by category.
";

/// Extended help shown after `spendscope drill --help`.
pub const DRILL_AFTER_HELP: &str = "\
Navigation:
  Each --click names a node id visible in the current view:
    `Total`            return to the root
    `<Group>`          zoom into a group (or select it when it has no sub-categories)
    `<Group>.<Sub>`    select a sub-category
  Clicks apply in order. --back returns to the root afterwards.

Time frames:
  this_week, last_week, this_month, last_month, this_quarter,
  last_quarter, this_year, last_year, custom
  --from/--to imply `custom`. The default is `this_month`.
";

#[derive(Debug, Parser)]
#[command(
    name = "spendscope",
    version,
    about = "drill into spending by category from CSV exports",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage imported CSV files
    #[command(arg_required_else_help = true)]
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
    /// Show the category breakdown for a file and navigate it
    #[command(after_long_help = DRILL_AFTER_HELP)]
    Drill(DrillArgs),
    /// List categories with their exclusion state
    Categories(CategoriesArgs),
    /// Show spending over time, bucketed by day, week or month
    Trend(TrendArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImportCommand {
    /// Import a CSV export as a new file
    #[command(after_long_help = IMPORT_CREATE_AFTER_HELP)]
    Create {
        path: String,
        #[arg(long)]
        json: bool,
    },
    /// List imported files, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete one imported file
    Delete {
        file_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete every imported file
    Clear {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Named period, e.g. `this_month` or `last_quarter`
    #[arg(long)]
    pub time_frame: Option<String>,
    /// Custom range start (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub from: Option<IsoDate>,
    /// Custom range end (YYYY-MM-DD), inclusive
    #[arg(long, value_parser = parse_iso_date)]
    pub to: Option<IsoDate>,
    /// Category label to exclude; repeatable
    #[arg(long = "exclude", value_name = "LABEL")]
    pub exclude: Vec<String>,
    /// Hide income (non-negative amounts)
    #[arg(long)]
    pub no_income: bool,
    /// Hide expenses (negative amounts)
    #[arg(long)]
    pub no_expense: bool,
    /// First day of the week for week-based periods
    #[arg(long, value_parser = parse_week_start)]
    pub week_start: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DrillArgs {
    pub file_id: String,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Start zoomed into this group
    #[arg(long, value_name = "GROUP")]
    pub zoom: Option<String>,
    /// Start with this node selected
    #[arg(long, value_name = "NODE")]
    pub select: Option<String>,
    /// Node id to click; repeatable, applied in order
    #[arg(long = "click", value_name = "NODE")]
    pub clicks: Vec<String>,
    /// Return to the root after the clicks
    #[arg(long)]
    pub back: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CategoriesArgs {
    pub file_id: String,
    /// Currently excluded label; repeatable
    #[arg(long = "exclude", value_name = "LABEL")]
    pub exclude: Vec<String>,
    /// Label to toggle; repeatable, applied in order
    #[arg(long = "toggle", value_name = "LABEL")]
    pub toggles: Vec<String>,
    /// Start from an empty exclusion list
    #[arg(long)]
    pub clear: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TrendArgs {
    pub file_id: String,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Bucket size
    #[arg(long, value_parser = parse_group_by)]
    pub group_by: Option<String>,
    /// List the transactions of the period containing this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub slice: Option<IsoDate>,
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
