use spendscope_client::commands::categories::{self, CategoriesOptions};
use spendscope_client::commands::common::FilterOptions;
use spendscope_client::commands::drill::{self, DrillOptions};
use spendscope_client::commands::import;
use spendscope_client::commands::trend::{self, TrendOptions};
use spendscope_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, FilterArgs, ImportCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Import { command } => match command {
            ImportCommand::Create { path, .. } => import::create(path),
            ImportCommand::List { .. } => import::list(),
            ImportCommand::Delete { file_id, .. } => import::delete(file_id),
            ImportCommand::Clear { .. } => import::clear(),
        },
        Commands::Drill(args) => drill::run(DrillOptions {
            file_id: args.file_id.clone(),
            filter: filter_options(&args.filter),
            zoom: args.zoom.clone(),
            select: args.select.clone(),
            clicks: args.clicks.clone(),
            back: args.back,
            home_override: None,
        }),
        Commands::Categories(args) => categories::run(CategoriesOptions {
            file_id: args.file_id.clone(),
            exclude: args.exclude.clone(),
            toggles: args.toggles.clone(),
            clear: args.clear,
            home_override: None,
        }),
        Commands::Trend(args) => trend::run(TrendOptions {
            file_id: args.file_id.clone(),
            filter: filter_options(&args.filter),
            group_by: args.group_by.clone(),
            slice: args.slice.as_ref().map(|date| date.as_str().to_string()),
            home_override: None,
        }),
    }
}

fn filter_options(args: &FilterArgs) -> FilterOptions {
    FilterOptions {
        time_frame: args.time_frame.clone(),
        from: args.from.as_ref().map(|date| date.as_str().to_string()),
        to: args.to.as_ref().map(|date| date.as_str().to_string()),
        exclude: args.exclude.clone(),
        hide_income: args.no_income,
        hide_expense: args.no_expense,
        week_start: args.week_start.clone(),
        now_override: None,
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Commands, parse_from};

    use super::filter_options;

    #[test]
    fn filter_flags_map_onto_client_options() {
        let parsed = parse_from([
            "spendscope",
            "trend",
            "file_1",
            "--from",
            "2026-03-01",
            "--exclude",
            "Food",
            "--no-income",
            "--week-start",
            "monday",
        ]);
        assert!(parsed.is_ok());
        if let Ok(Commands::Trend(args)) = parsed.map(|cli| cli.command) {
            let options = filter_options(&args.filter);
            assert_eq!(options.from.as_deref(), Some("2026-03-01"));
            assert_eq!(options.to, None);
            assert_eq!(options.exclude, vec!["Food"]);
            assert!(options.hide_income);
            assert!(!options.hide_expense);
            assert_eq!(options.week_start.as_deref(), Some("monday"));
        }
    }
}
