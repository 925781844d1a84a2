use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::analysis::filter::FilterConfig;
use crate::analysis::range::{TimeFrame, WeekStart, end_of_day, resolve_at, start_of_day};
use crate::contracts::types::{FilterData, RangeData};
use crate::store::{FileRecord, FileStore};
use crate::{ClientError, ClientResult};

pub const EMPTY_PERIOD_MESSAGE: &str = "No data for this period.";
const WIDEST_RANGE_LABEL: &str = "All time";

/// Filter flags shared by the drill and trend commands.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub time_frame: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub exclude: Vec<String>,
    pub hide_income: bool,
    pub hide_expense: bool,
    pub week_start: Option<String>,
    #[doc(hidden)]
    pub now_override: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedFilter {
    pub(crate) config: FilterConfig,
    pub(crate) week_start: WeekStart,
    pub(crate) range: RangeData,
}

impl ResolvedFilter {
    pub(crate) fn filter_data(&self) -> FilterData {
        FilterData {
            excluded: self.config.excluded.iter().cloned().collect(),
            show_income: self.config.show_income,
            show_expense: self.config.show_expense,
            week_start: self.week_start.as_str().to_string(),
        }
    }
}

/// Turns CLI-level flags into a filter. Only malformed flag values fail;
/// unknown time frames and half-open custom ranges widen to all history.
pub(crate) fn resolve_filter(options: &FilterOptions, command: &str) -> ClientResult<ResolvedFilter> {
    let week_start = match options.week_start.as_deref() {
        Some(value) => value.parse::<WeekStart>().map_err(|()| {
            ClientError::invalid_argument_for_command(
                "`week-start` must be `sunday` or `monday`.",
                Some(command),
            )
        })?,
        None => WeekStart::default(),
    };

    let start = match options.from.as_deref() {
        Some(value) => Some(start_of_day(parse_iso_date_strict(value, "from", command)?)),
        None => None,
    };
    let end = match options.to.as_deref() {
        Some(value) => Some(end_of_day(parse_iso_date_strict(value, "to", command)?)),
        None => None,
    };

    let token = match &options.time_frame {
        Some(token) => token.clone(),
        None if start.is_some() || end.is_some() => TimeFrame::Custom.as_str().to_string(),
        None => TimeFrame::ThisMonth.as_str().to_string(),
    };
    let now = options
        .now_override
        .unwrap_or_else(|| Local::now().naive_local());
    let window = resolve_at(&token, start, end, now, week_start);

    let label = match token.parse::<TimeFrame>() {
        Ok(TimeFrame::Custom) if start.is_none() || end.is_none() => WIDEST_RANGE_LABEL,
        Ok(frame) => frame.label(),
        Err(()) => WIDEST_RANGE_LABEL,
    };

    let excluded = exclusion_labels(&options.exclude);

    Ok(ResolvedFilter {
        config: FilterConfig::new(window)
            .with_excluded(excluded)
            .with_income(!options.hide_income)
            .with_expense(!options.hide_expense),
        week_start,
        range: RangeData {
            time_frame: token,
            label: label.to_string(),
            start: window.start,
            end: window.end,
        },
    })
}

/// Trimmed, non-empty `--exclude` labels.
pub(crate) fn exclusion_labels(labels: &[String]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

pub(crate) fn load_record(home_override: Option<&Path>, file_id: &str) -> ClientResult<FileRecord> {
    FileStore::open(home_override)?.load_file(file_id)
}

pub(crate) fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    let trimmed = value.trim();
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(index, c)| if index == 4 || index == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}
