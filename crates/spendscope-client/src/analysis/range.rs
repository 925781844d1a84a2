use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
    Custom,
}

impl FromStr for TimeFrame {
    type Err = ();

    /// Accepts labels and tokens alike: `This Month`, `this_month`, `this-month`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        Self::all()
            .iter()
            .copied()
            .find(|frame| frame.as_str() == normalized)
            .ok_or(())
    }
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisWeek => "this_week",
            Self::LastWeek => "last_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::ThisQuarter => "this_quarter",
            Self::LastQuarter => "last_quarter",
            Self::ThisYear => "this_year",
            Self::LastYear => "last_year",
            Self::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ThisWeek => "This Week",
            Self::LastWeek => "Last Week",
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::ThisQuarter => "This Quarter",
            Self::LastQuarter => "Last Quarter",
            Self::ThisYear => "This Year",
            Self::LastYear => "Last Year",
            Self::Custom => "Custom",
        }
    }

    pub fn all() -> &'static [TimeFrame] {
        &[
            Self::ThisWeek,
            Self::LastWeek,
            Self::ThisMonth,
            Self::LastMonth,
            Self::ThisQuarter,
            Self::LastQuarter,
            Self::ThisYear,
            Self::LastYear,
            Self::Custom,
        ]
    }
}

/// First day of the week used for week windows and weekly trend buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl FromStr for WeekStart {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            _ => Err(()),
        }
    }
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
        }
    }

    fn days_into_week(&self, date: NaiveDate) -> u32 {
        match self {
            Self::Sunday => date.weekday().num_days_from_sunday(),
            Self::Monday => date.weekday().num_days_from_monday(),
        }
    }
}

/// Inclusive `[start, end]` window. A `start` after `end` is kept as given
/// and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Everything from the unix epoch up to `now`.
    pub fn widest(now: NaiveDateTime) -> Self {
        Self {
            start: start_of_day(NaiveDate::default()),
            end: now,
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        let instant = start_of_day(date);
        self.start <= instant && instant <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.date().format("%Y-%m-%d"),
            self.end.date().format("%Y-%m-%d")
        )
    }
}

/// Resolves a time-frame token against the local clock. Never fails: unknown
/// tokens and incomplete custom bounds fall back to the widest range.
pub fn resolve(
    time_frame: &str,
    custom_start: Option<NaiveDateTime>,
    custom_end: Option<NaiveDateTime>,
    week_start: WeekStart,
) -> DateRange {
    resolve_at(
        time_frame,
        custom_start,
        custom_end,
        Local::now().naive_local(),
        week_start,
    )
}

pub fn resolve_at(
    time_frame: &str,
    custom_start: Option<NaiveDateTime>,
    custom_end: Option<NaiveDateTime>,
    now: NaiveDateTime,
    week_start: WeekStart,
) -> DateRange {
    match time_frame.parse::<TimeFrame>() {
        Ok(frame) => resolve_frame_at(frame, custom_start, custom_end, now, week_start),
        Err(()) => DateRange::widest(now),
    }
}

pub fn resolve_frame_at(
    frame: TimeFrame,
    custom_start: Option<NaiveDateTime>,
    custom_end: Option<NaiveDateTime>,
    now: NaiveDateTime,
    week_start: WeekStart,
) -> DateRange {
    let today = now.date();
    match frame {
        TimeFrame::ThisWeek => DateRange::new(start_of_day(week_start_of(today, week_start)), now),
        TimeFrame::LastWeek => {
            let first = week_start_of(today, week_start) - Duration::days(7);
            DateRange::new(start_of_day(first), end_of_day(first + Duration::days(6)))
        }
        TimeFrame::ThisMonth => DateRange::new(start_of_day(month_start(today)), now),
        TimeFrame::LastMonth => {
            let first = shift_months_back(month_start(today), 1);
            DateRange::new(start_of_day(first), end_of_day(month_end(first)))
        }
        TimeFrame::ThisQuarter => DateRange::new(start_of_day(quarter_start(today)), now),
        TimeFrame::LastQuarter => {
            let first = shift_months_back(quarter_start(today), 3);
            DateRange::new(start_of_day(first), end_of_day(quarter_end(first)))
        }
        TimeFrame::ThisYear => DateRange::new(start_of_day(year_start(today)), now),
        TimeFrame::LastYear => {
            let first = shift_months_back(year_start(today), 12);
            DateRange::new(start_of_day(first), end_of_day(year_end(first)))
        }
        TimeFrame::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => DateRange::widest(now),
        },
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date + Duration::days(1)) - Duration::milliseconds(1)
}

pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    date - Duration::days(i64::from(week_start.days_into_week(date)))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    period_last_day(month_start(date), 1)
}

pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    shift_months_back(month_start(date), date.month0() % 3)
}

pub fn quarter_end(date: NaiveDate) -> NaiveDate {
    period_last_day(quarter_start(date), 3)
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    period_last_day(year_start(date), 12)
}

fn shift_months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

fn period_last_day(first: NaiveDate, months: u32) -> NaiveDate {
    first
        .checked_add_months(Months::new(months))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{DateRange, TimeFrame, WeekStart, end_of_day, resolve_at, start_of_day};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    // Thursday, 2026-05-14 15:30.
    fn now() -> NaiveDateTime {
        date(2026, 5, 14)
            .and_hms_opt(15, 30, 0)
            .unwrap_or_default()
    }

    fn resolve(token: &str) -> DateRange {
        resolve_at(token, None, None, now(), WeekStart::Sunday)
    }

    #[test]
    fn tokens_parse_from_labels_and_snake_case() {
        assert_eq!("This Month".parse::<TimeFrame>(), Ok(TimeFrame::ThisMonth));
        assert_eq!("last_quarter".parse::<TimeFrame>(), Ok(TimeFrame::LastQuarter));
        assert_eq!("LAST-YEAR".parse::<TimeFrame>(), Ok(TimeFrame::LastYear));
        assert!("Fortnight".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn this_week_starts_on_configured_day_and_ends_now() {
        let sunday = resolve("This Week");
        assert_eq!(sunday.start, start_of_day(date(2026, 5, 10)));
        assert_eq!(sunday.end, now());

        let monday = resolve_at("This Week", None, None, now(), WeekStart::Monday);
        assert_eq!(monday.start, start_of_day(date(2026, 5, 11)));
    }

    #[test]
    fn last_week_covers_full_previous_week() {
        let range = resolve("Last Week");
        assert_eq!(range.start, start_of_day(date(2026, 5, 3)));
        assert_eq!(range.end, end_of_day(date(2026, 5, 9)));
        assert!(range.contains_date(date(2026, 5, 9)));
        assert!(!range.contains_date(date(2026, 5, 10)));
    }

    #[test]
    fn month_quarter_and_year_windows() {
        let this_month = resolve("This Month");
        assert_eq!(this_month.start, start_of_day(date(2026, 5, 1)));
        assert_eq!(this_month.end, now());

        let last_month = resolve("Last Month");
        assert_eq!(last_month.start, start_of_day(date(2026, 4, 1)));
        assert_eq!(last_month.end, end_of_day(date(2026, 4, 30)));

        let this_quarter = resolve("This Quarter");
        assert_eq!(this_quarter.start, start_of_day(date(2026, 4, 1)));

        let last_quarter = resolve("Last Quarter");
        assert_eq!(last_quarter.start, start_of_day(date(2026, 1, 1)));
        assert_eq!(last_quarter.end, end_of_day(date(2026, 3, 31)));

        let this_year = resolve("This Year");
        assert_eq!(this_year.start, start_of_day(date(2026, 1, 1)));

        let last_year = resolve("Last Year");
        assert_eq!(last_year.start, start_of_day(date(2025, 1, 1)));
        assert_eq!(last_year.end, end_of_day(date(2025, 12, 31)));
    }

    #[test]
    fn previous_periods_cross_year_boundary_in_january() {
        let january = date(2026, 1, 15).and_hms_opt(9, 0, 0).unwrap_or_default();

        let last_month = resolve_at("Last Month", None, None, january, WeekStart::Sunday);
        assert_eq!(last_month.start, start_of_day(date(2025, 12, 1)));
        assert_eq!(last_month.end, end_of_day(date(2025, 12, 31)));

        let last_quarter = resolve_at("Last Quarter", None, None, january, WeekStart::Sunday);
        assert_eq!(last_quarter.start, start_of_day(date(2025, 10, 1)));
        assert_eq!(last_quarter.end, end_of_day(date(2025, 12, 31)));
    }

    #[test]
    fn custom_bounds_are_used_verbatim_even_when_inverted() {
        let start = start_of_day(date(2026, 3, 10));
        let end = start_of_day(date(2026, 3, 1));
        let range = resolve_at("Custom", Some(start), Some(end), now(), WeekStart::Sunday);
        assert_eq!(range, DateRange::new(start, end));
        assert!(range.is_inverted());
        assert!(!range.contains_date(date(2026, 3, 5)));
    }

    #[test]
    fn incomplete_custom_and_unknown_tokens_fall_back_to_widest() {
        let widest = DateRange::widest(now());
        assert_eq!(widest.start, start_of_day(date(1970, 1, 1)));

        let start = Some(start_of_day(date(2026, 3, 10)));
        assert_eq!(
            resolve_at("Custom", start, None, now(), WeekStart::Sunday),
            widest
        );
        assert_eq!(resolve("Next Decade"), widest);
    }

    #[test]
    fn transaction_dates_compare_as_midnight() {
        let range = DateRange::new(start_of_day(date(2026, 5, 1)), now());
        assert!(range.contains_date(date(2026, 5, 1)));
        assert!(range.contains_date(date(2026, 5, 14)));
        assert!(!range.contains_date(date(2026, 5, 15)));
    }
}
