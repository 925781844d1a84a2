use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::range::{WeekStart, month_end, month_start, week_start_of};
use super::types::Transaction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGrouping {
    Day,
    #[default]
    Week,
    Month,
}

impl FromStr for TrendGrouping {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(()),
        }
    }
}

impl TrendGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// First day of the period containing `date`.
    pub fn period_start(&self, date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start_of(date, week_start),
            Self::Month => month_start(date),
        }
    }

    pub fn period_end(&self, date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start_of(date, week_start) + Duration::days(6),
            Self::Month => month_end(date),
        }
    }

    pub fn label(&self, key: NaiveDate) -> String {
        match self {
            Self::Day => key.format("%b %-d, %Y").to_string(),
            Self::Week => format!("Week of {}", key.format("%b %-d, %Y")),
            Self::Month => key.format("%B %Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub key: NaiveDate,
    pub label: String,
    pub total: f64,
    /// Every group in the input, zero when absent from this period.
    pub by_group: BTreeMap<String, f64>,
}

/// Sorted group names present in `transactions`.
pub fn trend_groups(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|transaction| transaction.category_group.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One bucket per period that has transactions, oldest first.
pub fn bucket(
    transactions: &[Transaction],
    grouping: TrendGrouping,
    week_start: WeekStart,
) -> Vec<TrendBucket> {
    let groups = trend_groups(transactions);
    let mut buckets: BTreeMap<NaiveDate, TrendBucket> = BTreeMap::new();

    for transaction in transactions {
        let key = grouping.period_start(transaction.date, week_start);
        let bucket = buckets.entry(key).or_insert_with(|| TrendBucket {
            key,
            label: grouping.label(key),
            total: 0.0,
            by_group: groups.iter().map(|group| (group.clone(), 0.0)).collect(),
        });
        let amount = transaction.magnitude();
        bucket.total += amount;
        *bucket
            .by_group
            .entry(transaction.category_group.clone())
            .or_insert(0.0) += amount;
    }

    buckets.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSlice {
    pub key: NaiveDate,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: f64,
    pub transactions: Vec<Transaction>,
}

/// Transactions of the period containing `key`, newest first.
pub fn slice(
    transactions: &[Transaction],
    key: NaiveDate,
    grouping: TrendGrouping,
    week_start: WeekStart,
) -> TrendSlice {
    let start = grouping.period_start(key, week_start);
    let end = grouping.period_end(key, week_start);
    let mut members: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| start <= transaction.date && transaction.date <= end)
        .cloned()
        .collect();
    members.sort_by(|a, b| b.date.cmp(&a.date));

    TrendSlice {
        key: start,
        label: grouping.label(start),
        start,
        end,
        total: members.iter().map(Transaction::magnitude).sum(),
        transactions: members,
    }
}
