use chrono::{NaiveDate, NaiveDateTime};

use super::ids::IdGenerator;
use super::parse::RawRow;
use crate::analysis::types::{NO_CATEGORY, Transaction};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DEFAULT_DESCRIPTION: &str = "Unknown";

/// Why a row could not become a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingDate,
    MissingAmount,
    UnparseableDate,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingDate => "missing_date",
            Self::MissingAmount => "missing_amount",
            Self::UnparseableDate => "unparseable_date",
        }
    }
}

pub fn normalize_row(row: &RawRow, ids: &mut dyn IdGenerator) -> Result<Transaction, DropReason> {
    let raw_date = row.date.as_deref().ok_or(DropReason::MissingDate)?;
    let raw_amount = row.amount.as_deref().ok_or(DropReason::MissingAmount)?;
    let date = parse_date(raw_date).ok_or(DropReason::UnparseableDate)?;

    let category = row
        .category
        .clone()
        .unwrap_or_else(|| NO_CATEGORY.to_string());
    let description = row
        .description
        .clone()
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    Ok(
        Transaction::new(ids.next_id(), date, description, category, parse_amount(raw_amount))
            .with_account(row.account.clone().unwrap_or_default())
            .with_tags(row.tags.as_deref().map(split_tags).unwrap_or_default()),
    )
}

/// Accepts ISO dates, US `M/D/YYYY` dates and ISO timestamps (date part kept).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|instant| instant.date())
        })
}

/// Strips currency symbols, thousands separators and spaces. Anything still
/// unreadable counts as zero.
pub fn parse_amount(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

pub fn split_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in value.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DropReason, normalize_row, parse_amount, parse_date, split_tags};
    use crate::import::ids::SequentialIds;
    use crate::import::parse::RawRow;

    fn row(date: Option<&str>, amount: Option<&str>, category: Option<&str>) -> RawRow {
        RawRow {
            line: 2,
            date: date.map(str::to_string),
            amount: amount.map(str::to_string),
            category: category.map(str::to_string),
            ..RawRow::default()
        }
    }

    #[test]
    fn dates_in_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5);
        assert_eq!(parse_date("2026-03-05"), expected);
        assert_eq!(parse_date("03/05/2026"), expected);
        assert_eq!(parse_date("3/5/2026"), expected);
        assert_eq!(parse_date("2026/03/05"), expected);
        assert_eq!(parse_date("2026-03-05T18:30:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2026-02-30"), None);
    }

    #[test]
    fn amounts_strip_currency_formatting() {
        assert_eq!(parse_amount("$ -28.00"), -28.0);
        assert_eq!(parse_amount("-$1,234.50"), -1234.5);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(
            split_tags(" trip , work,,trip "),
            vec!["trip".to_string(), "work".to_string()]
        );
    }

    #[test]
    fn missing_category_becomes_none_sentinel() {
        let mut ids = SequentialIds::new("txn");
        let result = normalize_row(&row(Some("2026-03-05"), Some("-4"), None), &mut ids);
        assert!(result.is_ok());
        if let Ok(transaction) = result {
            assert_eq!(transaction.id, "txn-1");
            assert_eq!(transaction.category, "<none>");
            assert_eq!(transaction.category_group, "<none>");
            assert_eq!(transaction.category_sub, "<none>");
            assert_eq!(transaction.description, "Unknown");
        }
    }

    #[test]
    fn rows_without_usable_date_or_amount_are_dropped() {
        let mut ids = SequentialIds::new("txn");
        assert_eq!(
            normalize_row(&row(None, Some("1"), None), &mut ids),
            Err(DropReason::MissingDate)
        );
        assert_eq!(
            normalize_row(&row(Some("2026-03-05"), None, None), &mut ids),
            Err(DropReason::MissingAmount)
        );
        assert_eq!(
            normalize_row(&row(Some("soon"), Some("1"), None), &mut ids),
            Err(DropReason::UnparseableDate)
        );
    }
}
