use crate::{ClientError, ClientResult};

pub const REQUIRED_HEADERS: [&str; 2] = ["Date", "Amount"];
pub const OPTIONAL_HEADERS: [&str; 4] = ["Description", "Category", "Account", "Tags"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub date: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Default)]
struct Columns {
    date: Option<usize>,
    amount: Option<usize>,
    description: Option<usize>,
    category: Option<usize>,
    account: Option<usize>,
    tags: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Self {
        let mut columns = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match header.to_ascii_lowercase().as_str() {
                "date" => &mut columns.date,
                "amount" => &mut columns.amount,
                "description" => &mut columns.description,
                "category" => &mut columns.category,
                "account" => &mut columns.account,
                "tags" => &mut columns.tags,
                _ => continue,
            };
            slot.get_or_insert(index);
        }
        columns
    }

    fn missing_required(&self) -> Vec<String> {
        [(REQUIRED_HEADERS[0], self.date), (REQUIRED_HEADERS[1], self.amount)]
            .into_iter()
            .filter(|(_, index)| index.is_none())
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Reads CSV text into raw rows. Headers match case-insensitively; unknown
/// columns are ignored and blank lines skipped.
pub fn parse_csv(content: &str) -> ClientResult<Vec<RawRow>> {
    if content.trim().is_empty() {
        return Err(ClientError::import_empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| malformed("CSV header row is missing or unreadable."))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<String>>();

    let columns = Columns::from_headers(&headers);
    let missing = columns.missing_required();
    if !missing.is_empty() {
        return Err(ClientError::import_schema_mismatch(missing, headers));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|_| malformed("CSV rows are malformed or not UTF-8."))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let cell = |index: Option<usize>| {
            index
                .and_then(|index| record.get(index))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        rows.push(RawRow {
            line: record.position().map(|pos| pos.line()).unwrap_or_default(),
            date: cell(columns.date),
            amount: cell(columns.amount),
            description: cell(columns.description),
            category: cell(columns.category),
            account: cell(columns.account),
            tags: cell(columns.tags),
        });
    }

    if rows.is_empty() {
        return Err(ClientError::import_empty());
    }

    Ok(rows)
}

fn malformed(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Save the file as UTF-8 CSV with a single header row.".to_string(),
            format!("Run `{}` to review the expected columns.", crate::error::IMPORT_HELP_COMMAND),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::parse_csv;

    #[test]
    fn headers_match_case_insensitively_in_any_order() {
        let parsed = parse_csv("amount,DATE,Category,Memo\n-12.50,2026-03-01,Food - Groceries,x\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].date.as_deref(), Some("2026-03-01"));
            assert_eq!(rows[0].amount.as_deref(), Some("-12.50"));
            assert_eq!(rows[0].category.as_deref(), Some("Food - Groceries"));
            assert_eq!(rows[0].description, None);
            assert_eq!(rows[0].line, 2);
        }
    }

    #[test]
    fn missing_amount_header_is_schema_mismatch() {
        let parsed = parse_csv("Date,Description\n2026-03-01,Coffee\n");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "import_schema_mismatch");
        }
    }

    #[test]
    fn empty_input_and_header_only_are_rejected() {
        for content in ["", "   \n", "Date,Amount\n"] {
            let parsed = parse_csv(content);
            assert!(parsed.is_err());
            if let Err(error) = parsed {
                assert_eq!(error.code, "import_empty");
            }
        }
    }

    #[test]
    fn short_rows_and_blank_lines_are_tolerated() {
        let parsed = parse_csv("Date,Amount,Description\n2026-03-01,5\n\n2026-03-02,6,Tea\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].description, None);
            assert_eq!(rows[1].description.as_deref(), Some("Tea"));
        }
    }
}
