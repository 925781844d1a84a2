//! CSV import: turns an exported transaction file into typed transactions
//! with the category and date shape the analysis expects.

pub mod ids;
pub mod input;
pub mod normalize;
pub mod parse;

use tracing::{info, warn};

use crate::ClientResult;
use crate::analysis::types::Transaction;

pub use ids::{IdGenerator, SequentialIds};
pub use normalize::DropReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub line: u64,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub transactions: Vec<Transaction>,
    pub rows_read: usize,
    pub dropped: Vec<DroppedRow>,
}

impl ImportOutcome {
    pub fn rows_dropped(&self) -> usize {
        self.dropped.len()
    }
}

pub fn import_csv(content: &str, ids: &mut dyn IdGenerator) -> ClientResult<ImportOutcome> {
    let rows = parse::parse_csv(content)?;
    let mut transactions = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for row in &rows {
        match normalize::normalize_row(row, ids) {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => {
                warn!(line = row.line, reason = reason.as_str(), "dropped csv row");
                dropped.push(DroppedRow {
                    line: row.line,
                    reason,
                });
            }
        }
    }

    info!(
        rows = rows.len(),
        imported = transactions.len(),
        dropped = dropped.len(),
        "parsed csv import"
    );

    Ok(ImportOutcome {
        transactions,
        rows_read: rows.len(),
        dropped,
    })
}
