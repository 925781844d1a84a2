use std::collections::BTreeSet;

use tracing::debug;

use super::range::DateRange;
use super::types::Transaction;

/// Everything that decides whether a transaction is visible. Compared by
/// value to decide whether derived views need rebuilding.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub range: DateRange,
    pub excluded: BTreeSet<String>,
    pub show_income: bool,
    pub show_expense: bool,
}

impl FilterConfig {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            excluded: BTreeSet::new(),
            show_income: true,
            show_expense: true,
        }
    }

    pub fn with_excluded(mut self, excluded: BTreeSet<String>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_income(mut self, show_income: bool) -> Self {
        self.show_income = show_income;
        self
    }

    pub fn with_expense(mut self, show_expense: bool) -> Self {
        self.show_expense = show_expense;
        self
    }

    pub fn accepts(&self, transaction: &Transaction) -> bool {
        self.range.contains_date(transaction.date)
            && !self.is_excluded(transaction)
            && if transaction.is_expense() {
                self.show_expense
            } else {
                self.show_income
            }
    }

    fn is_excluded(&self, transaction: &Transaction) -> bool {
        self.excluded.contains(&transaction.category_group)
            || self.excluded.contains(&transaction.category_sub)
            || self.excluded.contains(&transaction.category)
    }
}

/// Stable filter: the output keeps the input order.
pub fn filter_transactions(transactions: &[Transaction], config: &FilterConfig) -> Vec<Transaction> {
    let kept: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| config.accepts(transaction))
        .cloned()
        .collect();
    debug!(kept = kept.len(), total = transactions.len(), "filtered transactions");
    kept
}
