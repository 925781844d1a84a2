use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category label used when a row carries no category at all.
pub const NO_CATEGORY: &str = "<none>";

/// Separator between the group and sub-category of a composite label.
pub const CATEGORY_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub account: String,
    pub category: String,
    pub category_group: String,
    pub category_sub: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub amount: f64,
}

impl Transaction {
    /// Builds a transaction from a raw category label, deriving the group and
    /// sub-category from it.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
    ) -> Self {
        let category = category.into();
        let (category_group, category_sub) = split_category(&category);
        Self {
            id: id.into(),
            date,
            description: description.into(),
            account: String::new(),
            category,
            category_group,
            category_sub,
            tags: Vec::new(),
            amount,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// A direct transaction belongs to its group with no sub-category.
    pub fn is_direct(&self) -> bool {
        self.category_sub == self.category_group
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

/// Splits `"Group - Sub"` into trimmed parts. A label without the separator
/// (or with an empty sub part) is its own sub-category.
pub fn split_category(category: &str) -> (String, String) {
    let mut parts = category.split(CATEGORY_SEPARATOR);
    let group = parts.next().map(str::trim).unwrap_or_default().to_string();
    let sub = match parts.next().map(str::trim) {
        Some(sub) if !sub.is_empty() => sub.to_string(),
        _ => group.clone(),
    };
    (group, sub)
}

/// Id of the leaf node for `sub` under `group`.
pub fn leaf_id(group: &str, sub: &str) -> String {
    format!("{group}.{sub}")
}
