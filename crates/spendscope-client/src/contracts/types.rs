use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analysis::exclusion::CategoryRow;
use crate::analysis::navigation::DrillNotice;
use crate::analysis::palette::Hsl;
use crate::analysis::types::Transaction;

#[derive(Debug, Clone, Serialize)]
pub struct DroppedRowData {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateSpan {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportCreateData {
    pub file_id: String,
    pub file_name: String,
    pub rows_read: usize,
    pub rows_imported: usize,
    pub rows_dropped: usize,
    pub dropped: Vec<DroppedRowData>,
    pub date_span: Option<DateSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListItem {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: String,
    pub row_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportListData {
    pub files: Vec<FileListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportDeleteData {
    pub file_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportClearData {
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeData {
    pub time_frame: String,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterData {
    pub excluded: Vec<String>,
    pub show_income: bool,
    pub show_expense: bool,
    pub week_start: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub total: f64,
    /// Percent of the root total.
    pub share: f64,
    pub color: Hsl,
    pub transaction_count: usize,
    pub children: Vec<NodeData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrumbData {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateData {
    pub phase: String,
    pub zoomed_group: Option<String>,
    pub selected_node: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub account: String,
    pub category: String,
    pub tags: Vec<String>,
    pub amount: f64,
}

impl From<&Transaction> for TransactionRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            date: transaction.date,
            description: transaction.description.clone(),
            account: transaction.account.clone(),
            category: transaction.category.clone(),
            tags: transaction.tags.clone(),
            amount: transaction.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionData {
    pub node_id: String,
    pub name: String,
    pub total: f64,
    pub share: f64,
    pub color: Hsl,
    pub transactions: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrillData {
    pub file_id: String,
    pub file_name: String,
    pub range: RangeData,
    pub filters: FilterData,
    pub transaction_count: usize,
    pub empty: bool,
    pub message: Option<String>,
    pub state: StateData,
    pub breadcrumb: Vec<CrumbData>,
    pub view: NodeData,
    pub selection: Option<SelectionData>,
    pub notices: Vec<DrillNotice>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesData {
    pub file_id: String,
    pub rows: Vec<CategoryRow>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub name: String,
    pub color: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendBucketData {
    pub key: NaiveDate,
    pub label: String,
    pub total: f64,
    pub by_group: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSliceData {
    pub key: NaiveDate,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: f64,
    pub transactions: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendData {
    pub file_id: String,
    pub file_name: String,
    pub range: RangeData,
    pub filters: FilterData,
    pub group_by: String,
    pub transaction_count: usize,
    pub empty: bool,
    pub message: Option<String>,
    pub series: Vec<TrendSeries>,
    pub buckets: Vec<TrendBucketData>,
    pub slice: Option<TrendSliceData>,
}
