use std::path::Path;

use chrono::DateTime;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    DateSpan, DroppedRowData, FileListItem, ImportClearData, ImportCreateData, ImportDeleteData,
    ImportListData,
};
use crate::import::{SequentialIds, import_csv, input::read_source};
use crate::store::{FileRecord, FileStore};

const TRANSACTION_ID_PREFIX: &str = "txn";

#[derive(Debug, Default)]
pub struct ImportCreateOptions<'a> {
    pub path: String,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ImportListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ImportDeleteOptions<'a> {
    pub file_id: String,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ImportClearOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn create(path: &str) -> ClientResult<SuccessEnvelope> {
    create_with_options(ImportCreateOptions {
        path: path.to_string(),
        home_override: None,
    })
}

#[doc(hidden)]
pub fn create_with_options(options: ImportCreateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let source = read_source(Path::new(&options.path))?;
    let mut ids = SequentialIds::new(TRANSACTION_ID_PREFIX);
    let outcome = import_csv(&source.content, &mut ids)?;

    let date_span = outcome
        .transactions
        .iter()
        .map(|transaction| transaction.date)
        .min()
        .zip(outcome.transactions.iter().map(|transaction| transaction.date).max())
        .map(|(earliest, latest)| DateSpan { earliest, latest });

    let record = FileRecord::new(&source.file_name, outcome.transactions.clone());
    FileStore::open(options.home_override)?.save_file(&record)?;

    success(
        "import create",
        ImportCreateData {
            file_id: record.id,
            file_name: record.file_name,
            rows_read: outcome.rows_read,
            rows_imported: outcome.transactions.len(),
            rows_dropped: outcome.rows_dropped(),
            dropped: outcome
                .dropped
                .iter()
                .map(|row| DroppedRowData {
                    line: row.line,
                    reason: row.reason.as_str().to_string(),
                })
                .collect(),
            date_span,
        },
    )
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(ImportListOptions::default())
}

#[doc(hidden)]
pub fn list_with_options(options: ImportListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let files = FileStore::open(options.home_override)?
        .list_files()?
        .into_iter()
        .map(|summary| FileListItem {
            uploaded_at: format_uploaded_at(summary.uploaded_at),
            id: summary.id,
            file_name: summary.file_name,
            row_count: summary.row_count,
        })
        .collect();

    success("import list", ImportListData { files })
}

pub fn delete(file_id: &str) -> ClientResult<SuccessEnvelope> {
    delete_with_options(ImportDeleteOptions {
        file_id: file_id.to_string(),
        home_override: None,
    })
}

#[doc(hidden)]
pub fn delete_with_options(options: ImportDeleteOptions<'_>) -> ClientResult<SuccessEnvelope> {
    FileStore::open(options.home_override)?.delete_file(&options.file_id)?;
    success(
        "import delete",
        ImportDeleteData {
            file_id: options.file_id,
            deleted: true,
        },
    )
}

pub fn clear() -> ClientResult<SuccessEnvelope> {
    clear_with_options(ImportClearOptions::default())
}

#[doc(hidden)]
pub fn clear_with_options(options: ImportClearOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let removed = FileStore::open(options.home_override)?.clear_all()?;
    success("import clear", ImportClearData { removed })
}

fn format_uploaded_at(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|instant| instant.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
