use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::info;
use ulid::Ulid;

use crate::analysis::types::Transaction;
use crate::migrations::{FILES_COLUMNS, FILES_TABLE, run_pending};
use crate::state::{
    ensure_store_directory, map_sqlite_error, open_connection, resolve_store_home, store_db_path,
};
use crate::{ClientError, ClientResult};

/// One imported CSV file and everything parsed out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub file_name: String,
    /// Milliseconds since the unix epoch.
    pub uploaded_at: i64,
    pub row_count: i64,
    pub transactions: Vec<Transaction>,
}

impl FileRecord {
    pub fn new(file_name: &str, transactions: Vec<Transaction>) -> Self {
        Self {
            id: format!("file_{}", Ulid::new()),
            file_name: file_name.to_string(),
            uploaded_at: now_millis(),
            row_count: transactions.len() as i64,
            transactions,
        }
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            uploaded_at: self.uploaded_at,
            row_count: self.row_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: i64,
    pub row_count: i64,
}

pub struct FileStore {
    connection: Connection,
    db_path: PathBuf,
}

impl FileStore {
    pub fn open(home_override: Option<&Path>) -> ClientResult<Self> {
        let home = resolve_store_home(home_override)?;
        ensure_store_directory(&home)?;
        let db_path = store_db_path(&home);
        let mut connection = open_connection(&db_path)?;
        run_pending(&mut connection)
            .map_err(|error| ClientError::migration_failed(&db_path, &error.to_string()))?;
        verify_files_table(&connection, &db_path)?;
        Ok(Self {
            connection,
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Newest upload first.
    pub fn list_files(&self) -> ClientResult<Vec<FileSummary>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT id, file_name, uploaded_at, row_count FROM files
                 ORDER BY uploaded_at DESC, id DESC",
            )
            .map_err(|error| self.sqlite_error(&error))?;
        let rows = statement
            .query_map([], |row| {
                Ok(FileSummary {
                    id: row.get(0)?,
                    file_name: row.get(1)?,
                    uploaded_at: row.get(2)?,
                    row_count: row.get(3)?,
                })
            })
            .map_err(|error| self.sqlite_error(&error))?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row.map_err(|error| self.sqlite_error(&error))?);
        }
        Ok(summaries)
    }

    pub fn load_file(&self, file_id: &str) -> ClientResult<FileRecord> {
        let stored = self
            .connection
            .query_row(
                "SELECT id, file_name, uploaded_at, row_count, data FROM files WHERE id = ?1",
                [file_id],
                |row| {
                    Ok((
                        FileSummary {
                            id: row.get(0)?,
                            file_name: row.get(1)?,
                            uploaded_at: row.get(2)?,
                            row_count: row.get(3)?,
                        },
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|error| self.sqlite_error(&error))?;

        let Some((summary, data)) = stored else {
            return Err(ClientError::file_not_found(file_id));
        };
        let transactions: Vec<Transaction> =
            serde_json::from_str(&data).map_err(|_| ClientError::store_corrupt(&self.db_path))?;

        Ok(FileRecord {
            id: summary.id,
            file_name: summary.file_name,
            uploaded_at: summary.uploaded_at,
            row_count: summary.row_count,
            transactions,
        })
    }

    /// Inserts or replaces the record with the same id.
    pub fn save_file(&self, record: &FileRecord) -> ClientResult<()> {
        let data = serde_json::to_string(&record.transactions)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        self.connection
            .execute(
                "INSERT INTO files (id, file_name, uploaded_at, row_count, data)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    file_name = excluded.file_name,
                    uploaded_at = excluded.uploaded_at,
                    row_count = excluded.row_count,
                    data = excluded.data",
                params![
                    record.id,
                    record.file_name,
                    record.uploaded_at,
                    record.row_count,
                    data
                ],
            )
            .map_err(|error| self.sqlite_error(&error))?;
        info!(file_id = %record.id, rows = record.row_count, "saved file");
        Ok(())
    }

    pub fn delete_file(&self, file_id: &str) -> ClientResult<()> {
        let removed = self
            .connection
            .execute("DELETE FROM files WHERE id = ?1", [file_id])
            .map_err(|error| self.sqlite_error(&error))?;
        if removed == 0 {
            return Err(ClientError::file_not_found(file_id));
        }
        info!(file_id, "deleted file");
        Ok(())
    }

    /// Removes every stored file and returns how many there were.
    pub fn clear_all(&self) -> ClientResult<usize> {
        let removed = self
            .connection
            .execute("DELETE FROM files", [])
            .map_err(|error| self.sqlite_error(&error))?;
        info!(removed, "cleared file store");
        Ok(removed)
    }

    fn sqlite_error(&self, error: &rusqlite::Error) -> ClientError {
        map_sqlite_error(&self.db_path, error)
    }
}

fn verify_files_table(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let sql = format!("PRAGMA table_info({FILES_TABLE})");
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let names = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns = Vec::new();
    for name in names {
        columns.push(name.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    if FILES_COLUMNS
        .iter()
        .all(|required| columns.iter().any(|column| column == required))
    {
        Ok(())
    } else {
        Err(ClientError::store_corrupt(db_path))
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::FileRecord;

    #[test]
    fn new_records_get_prefixed_ulid_ids() {
        let record = FileRecord::new("march.csv", Vec::new());
        assert!(record.id.starts_with("file_"));
        assert_eq!(record.id.len(), "file_".len() + 26);
        assert_eq!(record.row_count, 0);
        assert!(record.uploaded_at > 0);
    }
}
