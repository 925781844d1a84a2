use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const IMPORT_HELP_COMMAND: &str = "spendscope import create --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Errors the user can fix by changing their input, as opposed to store
    /// or internal failures.
    pub fn is_user_error(&self) -> bool {
        !(self.code.starts_with("internal_")
            || self.code.starts_with("store_")
            || self.code == "migration_failed")
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `spendscope {cmd} --help` for usage."),
            None => "Run `spendscope --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        match command {
            Some(cmd) => error.with_data(json!({ "command_hint": cmd })),
            None => error,
        }
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn import_source_unreadable(path: &str, detail: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Could not read import file `{path}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Rerun `spendscope import create <path>`.".to_string(),
            ],
        )
    }

    pub fn import_empty() -> Self {
        Self::new(
            "import_empty",
            "The CSV file has no header row or no data rows.",
            vec![
                "Export transactions with a header row such as `Date,Description,Category,Amount`."
                    .to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review the expected columns."),
            ],
        )
    }

    pub fn import_schema_mismatch(missing_headers: Vec<String>, actual_headers: Vec<String>) -> Self {
        Self::new(
            "import_schema_mismatch",
            "CSV headers do not include every required column.",
            vec![
                "Include the `Date` and `Amount` columns; other columns are optional.".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review the expected columns."),
            ],
        )
        .with_data(json!({
            "missing_headers": missing_headers,
            "actual_headers": actual_headers,
            "help_command": IMPORT_HELP_COMMAND,
        }))
    }

    pub fn file_not_found(file_id: &str) -> Self {
        Self::new(
            "file_not_found",
            &format!("File id `{file_id}` was not found."),
            vec![
                "Run `spendscope import list` to find a valid file id.".to_string(),
                "Import the CSV again with `spendscope import create <path>`.".to_string(),
            ],
        )
        .with_data(json!({ "file_id": file_id }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_permission_denied",
            &format!("Cannot open the file store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `SPENDSCOPE_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("File store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("File store appears corrupt at `{location}`."),
            vec![
                format!("Remove `{location}` and import your CSV files again."),
                "Or point `SPENDSCOPE_HOME` at a fresh directory.".to_string(),
            ],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("File store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("File store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ClientError;

    #[test]
    fn user_errors_are_distinguished_from_store_failures() {
        assert!(ClientError::file_not_found("file_x").is_user_error());
        assert!(ClientError::invalid_argument("bad").is_user_error());
        assert!(!ClientError::store_locked(Path::new("/tmp/files.db")).is_user_error());
        assert!(!ClientError::internal_serialization("boom").is_user_error());
        assert!(!ClientError::migration_failed(Path::new("/tmp"), "x").is_user_error());
    }

    #[test]
    fn command_hint_is_attached_when_command_is_known() {
        let error = ClientError::invalid_argument_for_command("bad flag", Some("drill"));
        assert_eq!(error.code, "invalid_argument");
        assert_eq!(
            error.recovery_steps,
            vec!["Run `spendscope drill --help` for usage.".to_string()]
        );
        assert!(error.data.is_some());
    }

    #[test]
    fn schema_mismatch_reports_missing_headers() {
        let error = ClientError::import_schema_mismatch(
            vec!["Amount".to_string()],
            vec!["Date".to_string(), "Description".to_string()],
        );
        assert_eq!(error.code, "import_schema_mismatch");
        let missing = error
            .data
            .as_ref()
            .and_then(|data| data.get("missing_headers"))
            .and_then(|value| value.as_array())
            .map(|values| values.len());
        assert_eq!(missing, Some(1));
    }
}
