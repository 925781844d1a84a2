use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};
use tracing::debug;

use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "SPENDSCOPE_HOME";
const DEFAULT_HOME_DIR: &str = ".spendscope";
const STORE_FILE_NAME: &str = "files.db";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Resolves the directory holding the file store: explicit override, then
/// `SPENDSCOPE_HOME`, then `~/.spendscope`.
pub fn resolve_store_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = if let Some(path) = home_override {
        path.to_path_buf()
    } else if let Some(env_path) = std::env::var_os(HOME_ENV_VAR) {
        PathBuf::from(env_path)
    } else if let Some(home_path) = home::home_dir() {
        home_path.join(DEFAULT_HOME_DIR)
    } else {
        return Err(ClientError::store_init_failed(
            Path::new("."),
            "Could not resolve a home directory for the file store.",
        ));
    };

    absolutize(&candidate)
}

pub fn ensure_store_directory(path: &Path) -> ClientResult<()> {
    fs::create_dir_all(path).map_err(|error| map_io_error(path, &error))?;
    set_private_permissions_best_effort(path);
    Ok(())
}

pub fn store_db_path(home: &Path) -> PathBuf {
    home.join(STORE_FILE_NAME)
}

pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    debug!(path = %db_path.display(), "opening file store");
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    connection
        .busy_timeout(BUSY_TIMEOUT)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

pub fn map_io_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ClientError::store_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::store_locked(path)
        }
        Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) => {
            ClientError::store_corrupt(path)
        }
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::store_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::store_init_failed(path, &error.to_string()))
}

#[cfg(unix)]
fn set_private_permissions_best_effort(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn set_private_permissions_best_effort(_path: &Path) {}
