use std::fs;
use std::path::Path;

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct ImportSource {
    pub file_name: String,
    pub content: String,
}

/// Reads a CSV file from disk, keeping only its file name for display.
pub fn read_source(path: &Path) -> ClientResult<ImportSource> {
    let shown = path.display().to_string();
    let content = fs::read_to_string(path)
        .map_err(|error| ClientError::import_source_unreadable(&shown, &error.to_string()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(shown);
    Ok(ImportSource { file_name, content })
}
