use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use spendscope_client::analysis::types::Transaction;
use spendscope_client::commands::common::FilterOptions;
use spendscope_client::commands::import::{self, ImportCreateOptions};
use spendscope_client::{ClientResult, SuccessEnvelope};
use tempfile::{Builder, TempDir};

pub const MARCH_EXPORT: &str = "\
Date,Description,Category,Account,Tags,Amount
2026-03-02,Corner Market,Food - Groceries,Checking,weekly,-30.00
2026-03-04,Cafe,Food,Checking,,-20.00
2026-03-05,Pizza Place,Food - Takeout,Credit,,-15.00
2026-03-06,Airline,Travel - Air,Credit,trip,-300.00
2026-03-07,Hotel,Travel - Hotel,Credit,trip,-200.00
2026-03-10,Employer,Income - Salary,Checking,,\"$2,500.00\"
2026-03-12,Landlord,Rent,Checking,,-900.00
2026-03-14,Misc,,Checking,,-5.00
2026-03-15,Refund,Food - Takeout,Credit,,0
2026-04-02,Corner Market,Food - Groceries,Checking,,-40.00
";

pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("spendscope-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let written = fs::write(&path, body);
    assert!(written.is_ok());
    path
}

pub fn run_import(home: &Path, path: &Path) -> ClientResult<SuccessEnvelope> {
    import::create_with_options(ImportCreateOptions {
        path: path.display().to_string(),
        home_override: Some(home),
    })
}

/// Writes `body` next to `home`, imports it and returns the new file id.
pub fn import_fixture(home: &Path, name: &str, body: &str) -> String {
    let dir = home
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| home.to_path_buf());
    let path = write_csv(&dir, name, body);
    let result = run_import(home, &path);
    assert!(result.is_ok());
    result
        .ok()
        .and_then(|success| success.data["file_id"].as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn payload(result: ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok());
    match result {
        Ok(success) => serde_json::to_value(success).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Explicit March 2026 bounds, independent of the wall clock.
pub fn march_filter() -> FilterOptions {
    FilterOptions {
        from: Some("2026-03-01".to_string()),
        to: Some("2026-03-31".to_string()),
        now_override: Some(noon(2026, 4, 20)),
        ..FilterOptions::default()
    }
}

pub fn txn(id: &str, day: u32, category: &str, amount: f64) -> Transaction {
    Transaction::new(id, date(2026, 3, day), id, category, amount)
}

pub fn names(nodes: &Value) -> Vec<String> {
    nodes
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
