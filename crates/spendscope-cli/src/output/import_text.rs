use std::io;

use chrono::{DateTime, Local};
use serde_json::Value;

use super::format::{self, Column, array_field, str_field, u64_field};

pub fn render_import_create(data: &Value) -> io::Result<String> {
    let file_id = data
        .get("file_id")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("import output requires file_id"))?;

    let mut lines = vec![
        "Import completed successfully.".to_string(),
        String::new(),
        "Summary:".to_string(),
    ];

    let mut entries = vec![
        ("File ID:", file_id.to_string()),
        ("File name:", str_field(data, "file_name").to_string()),
        ("Rows read:", u64_field(data, "rows_read").to_string()),
        ("Rows imported:", u64_field(data, "rows_imported").to_string()),
        ("Rows dropped:", u64_field(data, "rows_dropped").to_string()),
    ];
    if let Some(span) = data.get("date_span").filter(|span| !span.is_null()) {
        entries.push((
            "Dates:",
            format!("{} to {}", str_field(span, "earliest"), str_field(span, "latest")),
        ));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    let dropped = array_field(data, "dropped");
    if !dropped.is_empty() {
        lines.push(String::new());
        lines.push("Dropped rows:".to_string());
        for row in dropped {
            lines.push(format!(
                "  line {}: {}",
                u64_field(row, "line"),
                str_field(row, "reason").replace('_', " ")
            ));
        }
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    lines.push(format!("  1. spendscope drill {file_id}"));
    lines.push(format!("  2. spendscope trend {file_id} --group-by month"));

    Ok(lines.join("\n"))
}

pub fn render_import_list(data: &Value) -> io::Result<String> {
    let files = data
        .get("files")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("import list output requires files"))?;

    if files.is_empty() {
        return Ok([
            "No files imported yet.",
            "",
            "Import your first file:",
            "  1. spendscope import create --help",
            "  2. spendscope import create <path>",
        ]
        .join("\n"));
    }

    let count_label = if files.len() == 1 {
        "1 file found.".to_string()
    } else {
        format!("{} files found.", files.len())
    };

    let columns = [
        Column::left("File ID"),
        Column::left("Name"),
        Column::left("Uploaded (local)"),
        Column::right("Rows"),
    ];
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|file| {
            vec![
                str_field(file, "id").to_string(),
                str_field(file, "file_name").to_string(),
                format_uploaded_local(str_field(file, "uploaded_at")),
                u64_field(file, "row_count").to_string(),
            ]
        })
        .collect();

    let mut lines = vec![count_label, String::new()];
    lines.extend(format::render_table(&columns, &rows, format::terminal_width()));
    Ok(lines.join("\n"))
}

pub fn render_import_delete(data: &Value) -> io::Result<String> {
    let file_id = data
        .get("file_id")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("import delete output requires file_id"))?;
    Ok(format!("Deleted file {file_id}."))
}

pub fn render_import_clear(data: &Value) -> io::Result<String> {
    let removed = u64_field(data, "removed");
    Ok(match removed {
        0 => "No files to delete.".to_string(),
        1 => "Deleted 1 file.".to_string(),
        count => format!("Deleted {count} files."),
    })
}

fn format_uploaded_local(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|instant| {
            instant
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| rfc3339.to_string())
}
