use std::io;

use serde_json::Value;

use super::format::{array_field, str_field};

pub fn render_categories(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("categories output requires rows"))?;

    if rows.is_empty() {
        return Ok("No categories in this file.".to_string());
    }

    let mut lines = vec!["Categories ([x] excluded, [-] excluded with its group):".to_string()];
    for row in rows {
        let excluded = row.get("excluded").and_then(Value::as_bool).unwrap_or(false);
        let locked = row.get("locked").and_then(Value::as_bool).unwrap_or(false);
        let mark = match (excluded, locked) {
            (_, true) => "[-]",
            (true, false) => "[x]",
            (false, false) => "[ ]",
        };
        let line = match str_field(row, "kind") {
            "item" => format!("    {mark} {}  ({})", str_field(row, "name"), str_field(row, "label")),
            _ => format!("  {mark} {}", str_field(row, "name")),
        };
        lines.push(line);
    }

    let excluded: Vec<&str> = array_field(data, "excluded")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    lines.push(String::new());
    if excluded.is_empty() {
        lines.push("Nothing excluded.".to_string());
    } else {
        lines.push("Exclusion list:".to_string());
        let flags: Vec<String> = excluded
            .iter()
            .map(|label| format!("--exclude \"{label}\""))
            .collect();
        lines.push(format!("  {}", flags.join(" ")));
    }

    Ok(lines.join("\n"))
}
