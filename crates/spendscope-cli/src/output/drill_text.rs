use std::io;

use serde_json::Value;

use super::format::{
    self, Column, array_field, bar, f64_field, money, percent, str_field, u64_field,
};

pub fn render_drill(data: &Value) -> io::Result<String> {
    let view = data
        .get("view")
        .filter(|view| view.is_object())
        .ok_or_else(|| io::Error::other("drill output requires view"))?;

    let mut lines = header_lines(data);

    for notice in array_field(data, "notices") {
        lines.push(format!("Note: {}", str_field(notice, "message")));
    }
    for warning in array_field(data, "warnings").iter().filter_map(Value::as_str) {
        lines.push(format!("Warning: {warning}"));
    }

    lines.push(String::new());
    if data.get("empty").and_then(Value::as_bool).unwrap_or(false) {
        lines.push(str_field(data, "message").to_string());
        return Ok(lines.join("\n"));
    }

    let crumbs: Vec<&str> = array_field(data, "breadcrumb")
        .iter()
        .map(|crumb| str_field(crumb, "name"))
        .collect();
    lines.push(format!("Path: {}", crumbs.join(" > ")));
    lines.push(format!(
        "{}: {} ({} transactions)",
        str_field(view, "name"),
        money(f64_field(view, "total")),
        u64_field(view, "transaction_count")
    ));
    lines.push(String::new());
    lines.extend(render_rings(view));

    if let Some(selection) = data.get("selection").filter(|selection| selection.is_object()) {
        lines.push(String::new());
        lines.extend(render_selection(selection));
    }

    Ok(lines.join("\n"))
}

fn header_lines(data: &Value) -> Vec<String> {
    let range = data.get("range").unwrap_or(&Value::Null);
    let filters = data.get("filters").unwrap_or(&Value::Null);

    let mut entries = vec![
        ("File:", str_field(data, "file_name").to_string()),
        (
            "Range:",
            format!(
                "{} ({} to {})",
                str_field(range, "label"),
                date_part(str_field(range, "start")),
                date_part(str_field(range, "end"))
            ),
        ),
    ];

    let excluded: Vec<&str> = array_field(filters, "excluded")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    if !excluded.is_empty() {
        entries.push(("Excluding:", excluded.join(", ")));
    }
    let shown = match (
        filters.get("show_income").and_then(Value::as_bool).unwrap_or(true),
        filters.get("show_expense").and_then(Value::as_bool).unwrap_or(true),
    ) {
        (true, true) => None,
        (true, false) => Some("income only"),
        (false, true) => Some("expenses only"),
        (false, false) => Some("nothing (income and expenses hidden)"),
    };
    if let Some(shown) = shown {
        entries.push(("Showing:", shown.to_string()));
    }

    format::key_value_rows(&entries, 0)
}

/// The display node's children, each followed by its own children indented;
/// the same two rings the chart draws.
fn render_rings(view: &Value) -> Vec<String> {
    let columns = [
        Column::left("Category"),
        Column::left("Node"),
        Column::right("Total"),
        Column::right("Share"),
        Column::left(""),
    ];

    let mut rows = Vec::new();
    for child in array_field(view, "children") {
        rows.push(ring_row(child, ""));
        for grandchild in array_field(child, "children") {
            rows.push(ring_row(grandchild, "  "));
        }
    }

    format::render_table(&columns, &rows, format::terminal_width())
}

fn ring_row(node: &Value, indent: &str) -> Vec<String> {
    let share = f64_field(node, "share");
    vec![
        format!("{indent}{}", str_field(node, "name")),
        str_field(node, "id").to_string(),
        money(f64_field(node, "total")),
        percent(share),
        bar(share),
    ]
}

fn render_selection(selection: &Value) -> Vec<String> {
    let transactions = array_field(selection, "transactions");
    let mut lines = vec![format!(
        "Selected: {} {} ({} of total, {} transactions)",
        str_field(selection, "name"),
        money(f64_field(selection, "total")),
        percent(f64_field(selection, "share")),
        transactions.len()
    )];

    let columns = [
        Column::left("Date"),
        Column::left("Description"),
        Column::left("Category"),
        Column::left("Account"),
        Column::right("Amount"),
    ];
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|row| {
            vec![
                str_field(row, "date").to_string(),
                str_field(row, "description").to_string(),
                str_field(row, "category").to_string(),
                str_field(row, "account").to_string(),
                money(f64_field(row, "amount")),
            ]
        })
        .collect();
    lines.extend(format::render_table(&columns, &rows, format::terminal_width()));
    lines
}

fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
