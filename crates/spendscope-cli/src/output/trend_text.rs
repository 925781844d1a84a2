use std::io;

use serde_json::Value;

use super::format::{self, Column, array_field, f64_field, money, str_field};

const TREND_BAR_WIDTH: f64 = 30.0;

pub fn render_trend(data: &Value) -> io::Result<String> {
    let buckets = data
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("trend output requires buckets"))?;

    let range = data.get("range").unwrap_or(&Value::Null);
    let mut lines = format::key_value_rows(
        &[
            ("File:", str_field(data, "file_name").to_string()),
            ("Range:", str_field(range, "label").to_string()),
            ("Grouped by:", str_field(data, "group_by").to_string()),
        ],
        0,
    );

    let series = array_field(data, "series");
    if !series.is_empty() {
        let legend: Vec<String> = series
            .iter()
            .map(|entry| {
                let hidden = entry.get("hidden").and_then(Value::as_bool).unwrap_or(false);
                if hidden {
                    format!("{} (hidden)", str_field(entry, "name"))
                } else {
                    str_field(entry, "name").to_string()
                }
            })
            .collect();
        lines.push(format!("Series:      {}", legend.join(", ")));
    }

    lines.push(String::new());
    if buckets.is_empty() {
        lines.push(str_field(data, "message").to_string());
        return Ok(lines.join("\n"));
    }

    let peak = buckets
        .iter()
        .map(|bucket| f64_field(bucket, "total"))
        .fold(0.0_f64, f64::max);
    let columns = [Column::left("Period"), Column::right("Total"), Column::left("")];
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|bucket| {
            let total = f64_field(bucket, "total");
            vec![
                str_field(bucket, "label").to_string(),
                money(total),
                scaled_bar(total, peak),
            ]
        })
        .collect();
    lines.extend(format::render_table(&columns, &rows, format::terminal_width()));

    if let Some(slice) = data.get("slice").filter(|slice| slice.is_object()) {
        lines.push(String::new());
        lines.extend(render_slice(slice));
    }

    Ok(lines.join("\n"))
}

fn scaled_bar(total: f64, peak: f64) -> String {
    if peak <= 0.0 {
        return String::new();
    }
    "#".repeat(((total / peak) * TREND_BAR_WIDTH).round() as usize)
}

fn render_slice(slice: &Value) -> Vec<String> {
    let transactions = array_field(slice, "transactions");
    let mut lines = vec![format!(
        "{} ({} to {}): {} across {} transactions",
        str_field(slice, "label"),
        str_field(slice, "start"),
        str_field(slice, "end"),
        money(f64_field(slice, "total")),
        transactions.len()
    )];

    let columns = [
        Column::left("Date"),
        Column::left("Description"),
        Column::left("Category"),
        Column::right("Amount"),
    ];
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|row| {
            vec![
                str_field(row, "date").to_string(),
                str_field(row, "description").to_string(),
                str_field(row, "category").to_string(),
                money(f64_field(row, "amount")),
            ]
        })
        .collect();
    lines.extend(format::render_table(&columns, &rows, format::terminal_width()));
    lines
}
