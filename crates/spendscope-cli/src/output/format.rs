use std::cmp;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const BAR_WIDTH: usize = 24;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(100);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Two decimals with thousands separators: `1,234.50`, `-30.00`.
pub fn money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    format!("{sign}{grouped}.{cents}")
}

pub fn percent(share: f64) -> String {
    format!("{share:.1}%")
}

/// Horizontal bar proportional to `share` (0..=100).
pub fn bar(share: f64) -> String {
    let filled = ((share.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn f64_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Renders a padded table; cells wider than their share of `max_width` are
/// cut with `...` so every row stays on one line.
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], max_width: usize) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = columns.iter().map(|column| column.name.chars().count()).collect();
    for row in rows {
        for (slot, cell) in widths.iter_mut().zip(row) {
            *slot = cmp::max(*slot, cell.chars().count());
        }
    }
    let budget = max_width
        .saturating_sub(INDENT)
        .saturating_sub(COLUMN_GAP * columns.len().saturating_sub(1));
    shrink_widest(&mut widths, budget);

    let header: Vec<String> = columns.iter().map(|column| column.name.to_string()).collect();
    std::iter::once(&header)
        .chain(rows)
        .map(|cells| format_row(columns, cells, &widths))
        .collect()
}

fn shrink_widest(widths: &mut [usize], budget: usize) {
    const FLOOR: usize = 6;
    while widths.iter().sum::<usize>() > budget {
        let Some(widest) = widths
            .iter_mut()
            .filter(|width| **width > FLOOR)
            .max_by_key(|width| **width)
        else {
            return;
        };
        *widest -= 1;
    }
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces: Vec<String> = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, &width))| {
            let value = truncate(cells.get(index).map(String::as_str).unwrap_or(""), width);
            match column.align {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect();

    format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)))
        .trim_end()
        .to_string()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }
    let kept: String = value.chars().take(width - 3).collect();
    format!("{kept}...")
}
