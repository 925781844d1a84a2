use spendscope_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let missing = error
        .data
        .as_ref()
        .and_then(|data| data.get("missing_headers"))
        .and_then(|value| value.as_array())
        .map(|headers| {
            headers
                .iter()
                .filter_map(|header| header.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });
    if let Some(missing) = missing.filter(|text| !text.is_empty()) {
        lines.push(format!("  Missing:  {missing}"));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
