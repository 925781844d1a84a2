mod categories_text;
mod drill_text;
mod error_text;
mod format;
mod import_text;
mod json;
mod mode;
mod trend_text;

use std::io;

use spendscope_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "import create" => import_text::render_import_create(&success.data),
        "import list" => import_text::render_import_list(&success.data),
        "import delete" => import_text::render_import_delete(&success.data),
        "import clear" => import_text::render_import_clear(&success.data),
        "drill" => drill_text::render_drill(&success.data),
        "categories" => categories_text::render_categories(&success.data),
        "trend" => trend_text::render_trend(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
