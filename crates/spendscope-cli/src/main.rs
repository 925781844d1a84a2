mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use spendscope_client::ClientError;
use stdout_io::write_stdout_line;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV_VAR: &str = "SPENDSCOPE_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

const TOP_LEVEL_HELP: &str = "Spendscope - drill into spending by category

USAGE: spendscope <command>

Import a CSV export:
  spendscope import create --help                  Read the CSV format
  spendscope import create <path>                  Import a file
  spendscope import list                           List imported files

Explore a file:
  spendscope drill <file-id>                       Category breakdown for this month
  spendscope drill <file-id> --click Food          Zoom into a group
  spendscope categories <file-id>                  Categories and exclusion state
  spendscope trend <file-id> --group-by month      Spending over time

Other commands:
  spendscope import delete <file-id>               Delete one file
  spendscope import clear                          Delete every file

Add --json to any command for machine-readable output.
Set SPENDSCOPE_HOME to change where files are stored (default ~/.spendscope).
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

/// Logs go to stderr so stdout stays parseable under `--json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 || is_top_level_help_request(&raw_args) {
        if write_stdout_line(TOP_LEVEL_HELP.trim_end()).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return Err(report_parse_error(&err, &raw_args)),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

/// Help and version requests print and succeed; everything else becomes an
/// `invalid_argument` failure in the requested output mode.
fn report_parse_error(err: &clap::Error, raw_args: &[String]) -> ExitCode {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        return match write_stdout_line(err.to_string().trim_end()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::from(2),
        };
    }

    let command_hint = command_path_from_args(raw_args);
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error =
        ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return ExitCode::from(2);
    }
    ExitCode::from(1)
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines; the
/// recovery steps carry that guidance instead.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = match message.find("\n\nUsage:") {
        Some(pos) => &message[..pos],
        None => match message.find("\nFor more information") {
            Some(pos) => &message[..pos],
            None => message,
        },
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let words: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match words.as_slice() {
        ["import", "create", ..] => "import create",
        ["import", "list", ..] => "import list",
        ["import", "delete", ..] => "import delete",
        ["import", "clear", ..] => "import clear",
        ["import", ..] => "import",
        ["drill", ..] => "drill",
        ["categories", ..] => "categories",
        ["trend", ..] => "trend",
        _ => return None,
    };
    Some(hint.to_string())
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_user_error() {
        ExitCode::from(1)
    } else {
        ExitCode::from(2)
    }
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, infer_requested_output_mode, strip_clap_boilerplate};
    use crate::output::OutputMode;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_hint_follows_subcommand_words() {
        assert_eq!(
            command_path_from_args(&args(&["spendscope", "import", "delete", "--json"])),
            Some("import delete".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["spendscope", "drill", "file_1", "--click", "Food"])),
            Some("drill".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["spendscope", "nope"])), None);
    }

    #[test]
    fn clap_usage_tail_is_removed() {
        let message = "error: unexpected argument '--nope' found\n\nUsage: spendscope drill <FILE_ID>\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(message),
            "unexpected argument '--nope' found"
        );
    }

    #[test]
    fn json_flag_anywhere_selects_json_errors() {
        assert_eq!(
            infer_requested_output_mode(&args(&["spendscope", "trend", "--json", "--group-by", "year"])),
            OutputMode::Json
        );
        assert_eq!(
            infer_requested_output_mode(&args(&["spendscope", "trend"])),
            OutputMode::Text
        );
    }
}
