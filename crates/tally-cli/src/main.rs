mod cli;
mod dispatch;
mod output;

use std::io;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use output::write_stdout_text;
use tally_client::ClientError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_ENV_VAR: &str = "TALLY_LOG";

const ROOT_HELP: &str = "Tally - expense analytics

Usage:
  tally <command> [path]

Start here:
  tally demo forecast
  tally forecast --help
";

const TOP_LEVEL_HELP: &str = "Tally - expense analytics

USAGE: tally <command> [path] [--json]

Try it on bundled sample data:
  tally demo forecast                     Forecast next month's spending
  tally demo patterns                     Group spending into patterns
  tally demo anomalies                    Flag unusual transactions

Analyze your own expenses (JSON or CSV file, or `-` for stdin):
  tally forecast <path>                   Next month's budget (3+ records)
  tally patterns <path> [--seed N]        Spending patterns via k-means (5+ records)
  tally anomalies <path>                  Unusually large transactions (5+ records)

Other commands:
  tally health                            Check that the analysis core is ready

Add --json to any command for machine-readable output.
Set TALLY_LOG=debug to trace what the analysis is doing (logs go to stderr).
Run `tally <command> --help` for input format details.
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
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
            tracing::debug!(code = error.code(), "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let command_hint = command_path_from_args(raw_args);
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines; recovery
/// steps replace them.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    let hint = match non_flags.as_slice() {
        ["demo", topic @ ("forecast" | "patterns" | "anomalies"), ..] => {
            return Some(format!("demo {topic}"));
        }
        ["demo", ..] => "demo",
        ["forecast", ..] => "forecast",
        ["patterns", ..] => "patterns",
        ["anomalies", ..] => "anomalies",
        ["health", ..] => "health",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.kind.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_hint_follows_subcommand_path() {
        assert_eq!(
            command_path_from_args(&args(&["tally", "patterns", "--seed", "x"])),
            Some("patterns".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["tally", "demo", "anomalies", "--bogus"])),
            Some("demo anomalies".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["tally", "demo", "dash"])),
            Some("demo".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["tally", "report"])), None);
    }

    #[test]
    fn clap_boilerplate_is_removed() {
        let message = "error: unexpected argument '--bogus' found\n\nUsage: tally health [OPTIONS]\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: unexpected argument '--bogus' found"
        );
    }
}
