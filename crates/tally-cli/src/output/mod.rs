mod analysis_text;
mod error_text;
mod format;
mod json;
mod mode;

use std::io::{self, Write};

use tally_client::{ClientError, SuccessEnvelope};

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

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    tolerate_broken_pipe(stdout.write_all(text.as_bytes()))?;
    tolerate_broken_pipe(stdout.flush())
}

fn write_stdout_line(text: &str) -> io::Result<()> {
    write_stdout_text(&format!("{text}\n"))
}

/// A closed downstream pipe (e.g. `tally anomalies | head`) is not an error.
fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "forecast" | "demo forecast" => analysis_text::render_forecast(&success.data),
        "patterns" | "demo patterns" => analysis_text::render_patterns(&success.data),
        "anomalies" | "demo anomalies" => analysis_text::render_anomalies(&success.data),
        "health" => analysis_text::render_health(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
