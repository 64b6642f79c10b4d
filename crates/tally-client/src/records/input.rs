use std::fs;
use std::io::{IsTerminal, Read};

use tracing::debug;

use crate::records::invalid_input_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
    Bundled,
}

impl SourceKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
            Self::Bundled => "bundled_sample",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

impl ResolvedSource {
    pub(crate) fn bundled(name: &str, content: &str) -> Self {
        Self {
            kind: SourceKind::Bundled,
            source_ref: Some(name.to_string()),
            content: content.to_string(),
        }
    }
}

/// Picks the record source: a file path, `-` for stdin, or piped stdin when
/// no path is given. Supplying both a file and stdin is rejected.
pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    let stdin_body = read_stdin(stdin_override)?;
    let has_stdin = stdin_body
        .as_ref()
        .is_some_and(|value| !value.trim().is_empty());

    if let Some(path_value) = path {
        if path_value == "-" {
            if let Some(stdin_value) = stdin_body
                && !stdin_value.trim().is_empty()
            {
                return Ok(stdin_source(stdin_value));
            }

            return Err(invalid_input_error(
                "Path `-` means stdin input, but stdin was empty. Pipe JSON/CSV records or pass a file path.",
            ));
        }

        let file_body = fs::read_to_string(&path_value).map_err(|error| {
            ClientError::invalid_input_with_recovery(
                &format!("Could not read expense file `{path_value}`: {error}"),
                vec![
                    "Verify the path exists and is readable.".to_string(),
                    "Or pipe the records via stdin instead.".to_string(),
                ],
            )
        })?;

        if has_stdin {
            return Err(invalid_input_error(
                "Both stdin and file input were provided. Pass exactly one source: either a file path or piped stdin.",
            ));
        }

        debug!(path = %path_value, bytes = file_body.len(), "read expense file");
        return Ok(ResolvedSource {
            kind: SourceKind::File,
            source_ref: Some(path_value),
            content: file_body,
        });
    }

    if let Some(stdin_value) = stdin_body
        && !stdin_value.trim().is_empty()
    {
        return Ok(stdin_source(stdin_value));
    }

    Err(invalid_input_error(
        "No expense source provided. Pass a file path or pipe records via stdin.",
    ))
}

fn stdin_source(content: String) -> ResolvedSource {
    debug!(bytes = content.len(), "read expense records from stdin");
    ResolvedSource {
        kind: SourceKind::Stdin,
        source_ref: None,
        content,
    }
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            ClientError::invalid_input_with_recovery(
                &format!("Could not read stdin: {error}"),
                vec![
                    "Retry with an explicit file path argument.".to_string(),
                    "Or rerun with valid stdin content.".to_string(),
                ],
            )
        })?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}
