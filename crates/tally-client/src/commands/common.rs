use tracing::info;

use crate::ClientResult;
use crate::records::{self, LoadedRecords};

/// Commands exposed by the `tally` binary.
pub const COMMANDS: [&str; 5] = ["forecast", "patterns", "anomalies", "health", "demo"];

pub(crate) fn load_input(
    command: &str,
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<LoadedRecords> {
    let loaded = records::load(path, stdin_override)?;
    info!(
        command,
        records = loaded.records.len(),
        source = %loaded.summary.source_used,
        "running analysis"
    );
    Ok(loaded)
}
