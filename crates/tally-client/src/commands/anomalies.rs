use tracing::info;

use crate::ClientResult;
use crate::analysis::anomalies::detect_anomalies;
use crate::commands::common::load_input;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::AnomaliesData;
use crate::records::LoadedRecords;

#[derive(Debug, Default)]
pub struct AnomaliesRunOptions {
    pub path: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(AnomaliesRunOptions {
        path: path.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: AnomaliesRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input("anomalies", options.path, options.stdin_override)?;
    respond("anomalies", loaded)
}

pub(crate) fn respond(command: &str, loaded: LoadedRecords) -> ClientResult<SuccessEnvelope> {
    let anomalies = detect_anomalies(&loaded.records)?;
    info!(
        total_detected = anomalies.total_detected,
        reported = anomalies.findings.len(),
        "anomaly detection complete"
    );
    success(command, AnomaliesData::from_result(&anomalies, loaded.summary))
}
