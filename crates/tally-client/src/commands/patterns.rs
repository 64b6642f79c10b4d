use tracing::info;

use crate::ClientResult;
use crate::analysis::patterns::analyze_patterns;
use crate::analysis::policy::DEFAULT_CLUSTER_SEED;
use crate::commands::common::load_input;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::PatternsData;
use crate::records::LoadedRecords;

#[derive(Debug)]
pub struct PatternsRunOptions {
    pub path: Option<String>,
    pub seed: u64,
    pub stdin_override: Option<String>,
}

impl Default for PatternsRunOptions {
    fn default() -> Self {
        Self {
            path: None,
            seed: DEFAULT_CLUSTER_SEED,
            stdin_override: None,
        }
    }
}

pub fn run(path: Option<&str>, seed: u64) -> ClientResult<SuccessEnvelope> {
    run_with_options(PatternsRunOptions {
        path: path.map(std::string::ToString::to_string),
        seed,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: PatternsRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input("patterns", options.path, options.stdin_override)?;
    respond("patterns", loaded, options.seed)
}

pub(crate) fn respond(
    command: &str,
    loaded: LoadedRecords,
    seed: u64,
) -> ClientResult<SuccessEnvelope> {
    let patterns = analyze_patterns(&loaded.records, seed)?;
    info!(
        k = patterns.k,
        seed,
        excluded = patterns.excluded_unknown_category,
        "pattern analysis complete"
    );
    success(command, PatternsData::from_result(&patterns, loaded.summary))
}
