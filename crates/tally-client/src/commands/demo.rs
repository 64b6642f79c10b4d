use crate::analysis::policy::DEFAULT_CLUSTER_SEED;
use crate::commands::{anomalies, forecast, patterns};
use crate::contracts::envelope::SuccessEnvelope;
use crate::records::input::ResolvedSource;
use crate::records::load_resolved;
use crate::{ClientError, ClientResult};

const DEMO_FILE_NAME: &str = "demo_expenses.json";
const DEMO_EXPENSES: &str = include_str!("../../data/demo_expenses.json");

/// Runs one analysis over the bundled sample expenses.
pub fn run(topic: &str) -> ClientResult<SuccessEnvelope> {
    let loaded = load_resolved(ResolvedSource::bundled(DEMO_FILE_NAME, DEMO_EXPENSES))?;
    match topic {
        "forecast" => forecast::respond("demo forecast", loaded),
        "patterns" => patterns::respond("demo patterns", loaded, DEFAULT_CLUSTER_SEED),
        "anomalies" => anomalies::respond("demo anomalies", loaded),
        _ => Err(ClientError::invalid_argument_for_command(
            &format!("Unknown demo topic `{topic}`. Use forecast, patterns or anomalies."),
            Some("demo"),
        )),
    }
}
