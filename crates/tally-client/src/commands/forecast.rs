use tracing::info;

use crate::ClientResult;
use crate::analysis::forecast::forecast_budget;
use crate::commands::common::load_input;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ForecastData;
use crate::records::LoadedRecords;

#[derive(Debug, Default)]
pub struct ForecastRunOptions {
    pub path: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ForecastRunOptions {
        path: path.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ForecastRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input("forecast", options.path, options.stdin_override)?;
    respond("forecast", loaded)
}

pub(crate) fn respond(command: &str, loaded: LoadedRecords) -> ClientResult<SuccessEnvelope> {
    let forecast = forecast_budget(&loaded.records)?;
    info!(
        method = forecast.method.as_str(),
        predicted = forecast.predicted_amount,
        "forecast complete"
    );
    success(command, ForecastData::from_result(&forecast, loaded.summary))
}
