use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::HealthData;
use crate::{API_VERSION, ClientResult};

use super::common::COMMANDS;

pub fn run() -> ClientResult<SuccessEnvelope> {
    let data = HealthData {
        status: "OK".to_string(),
        message: "Analysis core is ready".to_string(),
        version: API_VERSION.to_string(),
        commands: COMMANDS.iter().map(|name| name.to_string()).collect(),
    };
    success("health", data)
}
