use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        error: ErrorContract {
            code: error.code().to_string(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        },
        data: error.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{failure_from_error, success};
    use crate::ClientError;

    #[test]
    fn success_wraps_data_with_command_and_version() {
        let envelope = success("forecast", json!({ "value": 1 }));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            assert!(value.ok);
            assert_eq!(value.command, "forecast");
            assert_eq!(value.data["value"], 1);
        }
    }

    #[test]
    fn failure_uses_kind_code_and_keeps_data() {
        let error = ClientError::insufficient_data("anomalies", 5, 4);
        let envelope = failure_from_error(&error);
        assert!(!envelope.ok);
        assert_eq!(envelope.error.code, "insufficient_data");
        assert!(envelope.data.is_some());
    }
}
