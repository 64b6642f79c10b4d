pub mod analysis;
pub mod commands;
pub mod contracts;
pub mod error;
mod records;

pub use analysis::{
    AnomalyResult, Category, DEFAULT_CLUSTER_SEED, ExpenseRecord, ForecastResult, KnownCategory,
    PatternResult, analyze_patterns, detect_anomalies, forecast_budget,
};
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use records::parse_records;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
