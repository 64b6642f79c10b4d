pub mod anomalies;
pub mod clustering;
pub mod date;
pub mod forecast;
pub mod normalize;
pub mod patterns;
pub mod policy;
pub mod stats;
pub mod types;

pub use anomalies::{AnomalyFinding, AnomalyMethod, AnomalyResult, detect_anomalies};
pub use forecast::{ForecastMethod, ForecastResult, MonthlyTotal, forecast_budget};
pub use patterns::{CategorySummary, PatternResult, PatternSummary, analyze_patterns};
pub use policy::DEFAULT_CLUSTER_SEED;
pub use types::{Category, ExpenseRecord, KnownCategory};
