#[derive(Debug, Clone, Copy)]
pub struct ForecastPolicy {
    pub min_records: usize,
    pub min_distinct_months: usize,
    pub days_per_month: f64,
    pub simple_average_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl ForecastPolicy {
    pub fn confidence_from_r2(self, r2: f64) -> f64 {
        r2.clamp(self.min_confidence, self.max_confidence)
    }
}

pub const FORECAST_POLICY_V1: ForecastPolicy = ForecastPolicy {
    min_records: 3,
    min_distinct_months: 2,
    days_per_month: 30.0,
    simple_average_confidence: 0.6,
    min_confidence: 0.5,
    max_confidence: 0.95,
};

#[derive(Debug, Clone, Copy)]
pub struct PatternsPolicy {
    pub min_records: usize,
    pub records_per_cluster: usize,
    pub min_clusters: usize,
    pub max_clusters: usize,
    pub initializations: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl PatternsPolicy {
    /// `floor(n / records_per_cluster)` clamped to the cluster bounds, never above `n`.
    pub fn cluster_count(self, n: usize) -> usize {
        let by_size = n / self.records_per_cluster;
        by_size
            .clamp(self.min_clusters, self.max_clusters)
            .min(n)
    }
}

pub const PATTERNS_POLICY_V1: PatternsPolicy = PatternsPolicy {
    min_records: 5,
    records_per_cluster: 3,
    min_clusters: 2,
    max_clusters: 5,
    initializations: 10,
    max_iterations: 300,
    tolerance: 1e-4,
};

pub const DEFAULT_CLUSTER_SEED: u64 = 42;

#[derive(Debug, Clone, Copy)]
pub struct AnomaliesPolicy {
    pub min_records: usize,
    pub z_score_threshold: f64,
    pub category_std_multiplier: f64,
    pub min_category_members: usize,
    pub report_limit: usize,
}

impl AnomaliesPolicy {
    pub fn exceeds_z_threshold(self, z_score: f64) -> bool {
        z_score > self.z_score_threshold
    }

    pub fn category_ceiling(self, category_mean: f64, category_std: f64) -> f64 {
        category_mean + self.category_std_multiplier * category_std
    }
}

pub const ANOMALIES_POLICY_V1: AnomaliesPolicy = AnomaliesPolicy {
    min_records: 5,
    z_score_threshold: 2.5,
    category_std_multiplier: 2.0,
    min_category_members: 2,
    report_limit: 10,
};
