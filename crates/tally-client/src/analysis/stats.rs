pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation over the whole population (divides by n).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let center = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Standard deviation with Bessel's correction (divides by n - 1).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let center = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::{mean, population_std_dev, round_to, sample_std_dev};

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_std_dev(&[]), None);
    }

    #[test]
    fn population_and_sample_deviation_differ_by_divisor() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values), Some(2.0));
        let sample = sample_std_dev(&values).unwrap_or(0.0);
        assert!((sample - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn sample_deviation_needs_two_values() {
        assert_eq!(sample_std_dev(&[3.0]), None);
    }

    #[test]
    fn rounds_to_requested_decimals() {
        assert_eq!(round_to(2.3456, 2), 2.35);
        assert_eq!(round_to(-1.005_1, 2), -1.01);
    }
}
