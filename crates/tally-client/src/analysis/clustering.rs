use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub initializations: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub inertia: f64,
    pub iterations: usize,
}

/// Scales every column to zero mean and unit population variance. Columns
/// without variance become all zeros.
pub fn standardize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let dimensions = first.len();
    let n = rows.len() as f64;

    let mut scaled = rows.to_vec();
    for column in 0..dimensions {
        let mean = rows.iter().map(|row| row[column]).sum::<f64>() / n;
        let variance = rows
            .iter()
            .map(|row| (row[column] - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        for row in &mut scaled {
            row[column] = if std_dev > f64::EPSILON {
                (row[column] - mean) / std_dev
            } else {
                0.0
            };
        }
    }
    scaled
}

/// Lloyd's k-means with k-means++ seeding. Runs `initializations`
/// independent starts from one seeded generator and keeps the lowest inertia.
pub fn fit_kmeans(points: &[Vec<f64>], params: KMeansParams) -> Option<KMeansFit> {
    if points.is_empty() || params.k == 0 || params.k > points.len() {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<KMeansFit> = None;
    for run in 0..params.initializations.max(1) {
        let initial = kmeans_plus_plus(points, params.k, &mut rng);
        let fit = lloyd(points, initial, params);
        debug!(
            run,
            inertia = fit.inertia,
            iterations = fit.iterations,
            "k-means run finished"
        );

        let replace = match &best {
            Some(current) => fit.inertia < current.inertia,
            None => true,
        };
        if replace {
            best = Some(fit);
        }
    }
    best
}

fn kmeans_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights = points
            .iter()
            .map(|point| nearest_centroid(point, &centroids).1)
            .collect::<Vec<f64>>();
        let total = weights.iter().sum::<f64>();

        let chosen = if total <= f64::EPSILON {
            rng.gen_range(0..points.len())
        } else {
            let target = rng.r#gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut picked = points.len() - 1;
            for (index, weight) in weights.iter().enumerate() {
                cumulative += weight;
                if cumulative >= target && *weight > 0.0 {
                    picked = index;
                    break;
                }
            }
            picked
        };
        centroids.push(points[chosen].clone());
    }
    centroids
}

fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, params: KMeansParams) -> KMeansFit {
    let mut assignments = assign(points, &centroids);
    let mut iterations = 0;

    while iterations < params.max_iterations {
        iterations += 1;
        let updated = recenter(points, &assignments, &centroids);
        let shift = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new).sqrt())
            .fold(0.0_f64, f64::max);
        centroids = updated;

        let next_assignments = assign(points, &centroids);
        let stable = next_assignments == assignments;
        assignments = next_assignments;
        if stable || shift <= params.tolerance {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(&assignments)
        .map(|(point, cluster)| squared_distance(point, &centroids[*cluster]))
        .sum::<f64>();

    KMeansFit {
        assignments,
        centroids,
        inertia,
        iterations,
    }
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest_centroid(point, centroids).0)
        .collect()
}

/// Empty clusters keep their previous centroid.
fn recenter(points: &[Vec<f64>], assignments: &[usize], centroids: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dimensions = centroids.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dimensions]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (point, cluster) in points.iter().zip(assignments) {
        counts[*cluster] += 1;
        for (sum, value) in sums[*cluster].iter_mut().zip(point) {
            *sum += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(centroids)
        .map(|((sum, count), previous)| {
            if count == 0 {
                return previous.clone();
            }
            sum.into_iter().map(|value| value / count as f64).collect()
        })
        .collect()
}

/// Index of the closest centroid (lowest index on ties) and its squared distance.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best
}

fn squared_distance(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}
