// Seeded k-means over f64 vectors.
//
// Determinism contract: identical points + identical seed + identical k
// always produce the identical partition. All randomness flows through a
// single StdRng seeded from the caller's seed; the restarts draw from that
// one stream in order, and the lowest-inertia restart wins (first on ties).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tuning knobs for one partition run.
#[derive(Debug, Clone)]
pub struct KMeansParams {
    /// Number of clusters. Caller guarantees 1 <= k <= points.len().
    pub k: usize,
    /// Seed for centroid initialization.
    pub seed: u64,
    /// Independent initializations; the lowest-inertia result is kept.
    pub restarts: usize,
    /// Iteration cap per restart.
    pub max_iterations: usize,
}

impl KMeansParams {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            restarts: 10,
            max_iterations: 100,
        }
    }
}

/// Partition `points` into `params.k` clusters, minimizing within-cluster
/// sum of squared distances. Returns one cluster id in [0, k) per point.
pub fn partition(points: &[Vec<f64>], params: &KMeansParams) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    if params.k <= 1 {
        return vec![0; points.len()];
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<(f64, Vec<usize>)> = None;

    for _ in 0..params.restarts.max(1) {
        let (inertia, assignment) =
            run_once(points, params.k, params.max_iterations.max(1), &mut rng);
        let better = best.as_ref().is_none_or(|(b, _)| inertia < *b);
        if better {
            best = Some((inertia, assignment));
        }
    }

    match best {
        Some((_, assignment)) => assignment,
        None => vec![0; points.len()],
    }
}

/// One Lloyd's-algorithm run from a fresh k-means++ initialization.
fn run_once(
    points: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    rng: &mut StdRng,
) -> (f64, Vec<usize>) {
    let dim = points[0].len();
    let mut centroids = init_plus_plus(points, k, rng);
    let mut assignment = vec![usize::MAX; points.len()];

    for _ in 0..max_iterations {
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let nearest = nearest_centroid(point, &centroids);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        // Recompute centroids. An empty cluster keeps its previous centroid
        // — empty clusters are permitted and simply attract no points.
        let mut sums = vec![vec![0.0_f64; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(assignment.iter()) {
            counts[cluster] += 1;
            for (s, v) in sums[cluster].iter_mut().zip(point.iter()) {
                *s += v;
            }
        }
        for (cluster, count) in counts.iter().enumerate() {
            if *count > 0 {
                for (c, s) in centroids[cluster].iter_mut().zip(sums[cluster].iter()) {
                    *c = s / *count as f64;
                }
            }
        }
    }

    let inertia = points
        .iter()
        .zip(assignment.iter())
        .map(|(point, &cluster)| squared_distance(point, &centroids[cluster]))
        .sum();

    (inertia, assignment)
}

/// k-means++ initialization: first centroid uniform, each further centroid
/// drawn with probability proportional to squared distance from the nearest
/// already-chosen centroid.
fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);

    let first = rng.random_range(0..points.len());
    centroids.push(points[first].clone());

    let mut dist2: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = dist2.iter().sum();
        let next = if total <= f64::EPSILON {
            // Every remaining point coincides with a centroid; pick uniformly.
            rng.random_range(0..points.len())
        } else {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (i, d) in dist2.iter().enumerate() {
                target -= d;
                if target <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        centroids.push(points[next].clone());
        for (d, p) in dist2.iter_mut().zip(points.iter()) {
            let nd = squared_distance(p, centroids.last().unwrap_or(&centroids[0]));
            if nd < *d {
                *d = nd;
            }
        }
    }

    centroids
}

/// Index of the closest centroid; ties resolve to the lowest index.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(center: f64, n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| vec![center + i as f64 * 0.01, center - i as f64 * 0.01])
            .collect()
    }

    #[test]
    fn k_equals_one_puts_everything_in_cluster_zero() {
        let points = blob(0.0, 5);
        let assignment = partition(&points, &KMeansParams::new(1, 0));
        assert_eq!(assignment, vec![0; 5]);
    }

    #[test]
    fn separates_two_obvious_blobs() {
        let mut points = blob(0.0, 5);
        points.extend(blob(100.0, 5));
        let assignment = partition(&points, &KMeansParams::new(2, 0));

        let first = assignment[0];
        assert!(assignment[..5].iter().all(|&c| c == first));
        let second = assignment[5];
        assert!(assignment[5..].iter().all(|&c| c == second));
        assert_ne!(first, second);
    }

    #[test]
    fn same_seed_same_partition() {
        let mut points = blob(0.0, 8);
        points.extend(blob(10.0, 8));
        points.extend(blob(-30.0, 8));

        let params = KMeansParams::new(3, 42);
        let a = partition(&points, &params);
        let b = partition(&points, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn all_ids_in_range() {
        let mut points = blob(0.0, 4);
        points.extend(blob(50.0, 4));
        let k = 3;
        let assignment = partition(&points, &KMeansParams::new(k, 7));
        assert_eq!(assignment.len(), points.len());
        assert!(assignment.iter().all(|&c| c < k));
    }

    #[test]
    fn k_equals_point_count_is_valid() {
        let points = vec![vec![0.0], vec![10.0], vec![20.0]];
        let assignment = partition(&points, &KMeansParams::new(3, 0));
        assert_eq!(assignment.len(), 3);
        assert!(assignment.iter().all(|&c| c < 3));
    }

    #[test]
    fn identical_points_do_not_hang() {
        let points = vec![vec![1.0, 1.0]; 6];
        let assignment = partition(&points, &KMeansParams::new(3, 0));
        assert_eq!(assignment.len(), 6);
        assert!(assignment.iter().all(|&c| c < 3));
    }

    #[test]
    fn empty_input_yields_empty_assignment() {
        let points: Vec<Vec<f64>> = Vec::new();
        assert!(partition(&points, &KMeansParams::new(1, 0)).is_empty());
    }
}
