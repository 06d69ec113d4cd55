use super::{Clusterer, EngineError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[inline]
fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Centroid-based clustering of 2D points.
///
/// Each of the `n_init` runs seeds centroids with k-means++ and refines them
/// with Lloyd iterations; the run with the lowest inertia wins. Runs are
/// driven by a ChaCha8 generator, so a fixed seed reproduces the labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    pub n_init: usize,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

struct Run {
    labels: Vec<usize>,
    inertia: f64,
}

impl KMeans {
    fn run(&self, points: &[[f64; 2]], k: usize, rng: &mut ChaCha8Rng) -> Run {
        let mut centroids = plus_plus_init(points, k, rng);
        let mut labels = vec![0usize; points.len()];

        for _ in 0..self.max_iter {
            assign(points, &centroids, &mut labels);
            let updated = recompute(points, &labels, &centroids);
            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b))
                .fold(0.0, f64::max);
            centroids = updated;
            if shift <= self.tol * self.tol {
                break;
            }
        }

        let inertia = assign(points, &centroids, &mut labels);
        Run { labels, inertia }
    }
}

impl Clusterer for KMeans {
    fn cluster(
        &self,
        points: &[[f64; 2]],
        k: usize,
        seed: Option<u64>,
    ) -> Result<Vec<usize>, EngineError> {
        if k == 0 {
            return Err(EngineError::new("number of clusters must be at least 1"));
        }
        if points.len() < k {
            return Err(EngineError::new(format!(
                "{} points cannot be split into {} clusters",
                points.len(),
                k
            )));
        }

        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut best: Option<Run> = None;
        for _ in 0..self.n_init.max(1) {
            let run = self.run(points, k, &mut rng);
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        Ok(best.map(|b| b.labels).unwrap_or_default())
    }
}

fn plus_plus_init(points: &[[f64; 2]], k: usize, rng: &mut ChaCha8Rng) -> Vec<[f64; 2]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (i, &d) in nearest.iter().enumerate() {
                if target < d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            rng.random_range(0..points.len())
        };

        let centroid = points[next];
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

/// Assigns each point to its nearest centroid and returns the inertia.
fn assign(points: &[[f64; 2]], centroids: &[[f64; 2]], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        let (best, dist) = centroids
            .iter()
            .enumerate()
            .map(|(c, centroid)| (c, squared_distance(p, centroid)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0, 0.0));
        *label = best;
        inertia += dist;
    }
    inertia
}

/// Mean of each cluster; an emptied cluster takes the point farthest from its own centroid.
fn recompute(points: &[[f64; 2]], labels: &[usize], previous: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 2]; k];
    let mut counts = vec![0usize; k];
    for (p, &l) in points.iter().zip(labels) {
        sums[l][0] += p[0];
        sums[l][1] += p[1];
        counts[l] += 1;
    }

    let mut centroids: Vec<[f64; 2]> = sums
        .iter()
        .zip(&counts)
        .zip(previous)
        .map(|((s, &c), prev)| {
            if c > 0 {
                [s[0] / c as f64, s[1] / c as f64]
            } else {
                *prev
            }
        })
        .collect();

    for c in (0..k).filter(|&c| counts[c] == 0) {
        let far = (0..points.len()).max_by(|&a, &b| {
            squared_distance(&points[a], &centroids[labels[a]])
                .total_cmp(&squared_distance(&points[b], &centroids[labels[b]]))
        });
        if let Some(i) = far {
            centroids[c] = points[i];
        }
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn blobs() -> Vec<[f64; 2]> {
        let centres = [[0.0, 0.0], [10.0, 10.0], [-10.0, 10.0]];
        let mut pts = Vec::new();
        for c in centres {
            for i in 0..6 {
                let o = i as f64 * 0.1;
                pts.push([c[0] + o, c[1] - o]);
            }
        }
        pts
    }

    #[test]
    fn finds_separated_blobs() {
        let labels = KMeans::default().cluster(&blobs(), 3, Some(7)).unwrap();
        assert_eq!(labels.len(), 18);
        for chunk in labels.chunks(6) {
            assert!(chunk.iter().all(|&l| l == chunk[0]));
        }
        let distinct: BTreeSet<_> = labels.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = KMeans::default().cluster(&blobs(), 4, Some(42)).unwrap();
        let b = KMeans::default().cluster(&blobs(), 4, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn labels_stay_in_range() {
        let labels = KMeans::default().cluster(&blobs(), 5, Some(1)).unwrap();
        assert!(labels.iter().all(|&l| l < 5));
    }

    #[test]
    fn rejects_zero_clusters() {
        assert!(KMeans::default().cluster(&blobs(), 0, None).is_err());
    }

    #[test]
    fn rejects_more_clusters_than_points() {
        let err = KMeans::default()
            .cluster(&[[0.0, 0.0], [1.0, 1.0]], 3, None)
            .unwrap_err();
        assert!(err.message().contains("3 clusters"));
    }

    #[test]
    fn single_cluster_labels_everything_zero() {
        let labels = KMeans::default().cluster(&blobs(), 1, None).unwrap();
        assert!(labels.iter().all(|&l| l == 0));
    }
}
