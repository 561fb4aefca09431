use log::{debug, info, warn};
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::config::{EmptyClusterPolicy, KMeansConfig};
use crate::error::{KMeansError, Result};

/// Outcome of one call to [`run`]. The centroids themselves are written
/// back into the matrix handed to `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Iterations executed, in `1..=max_iter`.
    pub iterations: usize,
    /// True if the loop stopped because no centroid component changed.
    pub converged: bool,
    /// Cluster index of every observation from the last assignment step.
    pub assignments: Vec<usize>,
    /// Number of times a cluster came out of an assignment step empty.
    pub empty_clusters: usize,
}

/// Squared Euclidean distance between two points of equal length.
#[inline]
pub fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Index of the centroid closest to `point`. Ties go to the lowest index.
#[inline]
pub fn nearest_centroid(point: ArrayView1<f64>, centroids: ArrayView2<f64>) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (ci, centroid) in centroids.outer_iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = ci;
        }
    }
    best_cluster
}

/// Lloyd's k-means: assign every observation to its nearest centroid,
/// move each centroid to the mean of its observations, and repeat until an
/// iteration leaves every centroid component bit-for-bit unchanged or
/// `config.max_iter` iterations have run.
///
/// `observations` must be `n × d` and `centroids` `k × d` as described by
/// `config`; `centroids` holds the starting positions on entry and the
/// final positions on return.
pub fn run(
    observations: ArrayView2<f64>,
    centroids: &mut Array2<f64>,
    config: &KMeansConfig,
) -> Result<RunSummary> {
    config.validate()?;
    check_shape("observations", observations.dim(), (config.n, config.d))?;
    check_shape("centroids", centroids.dim(), (config.k, config.d))?;

    let (k, d) = (config.k, config.d);
    let mut previous = Array2::<f64>::zeros((k, d));
    let mut sums = Array2::<f64>::zeros((k, d));
    let mut counts = vec![0usize; k];
    let mut assignments = vec![0usize; config.n];
    let mut empty_clusters = 0;

    for iteration in 0..config.max_iter {
        debug!("k-means iteration {}", iteration + 1);
        previous.assign(&*centroids);
        sums.fill(0.0);
        counts.fill(0);

        for (i, row) in observations.outer_iter().enumerate() {
            let c = nearest_centroid(row, centroids.view());
            assignments[i] = c;
            counts[c] += 1;
            sums.row_mut(c).zip_mut_with(&row, |s, &x| *s += x);
        }

        for ci in 0..k {
            if counts[ci] == 0 {
                match config.empty_cluster {
                    EmptyClusterPolicy::Retain => {
                        warn!(
                            "cluster {} is empty in iteration {}, keeping its centroid",
                            ci,
                            iteration + 1
                        );
                        empty_clusters += 1;
                        continue;
                    }
                    EmptyClusterPolicy::Fail => {
                        centroids.assign(&previous);
                        return Err(KMeansError::DegenerateCluster {
                            cluster: ci,
                            iteration: iteration + 1,
                        });
                    }
                }
            }
            let count = counts[ci] as f64;
            centroids
                .row_mut(ci)
                .zip_mut_with(&sums.row(ci), |c, &s| *c = s / count);
        }

        // exact comparison, no tolerance
        if previous == *centroids {
            info!("converged after {} iterations", iteration + 1);
            return Ok(RunSummary {
                iterations: iteration + 1,
                converged: true,
                assignments,
                empty_clusters,
            });
        }
    }

    info!(
        "stopped after max_iter = {} iterations without converging",
        config.max_iter
    );
    Ok(RunSummary {
        iterations: config.max_iter,
        converged: false,
        assignments,
        empty_clusters,
    })
}

fn check_shape(what: &str, got: (usize, usize), expected: (usize, usize)) -> Result<()> {
    if got != expected {
        return Err(KMeansError::Shape(format!(
            "{what} are {}x{}, expected {}x{}",
            got.0, got.1, expected.0, expected.1
        )));
    }
    Ok(())
}
