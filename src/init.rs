use ndarray::{Array1, Array2, ArrayView2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::squared_distance;
use crate::error::{KMeansError, Result};

/// Seed used for k-means++ when none is given.
pub const DEFAULT_SEED: u64 = 0;

/// How the starting centroids are chosen from the observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Init {
    /// The first k observations.
    FirstK,
    /// k-means++ seeding, reproducible for a given seed.
    PlusPlus { seed: u64 },
    /// Caller supplied observation indices.
    Indices(Vec<usize>),
}

impl Init {
    /// Resolve to k observation indices.
    pub fn indices(&self, observations: ArrayView2<f64>, k: usize) -> Result<Vec<usize>> {
        match self {
            Init::FirstK => {
                if k == 0 || k > observations.nrows() {
                    return Err(KMeansError::Initialization(format!(
                        "cannot take the first {} of {} observations",
                        k,
                        observations.nrows()
                    )));
                }
                Ok((0..k).collect())
            }
            Init::PlusPlus { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                plus_plus(observations, k, &mut rng)
            }
            Init::Indices(indices) => {
                if indices.len() != k {
                    return Err(KMeansError::Shape(format!(
                        "got {} initial indices for k = {}",
                        indices.len(),
                        k
                    )));
                }
                Ok(indices.clone())
            }
        }
    }
}

/// k-means++: the first index is uniform over all observations, every
/// further index is drawn with probability proportional to the squared
/// distance to the closest centroid picked so far.
pub fn plus_plus<R: Rng>(observations: ArrayView2<f64>, k: usize, rng: &mut R) -> Result<Vec<usize>> {
    let n = observations.nrows();
    if k == 0 || k > n {
        return Err(KMeansError::Initialization(format!(
            "cannot pick {k} centroids from {n} observations"
        )));
    }

    let mut indices = Vec::with_capacity(k);
    indices.push(rng.gen_range(0..n));

    let mut closest = Array1::<f64>::from_elem(n, f64::INFINITY);
    while indices.len() < k {
        let last = observations.row(indices[indices.len() - 1]);
        for (i, row) in observations.outer_iter().enumerate() {
            let dist = squared_distance(row, last);
            if dist < closest[i] {
                closest[i] = dist;
            }
        }

        let weights = WeightedIndex::new(closest.iter().copied()).map_err(|e| {
            KMeansError::Initialization(format!(
                "k-means++ could not draw centroid {}: {}",
                indices.len() + 1,
                e
            ))
        })?;
        indices.push(weights.sample(rng));
    }

    Ok(indices)
}

/// Copy the observations at `indices` into a fresh k×d centroid matrix.
/// Indices must lie in `0..n`; duplicates are allowed.
pub fn centroids_from_indices(observations: ArrayView2<f64>, indices: &[usize]) -> Result<Array2<f64>> {
    let n = observations.nrows();
    let mut centroids = Array2::<f64>::zeros((indices.len(), observations.ncols()));
    for (ci, &idx) in indices.iter().enumerate() {
        if idx >= n {
            return Err(KMeansError::InvalidIndex { index: idx, n });
        }
        centroids.row_mut(ci).assign(&observations.row(idx));
    }
    Ok(centroids)
}
