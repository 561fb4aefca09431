use crate::error::{KMeansError, Result};

/// What the engine does when a cluster ends an assignment step without
/// a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Keep the centroid the cluster had at the start of the iteration.
    #[default]
    Retain,
    /// Abort the run with [`KMeansError::DegenerateCluster`].
    Fail,
}

/// Run parameters, passed explicitly to every step of the clustering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub k: usize,
    /// Number of observations.
    pub n: usize,
    /// Dimensions per observation.
    pub d: usize,
    /// Upper bound on assignment/update iterations.
    pub max_iter: usize,
    pub empty_cluster: EmptyClusterPolicy,
}

impl KMeansConfig {
    pub fn new(k: usize, n: usize, d: usize, max_iter: usize) -> Self {
        Self {
            k,
            n,
            d,
            max_iter,
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }

    /// Build and validate a config from signed values, the way they arrive
    /// on the command line. Zero and negative values are rejected.
    pub fn from_signed(k: i64, n: i64, d: i64, max_iter: i64) -> Result<Self> {
        let config = Self::new(
            positive("k", k)?,
            positive("n", n)?,
            positive("d", d)?,
            positive("max_iter", max_iter)?,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    /// Check the invariants 1 <= k < n, d >= 1 and max_iter >= 1.
    pub fn validate(&self) -> Result<()> {
        if self.n < 1 {
            return Err(KMeansError::InvalidConfig("n must be at least 1".into()));
        }
        if self.d < 1 {
            return Err(KMeansError::InvalidConfig("d must be at least 1".into()));
        }
        if self.max_iter < 1 {
            return Err(KMeansError::InvalidConfig(
                "max_iter must be at least 1".into(),
            ));
        }
        if self.k < 1 {
            return Err(KMeansError::InvalidConfig("k must be at least 1".into()));
        }
        if self.k >= self.n {
            return Err(KMeansError::InvalidConfig(format!(
                "k ({}) must be smaller than n ({})",
                self.k, self.n
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: i64) -> Result<usize> {
    if value < 1 {
        return Err(KMeansError::InvalidConfig(format!(
            "{name} must be a positive integer, got {value}"
        )));
    }
    usize::try_from(value)
        .map_err(|_| KMeansError::InvalidConfig(format!("{name} is too large: {value}")))
}
