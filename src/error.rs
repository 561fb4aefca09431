use thiserror::Error;

/// Everything that can go wrong between reading observations and
/// producing the final centroid table.
#[derive(Debug, Error)]
pub enum KMeansError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("initial centroid index {index} is out of range for {n} observations")]
    InvalidIndex { index: usize, n: usize },

    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("cluster {cluster} received no observations in iteration {iteration}")]
    DegenerateCluster { cluster: usize, iteration: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, KMeansError>;
