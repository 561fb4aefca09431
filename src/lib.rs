//! Lloyd's k-means over an n×d matrix of `f64` observations.
//!
//! ```
//! use lloyd_kmeans::{DataSet, Init, KMeansConfig};
//!
//! let rows = vec![vec![1.0, 1.0], vec![1.0, 3.0], vec![5.0, 5.0], vec![5.0, 7.0]];
//! let ds = DataSet::from_rows(&rows, 2).unwrap();
//! let config = KMeansConfig::new(2, 4, 2, 10);
//! let (centroids, _, summary) = ds.kmeans(&config, &Init::Indices(vec![0, 2])).unwrap();
//! assert!(summary.converged);
//! assert_eq!(centroids[[1, 1]], 6.0);
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod init;
pub mod output;

pub use config::{EmptyClusterPolicy, KMeansConfig};
pub use dataset::DataSet;
pub use engine::{run, RunSummary};
pub use error::KMeansError;
pub use init::Init;
