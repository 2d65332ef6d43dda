//! # sparse-kmeans
//!
//! k-means clustering for sparse, high-dimensional feature vectors such as
//! bag-of-words or bag-of-features records.
//!
//! ## Features
//!
//! - **Sparse vectors**: points are stored as `feature id -> weight` maps and
//!   distances cost O(nonzeros), never O(dimension)
//! - **k-means++ seeding**, with uniform random seeding as a cheaper fallback
//! - **Parallel assignment step**: uses rayon for the nearest-center search
//! - **Explicit termination**: every run reports whether it converged or hit
//!   the iteration cap
//! - **Tab-separated record loader** and assignment writer for command-line use
//!
//! ## Example
//!
//! ```rust
//! use sparse_kmeans::{Dataset, KMeansConfig, SparseKMeans, SparseVector, Termination};
//!
//! let mut dataset = Dataset::new();
//! dataset.push("cat", SparseVector::from([(0, 1.0), (1, 0.9)]));
//! dataset.push("kitten", SparseVector::from([(0, 1.1), (1, 1.0)]));
//! dataset.push("car", SparseVector::from([(7, 5.0), (8, 4.0)]));
//! dataset.push("truck", SparseVector::from([(7, 5.2), (8, 4.1)]));
//!
//! let config = KMeansConfig::new(2).with_seed(42);
//! let mut kmeans = SparseKMeans::with_config(config);
//! let clustering = kmeans.fit_predict(&dataset).unwrap();
//!
//! assert_eq!(clustering.termination, Termination::Converged);
//! for (label, cluster) in clustering.assignments(&dataset) {
//!     println!("{}\t{}", label, cluster);
//! }
//! ```
//!
//! ## Loading records
//!
//! ```rust
//! use sparse_kmeans::io::read_dataset;
//! use std::io::Cursor;
//!
//! let text = "doc1\tapple\t2\tpear\t1\ndoc2\tfig\t3\nbroken\tapple\n";
//! let report = read_dataset(Cursor::new(text)).unwrap();
//!
//! assert_eq!(report.dataset.len(), 2);
//! assert_eq!(report.skipped.len(), 1);
//! ```

mod algorithm;
mod config;
mod dataset;
mod distance;
mod error;
pub mod init;
pub mod io;
mod kmeans;
mod sparse;

pub use algorithm::Termination;
pub use config::{InitMethod, KMeansConfig};
pub use dataset::Dataset;
pub use distance::squared_distance;
pub use error::KMeansError;
pub use kmeans::{Clustering, SparseKMeans};
pub use sparse::{FeatureId, SparseVector};
