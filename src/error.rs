use thiserror::Error;

/// Error types for the sparse-kmeans library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The dataset holds no records at all
    #[error("Dataset is empty")]
    EmptyDataset,

    /// The iteration cap must allow at least one assign/update cycle
    #[error("Invalid max_iters value: {0}")]
    InvalidMaxIters(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,

    /// Reading the input records failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
