use crate::error::KMeansError;
use std::fmt;
use std::str::FromStr;

/// Strategy used to pick the initial centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMethod {
    /// Sample k distinct data points uniformly at random
    Random,

    /// k-means++ seeding: sample each new center with probability
    /// proportional to its squared distance from the centers chosen so far
    #[default]
    KMeansPlusPlus,
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitMethod::Random => f.write_str("random"),
            InitMethod::KMeansPlusPlus => f.write_str("kmeans++"),
        }
    }
}

impl FromStr for InitMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "uniform" => Ok(InitMethod::Random),
            "kmeans++" | "kmeanspp" | "k-means++" | "smart" => Ok(InitMethod::KMeansPlusPlus),
            other => Err(format!(
                "unknown init method '{}', expected 'random' or 'kmeans++'",
                other
            )),
        }
    }
}

/// Configuration for the sparse k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of assign/update cycles. When the cap is reached
    /// before the assignment stabilizes, the last assignment is returned.
    pub max_iters: usize,

    /// How the initial centers are chosen
    pub init: InitMethod,

    /// Random seed for center initialization. `None` seeds from OS entropy,
    /// so runs are only reproducible when a seed is given.
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            max_iters: 10,
            init: InitMethod::default(),
            seed: None,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the initialization strategy
    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = init;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration against a dataset of `n_samples` records.
    ///
    /// Every configuration error is reported here, before any clustering
    /// state is built.
    pub fn validate(&self, n_samples: usize) -> Result<(), KMeansError> {
        if n_samples == 0 {
            return Err(KMeansError::EmptyDataset);
        }

        if self.k == 0 {
            return Err(KMeansError::InvalidK(
                "k must be greater than 0".to_string(),
            ));
        }

        if n_samples < self.k {
            return Err(KMeansError::InsufficientData(format!(
                "Number of samples ({}) is less than k ({})",
                n_samples, self.k
            )));
        }

        if self.max_iters == 0 {
            return Err(KMeansError::InvalidMaxIters(
                "max_iters must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
