use crate::algorithm::{assign_clusters, kmeans_sparse, KMeansResult, Termination};
use crate::config::KMeansConfig;
use crate::dataset::Dataset;
use crate::error::KMeansError;
use crate::sparse::SparseVector;

/// Outcome of one clustering run over a [`Dataset`].
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster index of every record, in dataset order
    pub labels: Vec<usize>,

    /// Whether the run converged or stopped at the iteration cap
    pub termination: Termination,

    /// Number of assign/update cycles performed
    pub n_iterations: usize,

    /// Sum of squared distances from each record to its center
    pub inertia: f64,

    /// Centers that ended the run without members
    pub empty_clusters: Vec<usize>,
}

impl Clustering {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// `(label, cluster)` pairs in dataset order.
    ///
    /// `dataset` must be the one this clustering was computed from.
    pub fn assignments<'a>(
        &'a self,
        dataset: &'a Dataset,
    ) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        dataset
            .labels()
            .iter()
            .map(String::as_str)
            .zip(self.labels.iter().copied())
    }
}

impl From<&KMeansResult> for Clustering {
    fn from(result: &KMeansResult) -> Self {
        Self {
            labels: result.labels.clone(),
            termination: result.termination,
            n_iterations: result.n_iterations,
            inertia: result.inertia,
            empty_clusters: result.empty_clusters.clone(),
        }
    }
}

/// k-means clustering of sparse feature vectors.
///
/// Centers are seeded with k-means++ (or uniform sampling, see
/// [`InitMethod`](crate::InitMethod)) and refined with Lloyd iterations whose
/// assignment step runs in parallel.
///
/// # Example
///
/// ```
/// use sparse_kmeans::{Dataset, SparseKMeans, SparseVector};
///
/// let mut dataset = Dataset::new();
/// dataset.push("a", SparseVector::from([(0, 1.0), (1, 1.0)]));
/// dataset.push("b", SparseVector::from([(0, 1.1), (1, 0.9)]));
/// dataset.push("c", SparseVector::from([(2, 8.0)]));
/// dataset.push("d", SparseVector::from([(2, 8.2)]));
///
/// let mut kmeans = SparseKMeans::new(2);
/// let clustering = kmeans.fit_predict(&dataset).unwrap();
/// assert_eq!(clustering.labels.len(), 4);
/// ```
pub struct SparseKMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Trained centers (None if not yet fitted)
    centroids: Option<Vec<SparseVector>>,

    /// Summary of the last training run
    last_run: Option<Clustering>,
}

impl SparseKMeans {
    /// Create a new instance with `k` clusters and the default configuration.
    ///
    /// `k` is validated against the dataset when training starts.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a new instance with custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            centroids: None,
            last_run: None,
        }
    }

    /// Train the model on `dataset`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any clustering work, if the
    /// dataset is empty, `k` is 0 or larger than the dataset, or
    /// `max_iters` is 0.
    pub fn train(&mut self, dataset: &Dataset) -> Result<(), KMeansError> {
        let result = kmeans_sparse(dataset.vectors(), &self.config)?;

        self.last_run = Some(Clustering::from(&result));
        self.centroids = Some(result.centroids);
        Ok(())
    }

    /// Fit the model to the data. Equivalent to [`Self::train`].
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&mut Self, KMeansError> {
        self.train(dataset)?;
        Ok(self)
    }

    /// Assign each vector to its nearest trained center.
    ///
    /// # Errors
    ///
    /// Returns [`KMeansError::NotFitted`] if the model has not been trained.
    pub fn predict(&self, vectors: &[SparseVector]) -> Result<Vec<usize>, KMeansError> {
        let centroids = self.centroids.as_ref().ok_or(KMeansError::NotFitted)?;
        Ok(assign_clusters(vectors, centroids))
    }

    /// Train on `dataset` and return the final clustering of it.
    pub fn fit_predict(&mut self, dataset: &Dataset) -> Result<Clustering, KMeansError> {
        self.train(dataset)?;
        self.last_run.clone().ok_or(KMeansError::NotFitted)
    }

    /// Trained centers, `None` before training
    pub fn centroids(&self) -> Option<&[SparseVector]> {
        self.centroids.as_deref()
    }

    /// Summary of the most recent training run
    pub fn last_run(&self) -> Option<&Clustering> {
        self.last_run.as_ref()
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
