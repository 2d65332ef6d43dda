use crate::config::KMeansConfig;
use crate::distance::{compute_inertia, find_nearest_centers};
use crate::error::KMeansError;
use crate::init::initializer_for;
use crate::sparse::SparseVector;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, info};

/// Terminal state of a clustering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Two consecutive iterations produced the same assignment
    Converged,

    /// The iteration cap was hit while assignments were still changing
    IterationLimitReached,
}

/// Result of the k-means algorithm
pub struct KMeansResult {
    pub centroids: Vec<SparseVector>,
    pub labels: Vec<usize>,
    pub n_iterations: usize,
    pub termination: Termination,
    pub inertia: f64,
    /// Centers that had no members after the final update
    pub empty_clusters: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Initializing,
    Iterating,
    Done(Termination),
}

/// Run Lloyd's algorithm over sparse vectors.
///
/// The configuration is validated before anything else happens. Each
/// iteration assigns every point to its nearest center (in parallel) and
/// then moves each center to the mean of its members. The loop stops when an
/// assignment repeats the previous one or after `config.max_iters`
/// iterations, whichever comes first.
pub fn kmeans_sparse(
    data: &[SparseVector],
    config: &KMeansConfig,
) -> Result<KMeansResult, KMeansError> {
    config.validate(data.len())?;

    let n_samples = data.len();
    let k = config.k;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    info!(
        n_samples,
        k,
        init = %config.init,
        max_iters = config.max_iters,
        "Training sparse k-means"
    );

    let mut state = State::Initializing;
    let mut centroids = Vec::new();
    let mut labels = Vec::new();
    // No valid assignment uses index k, so the first comparison always differs.
    let mut prev_labels = vec![k; n_samples];
    let mut empty_clusters = Vec::new();
    let mut n_iterations = 0;

    let termination = loop {
        match state {
            State::Initializing => {
                let init_start = Instant::now();
                centroids = initializer_for(config.init).initialize(data, k, &mut rng);
                debug!(
                    elapsed_s = init_start.elapsed().as_secs_f64(),
                    "Initialized {} centers with {}", k, config.init
                );
                state = State::Iterating;
            }
            State::Iterating => {
                let iter_start = Instant::now();
                n_iterations += 1;

                labels = assign_clusters(data, &centroids);
                empty_clusters = move_centers(data, &labels, &mut centroids);

                let changed = count_changed(&labels, &prev_labels);
                debug!(
                    iteration = n_iterations,
                    changed,
                    empty = empty_clusters.len(),
                    elapsed_s = iter_start.elapsed().as_secs_f64(),
                    "Iteration {}/{}", n_iterations, config.max_iters
                );
                if !empty_clusters.is_empty() {
                    debug!(clusters = ?empty_clusters, "Centers left without members");
                }

                state = if changed == 0 {
                    State::Done(Termination::Converged)
                } else if n_iterations >= config.max_iters {
                    State::Done(Termination::IterationLimitReached)
                } else {
                    std::mem::swap(&mut prev_labels, &mut labels);
                    State::Iterating
                };
            }
            State::Done(termination) => break termination,
        }
    };

    let inertia = compute_inertia(data, &centroids, &labels);

    match termination {
        Termination::Converged => info!(
            iterations = n_iterations,
            inertia, "Converged after {} iterations", n_iterations
        ),
        Termination::IterationLimitReached => info!(
            iterations = n_iterations,
            inertia, "Stopped at iteration cap without converging"
        ),
    }

    Ok(KMeansResult {
        centroids,
        labels,
        n_iterations,
        termination,
        inertia,
        empty_clusters,
    })
}

/// Assignment step: nearest center for every data point.
///
/// `centroids` is only read here, so the scan runs lock-free in parallel.
pub fn assign_clusters(data: &[SparseVector], centroids: &[SparseVector]) -> Vec<usize> {
    find_nearest_centers(data, centroids)
}

/// Update step: move each center to the coordinate-wise mean of its members.
///
/// Returns the indices of centers with no members. Those are left as the
/// empty vector; they are never reseeded.
pub fn move_centers(
    data: &[SparseVector],
    labels: &[usize],
    centroids: &mut [SparseVector],
) -> Vec<usize> {
    for centroid in centroids.iter_mut() {
        centroid.clear();
    }

    let mut counts = vec![0usize; centroids.len()];
    for (point, &label) in data.iter().zip(labels.iter()) {
        centroids[label].accumulate(point);
        counts[label] += 1;
    }

    let mut empty_clusters = Vec::new();
    for (cluster_idx, (centroid, &count)) in centroids.iter_mut().zip(counts.iter()).enumerate() {
        if count == 0 {
            empty_clusters.push(cluster_idx);
        } else {
            centroid.scale(1.0 / count as f64);
        }
    }

    empty_clusters
}

fn count_changed(labels: &[usize], prev_labels: &[usize]) -> usize {
    labels
        .iter()
        .zip(prev_labels.iter())
        .filter(|(a, b)| a != b)
        .count()
}
