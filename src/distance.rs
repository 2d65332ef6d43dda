use crate::sparse::SparseVector;
use rayon::prelude::*;

/// Squared Euclidean distance between two sparse vectors.
///
/// Walks the smaller vector probing the larger one, then walks the larger
/// vector skipping the ids the smaller one holds. Shared ids are counted
/// once and the cost is O(|a| + |b|).
pub fn squared_distance(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.nnz() <= b.nnz() { (a, b) } else { (b, a) };
    let small_weights = small.weights();
    let large_weights = large.weights();

    let mut dist = 0.0f64;
    for (id, &w_small) in small_weights {
        let w_large = large_weights.get(id).copied().unwrap_or(0.0);
        let d = w_small - w_large;
        dist += d * d;
    }
    for (id, &w_large) in large_weights {
        if small_weights.contains_key(id) {
            continue;
        }
        dist += w_large * w_large;
    }

    dist
}

/// Index and squared distance of the nearest center to `point`.
///
/// Ties go to the lowest center index: the scan only moves on a strictly
/// smaller distance. Returns `(0, f64::INFINITY)` when `centers` is empty.
#[inline]
pub fn nearest_center(point: &SparseVector, centers: &[SparseVector]) -> (usize, f64) {
    let mut best_label = 0;
    let mut best_dist = f64::INFINITY;

    for (j, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, center);
        if dist < best_dist {
            best_dist = dist;
            best_label = j;
        }
    }

    (best_label, best_dist)
}

/// Find the nearest center for every data point in parallel.
///
/// Each point is handled independently and only reads `centers`, so the
/// result does not depend on how rayon schedules the work.
pub fn find_nearest_centers(data: &[SparseVector], centers: &[SparseVector]) -> Vec<usize> {
    data.par_iter()
        .map(|point| nearest_center(point, centers).0)
        .collect()
}

/// Sum of squared distances from each point to its assigned center
pub fn compute_inertia(data: &[SparseVector], centers: &[SparseVector], labels: &[usize]) -> f64 {
    data.par_iter()
        .zip(labels.par_iter())
        .map(|(point, &label)| squared_distance(point, &centers[label]))
        .sum()
}
