//! Initial center selection.
//!
//! Both strategies pick `k` distinct dataset indices. The engine only sees
//! the [`CenterInitializer`] trait, so the strategy can be swapped through
//! [`KMeansConfig::init`](crate::KMeansConfig::init) without touching the
//! rest of the loop.

use crate::config::InitMethod;
use crate::distance::squared_distance;
use crate::sparse::SparseVector;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Produces `k` initial centers from a dataset
pub trait CenterInitializer {
    /// Choose `k` distinct indices into `data`.
    ///
    /// Callers guarantee `0 < k <= data.len()`.
    fn choose_indices(&self, data: &[SparseVector], k: usize, rng: &mut ChaCha8Rng) -> Vec<usize>;

    /// Copy the chosen data points into a fresh center set.
    fn initialize(&self, data: &[SparseVector], k: usize, rng: &mut ChaCha8Rng) -> Vec<SparseVector> {
        self.choose_indices(data, k, rng)
            .into_iter()
            .map(|idx| data[idx].clone())
            .collect()
    }
}

/// Uniform sampling with rejection of already-chosen indices
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInit;

impl CenterInitializer for RandomInit {
    fn choose_indices(&self, data: &[SparseVector], k: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let n_samples = data.len();
        let mut chosen = Vec::with_capacity(k);
        let mut seen = HashSet::with_capacity(k);

        while chosen.len() < k {
            let idx = rng.gen_range(0..n_samples);
            if seen.insert(idx) {
                chosen.push(idx);
            }
        }

        chosen
    }
}

/// k-means++ seeding (Arthur & Vassilvitskii, 2007)
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeansPlusPlus;

impl CenterInitializer for KMeansPlusPlus {
    fn choose_indices(&self, data: &[SparseVector], k: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let n_samples = data.len();
        let mut chosen = Vec::with_capacity(k);
        let mut is_chosen = vec![false; n_samples];

        let first = rng.gen_range(0..n_samples);
        chosen.push(first);
        is_chosen[first] = true;

        let mut closest_dist: Vec<f64> = data
            .iter()
            .map(|point| squared_distance(point, &data[first]))
            .collect();
        let mut potential: f64 = closest_dist.iter().sum();

        while chosen.len() < k {
            let idx = if potential.is_finite() && potential > 0.0 {
                let draw = rng.gen_range(0.0..potential);
                sample_weighted(&closest_dist, draw)
            } else if potential > 0.0 {
                sample_overflowed(&closest_dist, rng)
            } else {
                // Every remaining point coincides with a chosen center.
                None
            };
            let idx = match idx {
                Some(idx) if !is_chosen[idx] => idx,
                _ => pick_unchosen(&is_chosen, rng),
            };

            chosen.push(idx);
            is_chosen[idx] = true;

            let center = &data[idx];
            potential = 0.0;
            for (point, dist) in data.iter().zip(closest_dist.iter_mut()) {
                let d = squared_distance(point, center);
                if d < *dist {
                    *dist = d;
                }
                potential += *dist;
            }
        }

        chosen
    }
}

/// Inverse-CDF draw over `weights`: the first index with positive weight whose
/// cumulative weight reaches `draw`.
///
/// `draw` is expected in `[0, sum(weights))`. Returns `None` when no weight is
/// positive.
pub(crate) fn sample_weighted(weights: &[f64], draw: f64) -> Option<usize> {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut total = 0.0f64;
    for &w in weights {
        total += w;
        cumulative.push(total);
    }

    let mut idx = cumulative.partition_point(|&c| c < draw);
    while idx < weights.len() && weights[idx] <= 0.0 {
        idx += 1;
    }
    if idx < weights.len() {
        return Some(idx);
    }

    // Rounding pushed the draw past the last prefix: take the last positive weight.
    weights.iter().rposition(|&w| w > 0.0)
}

/// Weighted draw for a potential that overflowed to infinity.
///
/// Points at infinite distance take all the mass and are drawn uniformly
/// among themselves. Otherwise only the sum overflowed, and the weights are
/// rescaled by their maximum before the usual inverse-CDF draw.
fn sample_overflowed(weights: &[f64], rng: &mut ChaCha8Rng) -> Option<usize> {
    let infinite: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_infinite())
        .map(|(idx, _)| idx)
        .collect();
    if !infinite.is_empty() {
        return Some(infinite[rng.gen_range(0..infinite.len())]);
    }

    let max = weights.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return None;
    }
    let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
    let total: f64 = scaled.iter().sum();
    sample_weighted(&scaled, rng.gen_range(0.0..total))
}

/// Uniform choice among the indices not yet chosen.
///
/// Callers only ask while fewer than `data.len()` centers exist, so at least
/// one index is free; `gen_range` panics on an empty range otherwise.
fn pick_unchosen(is_chosen: &[bool], rng: &mut ChaCha8Rng) -> usize {
    let free: Vec<usize> = is_chosen
        .iter()
        .enumerate()
        .filter(|(_, &taken)| !taken)
        .map(|(idx, _)| idx)
        .collect();
    free[rng.gen_range(0..free.len())]
}

/// The initializer implementing `method`
pub fn initializer_for(method: InitMethod) -> Box<dyn CenterInitializer + Send + Sync> {
    match method {
        InitMethod::Random => Box::new(RandomInit),
        InitMethod::KMeansPlusPlus => Box::new(KMeansPlusPlus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn line_data(n: usize) -> Vec<SparseVector> {
        (0..n)
            .map(|i| SparseVector::from([(0, i as f64 + 1.0), (1, (i % 3) as f64 + 1.0)]))
            .collect()
    }

    fn assert_distinct(indices: &[usize], k: usize, n: usize) {
        assert_eq!(indices.len(), k);
        let unique: HashSet<_> = indices.iter().collect();
        assert_eq!(unique.len(), k, "indices must be distinct: {:?}", indices);
        assert!(indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_random_init_distinct() {
        let data = line_data(20);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for k in 1..=20 {
            let indices = RandomInit.choose_indices(&data, k, &mut rng);
            assert_distinct(&indices, k, 20);
        }
    }

    #[test]
    fn test_kmeanspp_distinct() {
        let data = line_data(20);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for k in 1..=20 {
            let indices = KMeansPlusPlus.choose_indices(&data, k, &mut rng);
            assert_distinct(&indices, k, 20);
        }
    }

    #[test]
    fn test_kmeanspp_duplicate_points() {
        // Zero potential after the first pick: remaining centers fall back to
        // uniform choice among unchosen indices.
        let data = vec![SparseVector::from([(3, 1.0)]); 6];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let indices = KMeansPlusPlus.choose_indices(&data, 6, &mut rng);
        assert_distinct(&indices, 6, 6);
    }

    #[test]
    fn test_kmeanspp_overflowing_distances() {
        // Squared distances between +-1e200 overflow to infinity.
        let data = vec![
            SparseVector::from([(0, 1e200)]),
            SparseVector::from([(0, -1e200)]),
            SparseVector::from([(0, 1.0)]),
        ];

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_distinct(&KMeansPlusPlus.choose_indices(&data, 2, &mut rng), 2, 3);
            assert_distinct(&KMeansPlusPlus.choose_indices(&data, 3, &mut rng), 3, 3);
        }
    }

    #[test]
    fn test_kmeanspp_overflowing_potential() {
        // Each distance is finite but their sum is not.
        let mut data = vec![SparseVector::new()];
        data.extend((1..6).map(|i| SparseVector::from([(i, 1e154)])));

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_distinct(&KMeansPlusPlus.choose_indices(&data, 4, &mut rng), 4, 6);
        }
    }

    #[test]
    fn test_sample_overflowed() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..50 {
            let idx = sample_overflowed(&[0.0, f64::INFINITY, 1.0, f64::INFINITY], &mut rng);
            assert!(matches!(idx, Some(1) | Some(3)), "got {:?}", idx);

            let idx = sample_overflowed(&[1e308, 0.0, 1e308], &mut rng);
            assert!(matches!(idx, Some(0) | Some(2)), "got {:?}", idx);
        }
        assert_eq!(sample_overflowed(&[0.0, 0.0], &mut rng), None);
    }

    #[test]
    fn test_pick_unchosen_skips_taken() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let is_chosen = [true, false, true, true, false];

        for _ in 0..50 {
            let idx = pick_unchosen(&is_chosen, &mut rng);
            assert!(idx == 1 || idx == 4, "got {}", idx);
        }
        assert_eq!(pick_unchosen(&[true, true, false], &mut rng), 2);
    }

    #[test]
    fn test_kmeanspp_prefers_far_points() {
        // Two tight groups far apart: with k=2 the second center must come
        // from the other group almost surely.
        let data = vec![
            SparseVector::from([(0, 1.0)]),
            SparseVector::from([(0, 1.01)]),
            SparseVector::from([(1, 1000.0)]),
            SparseVector::from([(1, 1000.01)]),
        ];

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let indices = KMeansPlusPlus.choose_indices(&data, 2, &mut rng);
            let groups: HashSet<_> = indices.iter().map(|&i| i / 2).collect();
            assert_eq!(groups.len(), 2, "seed {} picked {:?}", seed, indices);
        }
    }

    #[test]
    fn test_initialize_copies_points() {
        let data = line_data(5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rng_copy = rng.clone();

        let centers = RandomInit.initialize(&data, 3, &mut rng);
        let indices = RandomInit.choose_indices(&data, 3, &mut rng_copy);

        assert_eq!(centers.len(), 3);
        for (center, &idx) in centers.iter().zip(indices.iter()) {
            assert_eq!(center, &data[idx]);
        }
    }

    #[test]
    fn test_sample_weighted() {
        let weights = [0.0, 2.0, 0.0, 3.0];

        assert_eq!(sample_weighted(&weights, 0.0), Some(1));
        assert_eq!(sample_weighted(&weights, 1.5), Some(1));
        // Lands exactly on the boundary: first index reaching the draw
        assert_eq!(sample_weighted(&weights, 2.0), Some(1));
        assert_eq!(sample_weighted(&weights, 2.5), Some(3));
        assert_eq!(sample_weighted(&weights, 4.99), Some(3));
        assert_eq!(sample_weighted(&weights, 7.0), Some(3));
        assert_eq!(sample_weighted(&[0.0, 0.0], 0.0), None);
    }

    #[test]
    fn test_initializer_for() {
        let data = line_data(8);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for method in [InitMethod::Random, InitMethod::KMeansPlusPlus] {
            let centers = initializer_for(method).initialize(&data, 4, &mut rng);
            assert_eq!(centers.len(), 4);
        }
    }
}
