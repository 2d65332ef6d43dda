use std::collections::HashMap;

/// Integer surrogate for a named feature, assigned by the loader's
/// [`FeatureDictionary`](crate::io::FeatureDictionary).
pub type FeatureId = u64;

/// A point in a high-dimensional space stored only by its nonzero coordinates.
///
/// Zero weights are never stored: inserting 0.0 removes the coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: HashMap<FeatureId, f64>,
}

impl SparseVector {
    /// Create an empty (all-zero) vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty vector with room for `capacity` nonzero coordinates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weights: HashMap::with_capacity(capacity),
        }
    }

    /// Set the weight of `id`, replacing any previous value.
    /// A weight of 0.0 removes the coordinate.
    pub fn insert(&mut self, id: FeatureId, weight: f64) {
        if weight == 0.0 {
            self.weights.remove(&id);
        } else {
            self.weights.insert(id, weight);
        }
    }

    /// Weight of `id`, 0.0 when absent
    pub fn get(&self, id: FeatureId) -> f64 {
        self.weights.get(&id).copied().unwrap_or(0.0)
    }

    /// Whether `id` has a stored (nonzero) weight
    pub fn contains(&self, id: FeatureId) -> bool {
        self.weights.contains_key(&id)
    }

    /// Number of nonzero coordinates
    pub fn nnz(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(id, weight)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, f64)> + '_ {
        self.weights.iter().map(|(&id, &w)| (id, w))
    }

    /// Reset to the zero vector, keeping the allocation
    pub fn clear(&mut self) {
        self.weights.clear();
    }

    /// Squared Euclidean distance to `other`
    #[inline]
    pub fn squared_distance(&self, other: &SparseVector) -> f64 {
        crate::distance::squared_distance(self, other)
    }

    /// Sparse add: coordinates present in both accumulate, coordinates only
    /// in `other` are inserted.
    ///
    /// Sums that cancel to exactly 0.0 stay stored until [`Self::scale`] prunes them.
    pub(crate) fn accumulate(&mut self, other: &SparseVector) {
        for (&id, &w) in &other.weights {
            *self.weights.entry(id).or_insert(0.0) += w;
        }
    }

    /// Multiply every coordinate by `factor` and drop coordinates that end up zero
    pub(crate) fn scale(&mut self, factor: f64) {
        self.weights.retain(|_, w| {
            *w *= factor;
            *w != 0.0
        });
    }

    pub(crate) fn weights(&self) -> &HashMap<FeatureId, f64> {
        &self.weights
    }
}

impl FromIterator<(FeatureId, f64)> for SparseVector {
    /// Later pairs overwrite earlier ones with the same id; zero weights are skipped.
    fn from_iter<I: IntoIterator<Item = (FeatureId, f64)>>(iter: I) -> Self {
        let mut vector = SparseVector::new();
        for (id, weight) in iter {
            vector.insert(id, weight);
        }
        vector
    }
}

impl<const N: usize> From<[(FeatureId, f64); N]> for SparseVector {
    fn from(pairs: [(FeatureId, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_weights_not_stored() {
        let mut v = SparseVector::from([(1, 1.5), (2, 0.0), (3, -2.0)]);
        assert_eq!(v.nnz(), 2);
        assert!(!v.contains(2));
        assert_eq!(v.get(2), 0.0);

        v.insert(1, 0.0);
        assert_eq!(v.nnz(), 1);
        assert!(!v.contains(1));
    }

    #[test]
    fn test_later_pair_wins() {
        let v: SparseVector = vec![(5, 1.0), (5, 4.0)].into_iter().collect();
        assert_eq!(v.nnz(), 1);
        assert_relative_eq!(v.get(5), 4.0);
    }

    #[test]
    fn test_accumulate_and_scale() {
        let mut acc = SparseVector::new();
        acc.accumulate(&SparseVector::from([(1, 2.0), (2, 1.0)]));
        acc.accumulate(&SparseVector::from([(1, 4.0), (3, -1.0)]));
        acc.accumulate(&SparseVector::from([(3, 1.0)]));
        acc.scale(0.5);

        assert_relative_eq!(acc.get(1), 3.0);
        assert_relative_eq!(acc.get(2), 0.5);
        // -1 + 1 cancels and is pruned
        assert!(!acc.contains(3));
        assert_eq!(acc.nnz(), 2);
    }

    #[test]
    fn test_clear() {
        let mut v = SparseVector::from([(1, 1.0)]);
        v.clear();
        assert!(v.is_empty());
    }
}
