use crate::sparse::SparseVector;

/// An ordered collection of labeled sparse vectors.
///
/// The position of a record is its index in every assignment produced for
/// this dataset. Label uniqueness is not enforced here; the loader dedupes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    labels: Vec<String>,
    vectors: Vec<SparseVector>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index
    pub fn push(&mut self, label: impl Into<String>, vector: SparseVector) -> usize {
        self.labels.push(label.into());
        self.vectors.push(vector);
        self.vectors.len() - 1
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn vector(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    /// Iterate over `(label, vector)` pairs in dataset order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SparseVector)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.vectors.iter())
    }

    /// Replace the vector stored at `index`, keeping its label and position
    pub(crate) fn replace_vector(&mut self, index: usize, vector: SparseVector) {
        self.vectors[index] = vector;
    }
}

impl<S: Into<String>> FromIterator<(S, SparseVector)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (S, SparseVector)>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for (label, vector) in iter {
            dataset.push(label, vector);
        }
        dataset
    }
}
