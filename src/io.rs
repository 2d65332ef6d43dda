//! Reading labeled feature records and writing cluster assignments.
//!
//! Records are tab-separated lines:
//!
//! ```text
//! label<TAB>feature<TAB>weight[<TAB>feature<TAB>weight ...]
//! ```
//!
//! Bad lines are skipped and reported in [`LoadReport::skipped`], they never
//! abort a load.

use crate::dataset::Dataset;
use crate::error::KMeansError;
use crate::kmeans::Clustering;
use crate::sparse::{FeatureId, SparseVector};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};

const DELIMITER: char = '\t';

/// Longest raw-line excerpt kept in a [`SkippedRecord`]
const EXCERPT_LEN: usize = 80;

/// Maps feature names to dense integer ids, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct FeatureDictionary {
    ids: HashMap<String, FeatureId>,
    names: Vec<String>,
}

impl FeatureDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `name`, assigning the next free id on first sight
    pub fn intern(&mut self, name: &str) -> FeatureId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as FeatureId;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn id(&self, name: &str) -> Option<FeatureId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: FeatureId) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.names.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Why a record was left out of the dataset
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The line has an even number of fields, so some feature lacks a weight
    UnpairedField,
    /// A weight field is not a number
    InvalidWeight(String),
    EmptyLabel,
    /// Every weight on the line was zero
    NoFeatures,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnpairedField => f.write_str("feature without a weight"),
            SkipReason::InvalidWeight(w) => write!(f, "invalid weight '{}'", w),
            SkipReason::EmptyLabel => f.write_str("empty label"),
            SkipReason::NoFeatures => f.write_str("no nonzero features"),
        }
    }
}

/// A line the loader did not turn into a record
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    /// 1-based line number
    pub line: usize,
    pub excerpt: String,
    pub reason: SkipReason,
}

/// Everything produced by one load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub dictionary: FeatureDictionary,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse records from `reader`.
///
/// A label seen again replaces the earlier record's vector but keeps the
/// earlier position. Within one line, a repeated feature keeps its last weight.
///
/// # Errors
///
/// Only I/O failures are errors; malformed lines land in
/// [`LoadReport::skipped`].
pub fn read_dataset<R: BufRead>(reader: R) -> Result<LoadReport, KMeansError> {
    let mut report = LoadReport::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (label, vector) = match parse_record(line, &mut report.dictionary) {
            Ok(record) => record,
            Err(reason) => {
                let excerpt: String = line.chars().take(EXCERPT_LEN).collect();
                warn!(line = line_no, %reason, "Skipping malformed record: {}", excerpt);
                report.skipped.push(SkippedRecord {
                    line: line_no,
                    excerpt,
                    reason,
                });
                continue;
            }
        };

        match positions.get(label) {
            Some(&index) => {
                warn!(line = line_no, label, "Duplicate label, keeping the later record");
                report.dataset.replace_vector(index, vector);
            }
            None => {
                let index = report.dataset.push(label, vector);
                positions.insert(label.to_string(), index);
            }
        }
    }

    info!(
        records = report.dataset.len(),
        features = report.dictionary.len(),
        skipped = report.skipped.len(),
        "Loaded dataset"
    );

    Ok(report)
}

/// Open `path` and parse it with [`read_dataset`]
pub fn load_dataset(path: impl AsRef<Path>) -> Result<LoadReport, KMeansError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading records");
    let file = File::open(path)?;
    read_dataset(BufReader::new(file))
}

fn parse_record<'a>(
    line: &'a str,
    dictionary: &mut FeatureDictionary,
) -> Result<(&'a str, SparseVector), SkipReason> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() % 2 != 1 {
        return Err(SkipReason::UnpairedField);
    }

    let label = fields[0];
    if label.is_empty() {
        return Err(SkipReason::EmptyLabel);
    }

    // Parse every weight before touching the dictionary, so a rejected line
    // does not leave unused feature ids behind.
    let mut pairs = Vec::with_capacity(fields.len() / 2);
    for pair in fields[1..].chunks_exact(2) {
        let weight: f64 = pair[1]
            .trim()
            .parse()
            .map_err(|_| SkipReason::InvalidWeight(pair[1].to_string()))?;
        if !weight.is_finite() {
            return Err(SkipReason::InvalidWeight(pair[1].to_string()));
        }
        pairs.push((pair[0], weight));
    }

    let mut vector = SparseVector::with_capacity(pairs.len());
    for (name, weight) in pairs {
        if weight == 0.0 {
            // Zero weights clear any earlier weight for the same feature.
            if let Some(id) = dictionary.id(name) {
                vector.insert(id, 0.0);
            }
            continue;
        }
        vector.insert(dictionary.intern(name), weight);
    }

    if vector.is_empty() {
        return Err(SkipReason::NoFeatures);
    }

    Ok((label, vector))
}

/// Write one `label<TAB>cluster` line per record, in dataset order
pub fn write_assignments<W: Write>(
    mut writer: W,
    dataset: &Dataset,
    clustering: &Clustering,
) -> std::io::Result<()> {
    for (label, cluster) in clustering.assignments(dataset) {
        writeln!(writer, "{}{}{}", label, DELIMITER, cluster)?;
    }
    writer.flush()
}

/// Write every record back out with feature names, weights at three decimals.
///
/// Features within a record are ordered by id, i.e. by first appearance in
/// the input.
pub fn write_vectors<W: Write>(
    mut writer: W,
    dataset: &Dataset,
    dictionary: &FeatureDictionary,
) -> std::io::Result<()> {
    for (label, vector) in dataset.iter() {
        let mut entries: Vec<(FeatureId, f64)> = vector.iter().collect();
        entries.sort_unstable_by_key(|&(id, _)| id);

        write!(writer, "{}", label)?;
        for (id, weight) in entries {
            match dictionary.name(id) {
                Some(name) => write!(writer, "{}{}{}{:.3}", DELIMITER, name, DELIMITER, weight)?,
                None => write!(writer, "{}{}{}{:.3}", DELIMITER, id, DELIMITER, weight)?,
            }
        }
        writeln!(writer)?;
    }
    writer.flush()
}
