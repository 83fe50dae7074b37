//! Domain types for asana-io.

use crate::IoError;

/// A class label read from the label column.
///
/// Wraps a non-empty string such as `"downdog"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a new class label from a non-empty string.
    pub(crate) fn new(label: String) -> Self {
        debug_assert!(!label.is_empty(), "class label must not be empty");
        Self(label)
    }

    /// Return the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table of feature rows with one categorical label per row.
///
/// Produced by [`TableReader`](crate::TableReader). Labels and feature rows
/// are stored in parallel vectors: `labels[i]` belongs to `features[i]`.
/// The label column itself is never part of `feature_names`.
#[derive(Debug)]
pub struct LabeledDataset {
    /// Name of the column the labels were read from.
    label_column: String,
    /// Feature column names in header order.
    feature_names: Vec<String>,
    /// Feature values: `features[sample_index][feature_index]`.
    features: Vec<Vec<f64>>,
    /// One label per row.
    labels: Vec<ClassLabel>,
}

impl LabeledDataset {
    /// Create a new labeled dataset.
    pub(crate) fn new(
        label_column: String,
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        labels: Vec<ClassLabel>,
    ) -> Self {
        Self {
            label_column,
            feature_names,
            features,
            labels,
        }
    }

    /// Return the label column name.
    #[must_use]
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the label vector.
    #[must_use]
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Return the number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Check that `other` has exactly the same feature columns, in order.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SchemaMismatch`] when the feature names differ.
    pub fn check_schema(&self, other: &LabeledDataset) -> Result<(), IoError> {
        other.check_feature_names(&self.feature_names)
    }

    /// Check that this table's feature columns are exactly `expected`, in order.
    ///
    /// Used to match a table against the columns a saved model was trained on.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SchemaMismatch`] when the feature names differ.
    pub fn check_feature_names(&self, expected: &[String]) -> Result<(), IoError> {
        if self.feature_names != expected {
            return Err(IoError::SchemaMismatch {
                expected: expected.to_vec(),
                got: self.feature_names.clone(),
            });
        }
        Ok(())
    }
}
