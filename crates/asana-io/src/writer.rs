//! JSON report writer for evaluation results.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Evaluation summary written as JSON.
///
/// Holds primitives only so this crate has no dependency on `asana-rf`.
#[derive(Debug, Serialize)]
pub struct EvaluationReport<'a> {
    /// Path of the model that was scored.
    pub model_path: &'a str,
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Seed used for training, when this run trained the model.
    pub seed: Option<u64>,
    /// Rows in the training table, when this run trained the model.
    pub n_train_samples: Option<usize>,
    /// Rows in the scored table.
    pub n_test_samples: usize,
    /// Number of feature columns.
    pub n_features: usize,
    /// Fraction of correctly classified rows, in `[0, 1]`.
    pub accuracy: f64,
    /// Class names, in confusion-matrix order.
    pub classes: &'a [String],
    /// `confusion_matrix[true][predicted]` counts.
    pub confusion_matrix: &'a [Vec<usize>],
    /// Per-class precision, recall, F1 and support.
    pub class_metrics: Vec<ClassReport<'a>>,
}

/// Per-class entry of an [`EvaluationReport`].
#[derive(Debug, Serialize)]
pub struct ClassReport<'a> {
    /// Class name.
    pub class: &'a str,
    /// TP / (TP + FP).
    pub precision: f64,
    /// TP / (TP + FN).
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of true rows of this class.
    pub support: usize,
}

/// Writes an [`EvaluationReport`] to a JSON file.
///
/// Creates the parent directory on construction if it does not exist.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create a new writer targeting `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the parent directory cannot be created.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn new(path: &Path) -> Result<Self, IoError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| IoError::OutputDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
            debug!("output directory ready");
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Encode`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write(&self, report: &EvaluationReport<'_>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(report).map_err(|e| IoError::Encode {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, &json).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        info!(accuracy = report.accuracy, "evaluation report written");
        Ok(())
    }

    /// Return the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
