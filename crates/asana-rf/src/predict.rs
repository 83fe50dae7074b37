//! Prediction and scoring for a fitted forest.

use tracing::{info, instrument};

use crate::confusion::ConfusionMatrix;
use crate::error::RfError;
use crate::forest::RandomForest;

/// Fraction of predictions that match the true labels, in `[0, 1]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`RfError::EmptyDataset`] | Zero labels provided |
/// | [`RfError::LabelCountMismatch`] | The two slices differ in length |
pub fn accuracy_score<T: AsRef<str>, P: AsRef<str>>(
    true_labels: &[T],
    predicted: &[P],
) -> Result<f64, RfError> {
    if true_labels.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    if true_labels.len() != predicted.len() {
        return Err(RfError::LabelCountMismatch {
            samples: true_labels.len(),
            labels: predicted.len(),
        });
    }
    let correct = true_labels
        .iter()
        .zip(predicted)
        .filter(|&(t, p)| t.as_ref() == p.as_ref())
        .count();
    Ok(correct as f64 / true_labels.len() as f64)
}

/// Result of scoring a forest on a labeled table.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of correctly classified samples.
    pub accuracy: f64,
    /// Confusion matrix over true and predicted classes.
    pub confusion_matrix: ConfusionMatrix,
    /// Number of scored samples.
    pub n_samples: usize,
}

impl RandomForest {
    /// Predict class names for a batch of samples.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::PredictionFeatureMismatch`] | A sample's width differs from the training width |
    /// | [`RfError::NonFiniteValue`] | A value is NaN or infinite |
    /// | [`RfError::Predict`] | The underlying library failed |
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<String>, RfError> {
        self.predict_indices(features)?
            .into_iter()
            .map(|idx| self.encoder.decode(idx).map(String::from))
            .collect()
    }

    /// Predict every row of `features` and score against `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyDataset`] for an empty table,
    /// [`RfError::LabelCountMismatch`] when the lengths differ, and any
    /// error from [`RandomForest::predict`].
    #[instrument(skip_all, fields(n_samples = features.len()))]
    pub fn evaluate<S: AsRef<str>>(
        &self,
        features: &[Vec<f64>],
        labels: &[S],
    ) -> Result<Evaluation, RfError> {
        if features.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        if labels.len() != features.len() {
            return Err(RfError::LabelCountMismatch {
                samples: features.len(),
                labels: labels.len(),
            });
        }

        let predicted = self.predict(features)?;
        let accuracy = accuracy_score(labels, &predicted)?;
        let confusion_matrix = ConfusionMatrix::from_labels(labels, &predicted)?;

        info!(accuracy, "evaluation complete");

        Ok(Evaluation {
            accuracy,
            confusion_matrix,
            n_samples: features.len(),
        })
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.encoder.n_classes()
    }

    /// Return the class names in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RandomForestConfig;

    fn train_simple_model() -> RandomForest {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let labels = ["mountain", "mountain", "mountain", "cobra", "cobra", "cobra"];
        let names = vec!["x".to_string(), "y".to_string()];
        RandomForestConfig::new(10)
            .unwrap()
            .with_seed(42)
            .fit(&features, &labels, &names)
            .unwrap()
    }

    #[test]
    fn accuracy_score_counts_matches() {
        let acc = accuracy_score(&["a", "b", "c", "d"], &["a", "b", "x", "d"]).unwrap();
        assert!((acc - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_score_rejects_empty() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            accuracy_score(&empty, &empty),
            Err(RfError::EmptyDataset)
        ));
    }

    #[test]
    fn predict_returns_known_class_names() {
        let forest = train_simple_model();
        let predictions = forest.predict(&[vec![1.5, 0.0], vec![11.5, 0.0]]).unwrap();
        assert_eq!(predictions.len(), 2);
        for p in &predictions {
            assert!(forest.classes().contains(p), "unexpected class {p}");
        }
    }

    #[test]
    fn predict_empty_batch() {
        let forest = train_simple_model();
        assert!(forest.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn predict_wrong_width_rejected() {
        let forest = train_simple_model();
        let err = forest.predict(&[vec![1.0, 0.0, 5.0]]).unwrap_err();
        assert!(matches!(
            err,
            RfError::PredictionFeatureMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn evaluate_accuracy_in_unit_interval() {
        let forest = train_simple_model();
        let features = vec![vec![1.0, 0.0], vec![12.0, 0.0], vec![6.0, 0.0]];
        let labels = ["mountain", "cobra", "plank"];
        let eval = forest.evaluate(&features, &labels).unwrap();
        assert!((0.0..=1.0).contains(&eval.accuracy));
        assert_eq!(eval.n_samples, 3);
        // "plank" was never seen in training, so it can never be predicted correctly.
        assert!(eval.accuracy < 1.0);
        assert!(eval.confusion_matrix.classes().contains(&"plank".to_string()));
    }

    #[test]
    fn evaluate_label_count_mismatch() {
        let forest = train_simple_model();
        let err = forest.evaluate(&[vec![1.0, 0.0]], &["a", "b"]).unwrap_err();
        assert!(matches!(err, RfError::LabelCountMismatch { .. }));
    }
}
