//! Random Forest training on top of the `smartcore` ensemble.

use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::SplitCriterion as TreeCriterion;
use tracing::{debug, info, instrument};

use crate::config::{MaxFeatures, RandomForestConfig, SplitCriterion};
use crate::encoder::LabelEncoder;
use crate::error::RfError;

/// The concrete library classifier: `f64` features, `u32` class indices.
pub(crate) type Classifier = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// A fitted Random Forest ensemble together with everything needed to
/// interpret its output: class names and the expected feature columns.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    pub(crate) classifier: Classifier,
    pub(crate) encoder: LabelEncoder,
    pub(crate) n_trees: usize,
    pub(crate) n_features: usize,
    pub(crate) feature_names: Vec<String>,
}

/// Resolve `MaxFeatures` to a concrete count.
pub(crate) fn resolve_max_features(
    max_features: MaxFeatures,
    n_features: usize,
) -> Result<usize, RfError> {
    let resolved = match max_features {
        MaxFeatures::Sqrt => (n_features as f64).sqrt().floor().max(1.0) as usize,
        MaxFeatures::Log2 => (n_features as f64).log2().floor().max(1.0) as usize,
        MaxFeatures::Fixed(n) => n,
        MaxFeatures::All => n_features,
    };
    if resolved == 0 || resolved > n_features {
        return Err(RfError::InvalidMaxFeatures {
            max_features: resolved,
            n_features,
        });
    }
    Ok(resolved)
}

/// Flatten validated row-major samples into the library's matrix type.
pub(crate) fn to_matrix(features: &[Vec<f64>], n_features: usize) -> DenseMatrix<f64> {
    let values: Vec<f64> = features.iter().flatten().copied().collect();
    DenseMatrix::new(features.len(), n_features, values, false)
}

/// Check that every row has `n_features` finite values.
fn check_rows(features: &[Vec<f64>], n_features: usize) -> Result<(), RfError> {
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(RfError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(RfError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(())
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train<S: AsRef<str>>(
    config: &RandomForestConfig,
    features: &[Vec<f64>],
    labels: &[S],
    feature_names: &[String],
) -> Result<RandomForest, RfError> {
    config.validate()?;

    // --- Validate inputs ---
    if features.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    let n_samples = features.len();
    let n_features = features[0].len();
    if n_features == 0 {
        return Err(RfError::ZeroFeatures);
    }
    check_rows(features, n_features)?;
    if labels.len() != n_samples {
        return Err(RfError::LabelCountMismatch {
            samples: n_samples,
            labels: labels.len(),
        });
    }
    if feature_names.len() != n_features {
        return Err(RfError::FeatureNameCountMismatch {
            expected: n_features,
            got: feature_names.len(),
        });
    }

    let max_features = resolve_max_features(config.max_features, n_features)?;
    let encoder = LabelEncoder::fit(labels);
    let y = encoder.encode(labels)?;
    let x = to_matrix(features, n_features);
    debug!(
        n_features,
        n_classes = encoder.n_classes(),
        max_features,
        "inputs validated"
    );

    let criterion = match config.criterion {
        SplitCriterion::Gini => TreeCriterion::Gini,
        SplitCriterion::Entropy => TreeCriterion::Entropy,
    };
    let mut params = RandomForestClassifierParameters::default()
        .with_n_trees(config.n_trees)
        .with_criterion(criterion)
        .with_min_samples_split(config.min_samples_split)
        .with_min_samples_leaf(config.min_samples_leaf)
        .with_m(max_features)
        .with_seed(config.seed);
    if let Some(max_depth) = config.max_depth {
        params = params.with_max_depth(max_depth);
    }

    let classifier = Classifier::fit(&x, &y, params).map_err(|e| RfError::Fit {
        reason: e.to_string(),
    })?;

    info!(
        n_trees = config.n_trees,
        n_classes = encoder.n_classes(),
        "forest trained"
    );

    Ok(RandomForest {
        classifier,
        encoder,
        n_trees: usize::from(config.n_trees),
        n_features,
        feature_names: feature_names.to_vec(),
    })
}

impl RandomForest {
    /// Predict class indices for a batch of samples.
    pub(crate) fn predict_indices(&self, features: &[Vec<f64>]) -> Result<Vec<u32>, RfError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = features.iter().find(|row| row.len() != self.n_features) {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        check_rows(features, self.n_features)?;

        let x = to_matrix(features, self.n_features);
        self.classifier.predict(&x).map_err(|e| RfError::Predict {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn resolve_max_features_variants() {
        assert_eq!(resolve_max_features(MaxFeatures::Sqrt, 10).unwrap(), 3);
        assert_eq!(resolve_max_features(MaxFeatures::Log2, 8).unwrap(), 3);
        assert_eq!(resolve_max_features(MaxFeatures::All, 7).unwrap(), 7);
        assert_eq!(resolve_max_features(MaxFeatures::Fixed(2), 7).unwrap(), 2);
        assert!(matches!(
            resolve_max_features(MaxFeatures::Fixed(0), 7),
            Err(RfError::InvalidMaxFeatures { .. })
        ));
        assert!(matches!(
            resolve_max_features(MaxFeatures::Fixed(8), 7),
            Err(RfError::InvalidMaxFeatures { .. })
        ));
    }

    #[test]
    fn sqrt_rounds_down_like_the_library_default() {
        // Six pose coordinates: two candidate features per split.
        assert_eq!(resolve_max_features(MaxFeatures::Sqrt, 6).unwrap(), 2);
        assert_eq!(resolve_max_features(MaxFeatures::Sqrt, 66).unwrap(), 8);
        assert_eq!(resolve_max_features(MaxFeatures::Sqrt, 1).unwrap(), 1);
        assert_eq!(resolve_max_features(MaxFeatures::Sqrt, 3).unwrap(), 1);
    }

    #[test]
    fn empty_dataset_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let labels: Vec<String> = Vec::new();
        let err = config.fit(&[], &labels, &[]).unwrap_err();
        assert!(matches!(err, RfError::EmptyDataset));
    }

    #[test]
    fn zero_features_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let err = config.fit(&[vec![], vec![]], &["a", "b"], &[]).unwrap_err();
        assert!(matches!(err, RfError::ZeroFeatures));
    }

    #[test]
    fn ragged_rows_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let features = vec![vec![1.0, 2.0], vec![3.0]];
        let err = config.fit(&features, &["a", "b"], &names(2)).unwrap_err();
        assert!(matches!(
            err,
            RfError::FeatureCountMismatch {
                expected: 2,
                got: 1,
                sample_index: 1
            }
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let features = vec![vec![1.0, 2.0], vec![3.0, f64::NAN]];
        let err = config.fit(&features, &["a", "b"], &names(2)).unwrap_err();
        assert!(matches!(
            err,
            RfError::NonFiniteValue {
                sample_index: 1,
                feature_index: 1
            }
        ));
    }

    #[test]
    fn label_count_mismatch_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let features = vec![vec![1.0], vec![2.0]];
        let err = config.fit(&features, &["a"], &names(1)).unwrap_err();
        assert!(matches!(
            err,
            RfError::LabelCountMismatch {
                samples: 2,
                labels: 1
            }
        ));
    }

    #[test]
    fn feature_name_count_mismatch_rejected() {
        let config = RandomForestConfig::new(5).unwrap();
        let features = vec![vec![1.0, 2.0], vec![2.0, 3.0]];
        let err = config.fit(&features, &["a", "b"], &names(3)).unwrap_err();
        assert!(matches!(
            err,
            RfError::FeatureNameCountMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn fit_records_metadata() {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 1.0],
            vec![11.0, 1.0],
            vec![12.0, 1.0],
        ];
        let labels = ["low", "low", "low", "high", "high", "high"];
        let forest = RandomForestConfig::new(7)
            .unwrap()
            .fit(&features, &labels, &names(2))
            .unwrap();
        assert_eq!(forest.n_trees(), 7);
        assert_eq!(forest.n_features(), 2);
        assert_eq!(forest.n_classes(), 2);
        assert_eq!(forest.classes(), &["high", "low"]);
        assert_eq!(forest.feature_names(), &["f0", "f1"]);
    }
}
