//! Configuration builder for Random Forest training.

use crate::error::RfError;
use crate::forest::RandomForest;

/// Strategy for determining the number of features to consider at each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFeatures {
    /// Square root of total features, rounded down (at least one).
    Sqrt,
    /// Log base 2 of total features, rounded down (at least one).
    Log2,
    /// A fixed count.
    Fixed(usize),
    /// All features (no subsampling).
    All,
}

/// Split quality criterion used by each tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitCriterion {
    /// Gini impurity.
    Gini,
    /// Shannon entropy.
    Entropy,
}

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default     |
/// |----------------------|-------------|
/// | `max_features`       | `Sqrt`      |
/// | `max_depth`          | `None`      |
/// | `min_samples_split`  | 2           |
/// | `min_samples_leaf`   | 1           |
/// | `criterion`          | `Gini`      |
/// | `seed`               | 42          |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: u16,
    pub(crate) max_features: MaxFeatures,
    pub(crate) max_depth: Option<u16>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) criterion: SplitCriterion,
    pub(crate) seed: u64,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `n_trees` is zero or larger
    /// than `u16::MAX`.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        let n_trees = u16::try_from(n_trees)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(RfError::InvalidTreeCount {
                n_trees,
                max: usize::from(u16::MAX),
            })?;
        Ok(Self {
            n_trees,
            max_features: MaxFeatures::Sqrt,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: SplitCriterion::Gini,
            seed: 42,
        })
    }

    // --- Setters ---

    /// Set the max features strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the maximum tree depth. `None` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<u16>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        usize::from(self.n_trees)
    }

    /// Return the max features strategy.
    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    /// Return the maximum depth limit, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the minimum samples required in each leaf.
    #[must_use]
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Return the split criterion.
    #[must_use]
    pub fn criterion(&self) -> SplitCriterion {
        self.criterion
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Check the tree-shape parameters that do not depend on the data.
    pub(crate) fn validate(&self) -> Result<(), RfError> {
        if let Some(max_depth) = self.max_depth
            && max_depth == 0
        {
            return Err(RfError::InvalidMaxDepth { max_depth });
        }
        if self.min_samples_split < 2 {
            return Err(RfError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(RfError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }
        Ok(())
    }

    /// Train a Random Forest on the provided dataset.
    ///
    /// `features[sample_idx][feature_idx]` — row-major layout.
    /// `labels[sample_idx]` — class names, one per row.
    /// `feature_names` — names for each feature column.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                              |
    /// |----------------------------------------|---------------------------------------------------|
    /// | [`RfError::InvalidMaxDepth`]           | `max_depth` is `Some(0)`                          |
    /// | [`RfError::InvalidMinSamplesSplit`]    | `min_samples_split` < 2                           |
    /// | [`RfError::InvalidMinSamplesLeaf`]     | `min_samples_leaf` is zero                        |
    /// | [`RfError::EmptyDataset`]              | `features` is empty                               |
    /// | [`RfError::ZeroFeatures`]              | rows have zero feature columns                    |
    /// | [`RfError::FeatureCountMismatch`]      | rows have inconsistent lengths                    |
    /// | [`RfError::FeatureNameCountMismatch`]  | `feature_names` length differs from row width     |
    /// | [`RfError::LabelCountMismatch`]        | `labels` length differs from `features`           |
    /// | [`RfError::NonFiniteValue`]            | any value is NaN or infinite                      |
    /// | [`RfError::InvalidMaxFeatures`]        | resolved max_features is outside [1, n_features]  |
    /// | [`RfError::Fit`]                       | the underlying library rejected the data          |
    pub fn fit<S: AsRef<str>>(
        &self,
        features: &[Vec<f64>],
        labels: &[S],
        feature_names: &[String],
    ) -> Result<RandomForest, RfError> {
        crate::forest::train(self, features, labels, feature_names)
    }
}
