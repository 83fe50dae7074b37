//! Random Forest pose classification: train, score, save, load.
//!
//! Wraps the `smartcore` random forest with input validation, string class
//! labels, accuracy and confusion-matrix scoring, and a versioned bincode
//! model file.

mod config;
mod confusion;
mod encoder;
mod error;
mod forest;
mod predict;
mod serialize;

pub use config::{MaxFeatures, RandomForestConfig, SplitCriterion};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use encoder::LabelEncoder;
pub use error::RfError;
pub use forest::RandomForest;
pub use predict::{Evaluation, accuracy_score};
