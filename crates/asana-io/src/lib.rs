//! File I/O and validation for the asana trainer: labeled CSV tables in,
//! JSON evaluation reports out.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ClassLabel, LabeledDataset};
pub use error::IoError;
pub use reader::{DEFAULT_LABEL_COLUMN, TableReader};
pub use writer::{ClassReport, EvaluationReport, ReportWriter};
