//! Mapping between class names and the dense indices the classifier trains on.

use std::collections::BTreeSet;

use crate::error::RfError;

/// Sorted, de-duplicated class names seen during training.
///
/// Index `i` of the encoder is the class index `i as u32` handed to the
/// classifier, so the encoding is stable for a given label set regardless of
/// row order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build an encoder from the distinct labels in `labels`.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(|label| label.as_ref()).collect();
        Self {
            classes: classes.into_iter().map(String::from).collect(),
        }
    }

    /// Encode labels into class indices.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::UnknownClassLabel`] for a label not seen by
    /// [`LabelEncoder::fit`].
    pub(crate) fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<u32>, RfError> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.classes
                    .binary_search_by(|c| c.as_str().cmp(label))
                    .map(|idx| idx as u32)
                    .map_err(|_| RfError::UnknownClassLabel {
                        label: label.to_string(),
                        n_classes: self.classes.len(),
                    })
            })
            .collect()
    }

    /// Decode a class index back into its name.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::UnknownClassIndex`] for an index outside the fitted classes.
    pub fn decode(&self, index: u32) -> Result<&str, RfError> {
        self.classes
            .get(index as usize)
            .map(String::as_str)
            .ok_or(RfError::UnknownClassIndex {
                index,
                n_classes: self.classes.len(),
            })
    }

    /// Return the class names in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
