use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Matrice de features réduites + indices de classe, prête pour l'entraînement.
///
/// `features` is row-major, `rows × cols`; `labels[i]` is the class of row
/// `i`; `vocabulary[labels[i]]` decodes it back to a chord name.
///
/// # Example
/// ```
/// use cp_core::training::TrainingSet;
/// let set = TrainingSet::new(vec![0.0; 24], 2, 12, vec![0, 21], vec!["C".into()]).unwrap();
/// assert_eq!(set.row(1).len(), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TrainingSet {
    /// Row-major feature matrix.
    pub features: Vec<f32>,
    /// Number of rows (usable samples).
    pub rows: usize,
    /// Number of columns (chroma bins).
    pub cols: usize,
    /// Class index per row.
    pub labels: Vec<u32>,
    /// Ordered vocabulary used to assign the indices.
    pub vocabulary: Vec<String>,
}

impl TrainingSet {
    /// Build a set, checking that dimensions agree.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `features.len() != rows * cols`
    /// or `labels.len() != rows`.
    pub fn new(
        features: Vec<f32>,
        rows: usize,
        cols: usize,
        labels: Vec<u32>,
        vocabulary: Vec<String>,
    ) -> Result<Self, CoreError> {
        if features.len() != rows * cols || labels.len() != rows {
            return Err(CoreError::InvalidDimensions {
                rows,
                cols,
                len: features.len(),
            });
        }
        Ok(Self {
            features,
            rows,
            cols,
            labels,
            vocabulary,
        })
    }

    /// One row of the matrix.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.features[i * self.cols..(i + 1) * self.cols]
    }

    /// Vector count equals label count and matches the matrix size.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.features.len() == self.rows * self.cols && self.labels.len() == self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_label_count() {
        let err = TrainingSet::new(vec![0.0; 12], 1, 12, vec![0, 1], vec![]);
        assert!(matches!(err, Err(CoreError::InvalidDimensions { rows: 1, .. })));
    }

    #[test]
    fn rows_are_contiguous_slices() -> Result<(), CoreError> {
        let set = TrainingSet::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, vec![3, 4], vec![])?;
        assert_eq!(set.row(0), &[1.0, 2.0]);
        assert_eq!(set.row(1), &[3.0, 4.0]);
        assert!(set.is_consistent());
        Ok(())
    }
}
