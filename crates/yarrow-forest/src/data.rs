//! Training data container for regression forests.

use crate::error::ForestError;
use crate::feature::FeatureType;

/// A validated training dataset: row-major inputs, one target per row, and
/// a per-column feature specification.
///
/// Construction performs all structural validation up front, so fitting
/// never fails on data errors.
#[derive(Debug, Clone)]
pub struct RegressionData {
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
    feature_types: Vec<FeatureType>,
}

impl RegressionData {
    /// Build a container from row-major inputs, targets, and feature types.
    ///
    /// `rows[sample_idx][feature_idx]` — row-major layout.
    /// `targets[sample_idx]` — observed response values.
    ///
    /// # Errors
    ///
    /// | Variant                              | When                                             |
    /// |--------------------------------------|--------------------------------------------------|
    /// | [`ForestError::EmptyDataset`]        | `rows` is empty                                  |
    /// | [`ForestError::ZeroFeatures`]        | `feature_types` is empty                         |
    /// | [`ForestError::FeatureCountMismatch`]| a row's width differs from the feature spec      |
    /// | [`ForestError::TargetCountMismatch`] | `targets.len() != rows.len()`                    |
    /// | [`ForestError::NonFiniteValue`]      | any input value is NaN or infinite               |
    /// | [`ForestError::NonFiniteTarget`]     | any target is NaN or infinite                    |
    /// | [`ForestError::InvalidCategoryValue`]| a categorical column holds a non-integer or out-of-range value |
    pub fn new(
        rows: Vec<Vec<f64>>,
        targets: Vec<f64>,
        feature_types: Vec<FeatureType>,
    ) -> Result<Self, ForestError> {
        if rows.is_empty() {
            return Err(ForestError::EmptyDataset);
        }
        if feature_types.is_empty() {
            return Err(ForestError::ZeroFeatures);
        }
        if targets.len() != rows.len() {
            return Err(ForestError::TargetCountMismatch {
                n_samples: rows.len(),
                n_targets: targets.len(),
            });
        }

        let n_features = feature_types.len();
        for (sample_index, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(ForestError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            for (feature_index, &val) in row.iter().enumerate() {
                if !val.is_finite() {
                    return Err(ForestError::NonFiniteValue {
                        sample_index,
                        feature_index,
                    });
                }
                if let FeatureType::Categorical { n_categories } = feature_types[feature_index]
                    && (val.fract() != 0.0 || val < 0.0 || val >= n_categories as f64)
                {
                    return Err(ForestError::InvalidCategoryValue {
                        sample_index,
                        feature_index,
                        value: val,
                        n_categories,
                    });
                }
            }
        }
        for (sample_index, &y) in targets.iter().enumerate() {
            if !y.is_finite() {
                return Err(ForestError::NonFiniteTarget { sample_index });
            }
        }

        Ok(Self {
            rows,
            targets,
            feature_types,
        })
    }

    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_types.len()
    }

    /// Return the row-major input rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Return the target values.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Return the per-column feature specification.
    #[must_use]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }
}
