//! Prediction methods for the regression forest ensemble.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::ForestError;
use crate::forest::RegressionForest;

/// Predictive mean and variance for a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predictive mean.
    pub mean: f64,
    /// Predictive variance (never negative).
    pub variance: f64,
}

impl RegressionForest {
    /// Predict mean and variance for a single sample.
    ///
    /// The mean is the average of the per-tree leaf means. The variance
    /// follows the law of total variance over trees: the average leaf
    /// variance plus the population variance of the leaf means.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when
    /// `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<Prediction, ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }

        let n = self.trees.len() as f64;
        let mut mean_sum = 0.0;
        let mut mean_sq_sum = 0.0;
        let mut var_sum = 0.0;
        for tree in &self.trees {
            let (leaf_mean, leaf_var) = tree.leaf_estimate(sample);
            mean_sum += leaf_mean;
            mean_sq_sum += leaf_mean * leaf_mean;
            var_sum += leaf_var;
        }

        let mean = mean_sum / n;
        let between = (mean_sq_sum / n - mean * mean).max(0.0);
        let variance = var_sum / n + between;

        Ok(Prediction { mean, variance })
    }

    /// Predict a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] if any sample has
    /// the wrong feature count.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<Prediction>, ForestError> {
        samples
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Borrow the fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[crate::tree::RegressionTree] {
        &self.trees
    }
}
