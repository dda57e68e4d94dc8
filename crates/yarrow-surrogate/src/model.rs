//! The random-forest surrogate adapter.

use tracing::instrument;
use yarrow_forest::{
    FeatureType, Prediction, RegressionData, RegressionForest, RegressionForestConfig,
};

use crate::config::SurrogateConfig;
use crate::dedup::DedupLogger;
use crate::error::SurrogateError;

/// Variance floor: predicted variances below this are clamped up to it,
/// preventing downstream numerical instability (e.g. division by near-zero
/// variance in an acquisition function).
pub const VAR_THRESHOLD: f64 = 1e-5;

const CAP_MESSAGE: &str = "predicted variance is small, capping to 10^-5";

/// Random-forest surrogate that takes instance features into account.
///
/// Constructed once with a per-dimension feature specification (cardinality
/// 0 = continuous, k = k categories), an optional instance feature matrix,
/// and a fixed hyperparameter bundle. [`train`](Self::train) may be called
/// repeatedly with fresh datasets; each call discards the prior fit.
/// [`predict`](Self::predict) marginalizes over the configured instances.
///
/// When instance features are present, the feature specification must cover
/// the augmented input: configuration dimensions first, then one entry per
/// instance feature column.
#[derive(Debug)]
pub struct RandomForestSurrogate {
    feature_types: Vec<FeatureType>,
    instance_features: Option<Vec<Vec<f64>>>,
    config: SurrogateConfig,
    forest_config: RegressionForestConfig,
    forest: Option<RegressionForest>,
    train_x: Vec<Vec<f64>>,
    train_y: Vec<f64>,
    log: DedupLogger,
}

/// Derive the max-features flag from the feature ratio: a ratio of 1.0 or
/// more means unlimited (flag value 0), otherwise `max(1, floor(D * ratio))`.
fn derive_max_features(n_dims: usize, ratio: f64) -> usize {
    if ratio >= 1.0 {
        0
    } else {
        ((n_dims as f64 * ratio) as usize).max(1)
    }
}

/// Combine per-instance predictions into one marginalized estimate.
///
/// Mean: average of the per-instance means. Variance: total-variance
/// decomposition — the average per-instance variance plus the population
/// variance of the per-instance means (no degrees-of-freedom correction).
fn marginalize(predictions: &[Prediction]) -> Prediction {
    let n = predictions.len() as f64;
    let mut mean_sum = 0.0;
    let mut mean_sq_sum = 0.0;
    let mut var_sum = 0.0;
    for p in predictions {
        mean_sum += p.mean;
        mean_sq_sum += p.mean * p.mean;
        var_sum += p.variance;
    }
    let mean = mean_sum / n;
    let between = (mean_sq_sum / n - mean * mean).max(0.0);
    Prediction {
        mean,
        variance: var_sum / n + between,
    }
}

/// Clamp every variance below [`VAR_THRESHOLD`] up to the floor and replace
/// every NaN variance with the floor. Batch-path normalization only; the
/// single-point path deliberately leaves NaN untouched.
fn floor_variances(variances: &mut [f64]) {
    for v in variances.iter_mut() {
        if v.is_nan() || *v < VAR_THRESHOLD {
            *v = VAR_THRESHOLD;
        }
    }
}

/// Single-point variance clamp: values below [`VAR_THRESHOLD`] are raised to
/// the floor with a deduplicated debug notice. NaN compares false against
/// the floor and passes through unchanged, unlike the batch path.
fn floor_single_variance(variance: f64, log: &DedupLogger) -> f64 {
    if variance < VAR_THRESHOLD {
        log.debug(CAP_MESSAGE);
        VAR_THRESHOLD
    } else {
        variance
    }
}

impl RandomForestSurrogate {
    /// Build a surrogate from a feature specification, an optional instance
    /// feature matrix, and a hyperparameter bundle.
    ///
    /// `feature_spec[i]` is the cardinality of dimension `i`: 0 for a
    /// continuous dimension, k for a categorical one with k categories.
    /// An empty instance matrix is treated the same as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SurrogateError::InstanceRowMismatch`] or
    /// [`SurrogateError::EmptyInstanceRow`] when the instance matrix is
    /// ragged or has zero-width rows, and [`SurrogateError::Forest`] when
    /// the hyperparameter bundle is rejected by the engine. A feature
    /// specification inconsistent with the training data surfaces later,
    /// from [`train`](Self::train).
    pub fn new(
        feature_spec: &[usize],
        instance_features: Option<Vec<Vec<f64>>>,
        config: SurrogateConfig,
    ) -> Result<Self, SurrogateError> {
        let instance_features = match instance_features {
            Some(rows) if rows.is_empty() => None,
            other => other,
        };
        if let Some(rows) = &instance_features {
            let expected = rows[0].len();
            if expected == 0 {
                return Err(SurrogateError::EmptyInstanceRow);
            }
            for (row_index, row) in rows.iter().enumerate() {
                if row.len() != expected {
                    return Err(SurrogateError::InstanceRowMismatch {
                        expected,
                        got: row.len(),
                        row_index,
                    });
                }
            }
        }

        let feature_types: Vec<FeatureType> = feature_spec
            .iter()
            .map(|&n| FeatureType::from_cardinality(n))
            .collect();

        let max_features = derive_max_features(feature_spec.len(), config.ratio_features());
        let max_depth = match config.max_depth() {
            0 => None,
            d => Some(d),
        };
        let forest_config = RegressionForestConfig::new(config.num_trees())?
            .with_bootstrapping(config.do_bootstrapping())
            .with_n_points_per_tree(config.n_points_per_tree())
            .with_max_features(max_features)
            .with_min_samples_split(config.min_samples_split())
            .with_min_samples_leaf(config.min_samples_leaf())
            .with_max_depth(max_depth)
            .with_epsilon_purity(config.eps_purity())
            .with_max_num_nodes(config.max_num_nodes())
            .with_seed(config.seed());

        Ok(Self {
            feature_types,
            instance_features,
            config,
            forest_config,
            forest: None,
            train_x: Vec::new(),
            train_y: Vec::new(),
            log: DedupLogger::new("rf_surrogate"),
        })
    }

    /// Train the forest on a fresh dataset, replacing any prior fit.
    ///
    /// `x` is row-major N×D (D matching the feature specification, instance
    /// feature columns included); `y` holds the N observed targets. The
    /// training set is stored and readable through
    /// [`training_inputs`](Self::training_inputs) /
    /// [`training_targets`](Self::training_targets) until the next call.
    ///
    /// # Errors
    ///
    /// Propagates engine errors unchanged: shape mismatches against the
    /// feature specification, non-finite values, invalid category values,
    /// or a hyperparameter bundle the engine rejects for this data.
    #[instrument(skip_all, fields(n_samples = x.len()))]
    pub fn train(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), SurrogateError> {
        self.train_x = x.to_vec();
        self.train_y = y.to_vec();
        let data = RegressionData::new(x.to_vec(), y.to_vec(), self.feature_types.clone())?;
        self.forest = Some(self.forest_config.fit(&data)?);
        Ok(())
    }

    /// Predict mean and variance for a single configuration, marginalized
    /// over the configured instances.
    ///
    /// Without instance features this is the engine's direct single-point
    /// output. With K instance rows, the point is tiled K times, each copy
    /// concatenated with one instance row, and the per-instance estimates
    /// are combined by the total-variance decomposition. No variance floor
    /// is applied on this path.
    ///
    /// # Errors
    ///
    /// Returns [`SurrogateError::NotTrained`] before the first successful
    /// [`train`](Self::train); width mismatches propagate from the engine.
    pub fn predict(&self, x: &[f64]) -> Result<Prediction, SurrogateError> {
        let forest = self.forest.as_ref().ok_or(SurrogateError::NotTrained)?;

        let Some(instances) = &self.instance_features else {
            return Ok(forest.predict(x)?);
        };

        let augmented: Vec<Vec<f64>> = instances
            .iter()
            .map(|inst| x.iter().chain(inst.iter()).copied().collect())
            .collect();
        let per_instance = forest.predict_batch(&augmented)?;
        Ok(marginalize(&per_instance))
    }

    /// Raw multi-point prediction without instance marginalization,
    /// batch variant.
    ///
    /// Returns the per-row means and variances. Every variance below
    /// [`VAR_THRESHOLD`] is raised exactly to the floor, and every NaN
    /// variance is replaced by the floor. Used by callers needing per-point
    /// estimates, e.g. imputation of censored observations.
    ///
    /// # Errors
    ///
    /// Returns [`SurrogateError::NotTrained`] before the first successful
    /// [`train`](Self::train); width mismatches propagate from the engine.
    pub fn predict_raw_batch(
        &self,
        xs: &[Vec<f64>],
    ) -> Result<(Vec<f64>, Vec<f64>), SurrogateError> {
        let forest = self.forest.as_ref().ok_or(SurrogateError::NotTrained)?;
        let predictions = forest.predict_batch(xs)?;
        let means: Vec<f64> = predictions.iter().map(|p| p.mean).collect();
        let mut variances: Vec<f64> = predictions.iter().map(|p| p.variance).collect();
        floor_variances(&mut variances);
        Ok((means, variances))
    }

    /// Raw single-point prediction without instance marginalization.
    ///
    /// A variance below [`VAR_THRESHOLD`] is clamped to the floor with a
    /// deduplicated debug-level notice. Unlike
    /// [`predict_raw_batch`](Self::predict_raw_batch), a NaN variance is
    /// passed through unchanged; the two variants intentionally preserve
    /// this asymmetry rather than silently unifying the contracts.
    ///
    /// # Errors
    ///
    /// Returns [`SurrogateError::NotTrained`] before the first successful
    /// [`train`](Self::train); width mismatches propagate from the engine.
    pub fn predict_raw_single(&self, x: &[f64]) -> Result<(f64, f64), SurrogateError> {
        let forest = self.forest.as_ref().ok_or(SurrogateError::NotTrained)?;
        let prediction = forest.predict(x)?;
        let variance = floor_single_variance(prediction.variance, &self.log);
        Ok((prediction.mean, variance))
    }

    // --- Accessors ---

    /// Return the hyperparameter bundle.
    #[must_use]
    pub fn config(&self) -> &SurrogateConfig {
        &self.config
    }

    /// Export the raw hyperparameter list for reproducibility logging.
    #[must_use]
    pub fn hyperparameters(&self) -> Vec<(&'static str, f64)> {
        self.config.hyperparameters()
    }

    /// Return the derived max-features flag (0 = unlimited).
    #[must_use]
    pub fn max_features(&self) -> usize {
        self.forest_config.max_features()
    }

    /// Return the per-dimension feature types.
    #[must_use]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    /// Return the configured instance feature matrix, if any.
    #[must_use]
    pub fn instance_features(&self) -> Option<&[Vec<f64>]> {
        self.instance_features.as_deref()
    }

    /// Return `true` once a successful [`train`](Self::train) has happened.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.forest.is_some()
    }

    /// Borrow the last fitted forest, if any.
    #[must_use]
    pub fn forest(&self) -> Option<&RegressionForest> {
        self.forest.as_ref()
    }

    /// Return the inputs of the last training call.
    #[must_use]
    pub fn training_inputs(&self) -> &[Vec<f64>] {
        &self.train_x
    }

    /// Return the targets of the last training call.
    #[must_use]
    pub fn training_targets(&self) -> &[f64] {
        &self.train_y
    }
}
