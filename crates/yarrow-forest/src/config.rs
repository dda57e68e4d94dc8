//! Configuration builder for regression forest training.

use crate::data::RegressionData;
use crate::error::ForestError;
use crate::forest::RegressionForest;

/// Configuration for regression forest training.
///
/// Construct via [`RegressionForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default             |
/// |---------------------|---------------------|
/// | `do_bootstrapping`  | `true`              |
/// | `n_points_per_tree` | 0 (full sample count) |
/// | `max_features`      | 0 (all features)    |
/// | `min_samples_split` | 2                   |
/// | `min_samples_leaf`  | 1                   |
/// | `max_depth`         | `None` (unlimited)  |
/// | `epsilon_purity`    | 1e-8                |
/// | `max_num_nodes`     | 0 (unlimited)       |
/// | `seed`              | 42                  |
#[derive(Debug, Clone)]
pub struct RegressionForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) do_bootstrapping: bool,
    pub(crate) n_points_per_tree: usize,
    pub(crate) max_features: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_depth: Option<usize>,
    pub(crate) epsilon_purity: f64,
    pub(crate) max_num_nodes: usize,
    pub(crate) seed: u64,
}

impl RegressionForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            do_bootstrapping: true,
            n_points_per_tree: 0,
            max_features: 0,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_depth: None,
            epsilon_purity: 1e-8,
            max_num_nodes: 0,
            seed: 42,
        })
    }

    // --- Setters ---

    /// Turn bootstrapping on or off. With it off, every tree sees the same
    /// points (all of them, or a without-replacement subset when
    /// `n_points_per_tree` is smaller than the dataset).
    #[must_use]
    pub fn with_bootstrapping(mut self, do_bootstrapping: bool) -> Self {
        self.do_bootstrapping = do_bootstrapping;
        self
    }

    /// Set the number of points drawn per tree. 0 means the full sample count.
    #[must_use]
    pub fn with_n_points_per_tree(mut self, n_points_per_tree: usize) -> Self {
        self.n_points_per_tree = n_points_per_tree;
        self
    }

    /// Set the maximum number of features considered at each split.
    /// 0 means all features.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
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

    /// Set the maximum tree depth. `None` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum RSS decrease below which a split is not performed.
    #[must_use]
    pub fn with_epsilon_purity(mut self, epsilon_purity: f64) -> Self {
        self.epsilon_purity = epsilon_purity;
        self
    }

    /// Set the node count cap per tree. 0 means unlimited.
    #[must_use]
    pub fn with_max_num_nodes(mut self, max_num_nodes: usize) -> Self {
        self.max_num_nodes = max_num_nodes;
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
        self.n_trees
    }

    /// Return whether bootstrapping is enabled.
    #[must_use]
    pub fn do_bootstrapping(&self) -> bool {
        self.do_bootstrapping
    }

    /// Return the number of points drawn per tree (0 = full sample count).
    #[must_use]
    pub fn n_points_per_tree(&self) -> usize {
        self.n_points_per_tree
    }

    /// Return the max features per split (0 = all features).
    #[must_use]
    pub fn max_features(&self) -> usize {
        self.max_features
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

    /// Return the maximum depth limit, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Return the purity epsilon.
    #[must_use]
    pub fn epsilon_purity(&self) -> f64 {
        self.epsilon_purity
    }

    /// Return the node count cap per tree (0 = unlimited).
    #[must_use]
    pub fn max_num_nodes(&self) -> usize {
        self.max_num_nodes
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Train a regression forest on the provided dataset.
    ///
    /// # Errors
    ///
    /// | Variant                                  | When                                         |
    /// |------------------------------------------|----------------------------------------------|
    /// | [`ForestError::InvalidMaxFeatures`]      | `max_features` exceeds the feature count     |
    /// | [`ForestError::InvalidMinSamplesSplit`]  | `min_samples_split` < 2                      |
    /// | [`ForestError::InvalidMinSamplesLeaf`]   | `min_samples_leaf` is zero                   |
    /// | [`ForestError::InvalidMaxDepth`]         | `max_depth` is `Some(0)`                     |
    pub fn fit(&self, data: &RegressionData) -> Result<RegressionForest, ForestError> {
        crate::forest::train(self, data)
    }
}
