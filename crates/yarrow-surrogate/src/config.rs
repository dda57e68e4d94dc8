//! Hyperparameter bundle for the random-forest surrogate.

/// Forest construction hyperparameters, fixed at adapter construction.
///
/// Construct via [`SurrogateConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default          |
/// |---------------------|------------------|
/// | `num_trees`         | 30               |
/// | `do_bootstrapping`  | `true`           |
/// | `n_points_per_tree` | 0 (all points)   |
/// | `ratio_features`    | 5/6              |
/// | `min_samples_split` | 3                |
/// | `min_samples_leaf`  | 3                |
/// | `max_depth`         | 20 (0 = unlimited) |
/// | `eps_purity`        | 1e-8             |
/// | `max_num_nodes`     | 1000             |
/// | `seed`              | 42               |
#[derive(Debug, Clone)]
pub struct SurrogateConfig {
    num_trees: usize,
    do_bootstrapping: bool,
    n_points_per_tree: usize,
    ratio_features: f64,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_depth: usize,
    eps_purity: f64,
    max_num_nodes: usize,
    seed: u64,
}

impl SurrogateConfig {
    /// Create a config with the default hyperparameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_trees: 30,
            do_bootstrapping: true,
            n_points_per_tree: 0,
            ratio_features: 5.0 / 6.0,
            min_samples_split: 3,
            min_samples_leaf: 3,
            max_depth: 20,
            eps_purity: 1e-8,
            max_num_nodes: 1000,
            seed: 42,
        }
    }

    // --- Setters ---

    /// Set the number of trees in the forest.
    #[must_use]
    pub fn with_num_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees;
        self
    }

    /// Turn bootstrapping on or off.
    #[must_use]
    pub fn with_bootstrapping(mut self, do_bootstrapping: bool) -> Self {
        self.do_bootstrapping = do_bootstrapping;
        self
    }

    /// Set the number of data points per tree (0 = all points).
    #[must_use]
    pub fn with_n_points_per_tree(mut self, n_points_per_tree: usize) -> Self {
        self.n_points_per_tree = n_points_per_tree;
        self
    }

    /// Set the ratio of features considered at each split.
    #[must_use]
    pub fn with_ratio_features(mut self, ratio_features: f64) -> Self {
        self.ratio_features = ratio_features;
        self
    }

    /// Set the minimum number of data points to perform a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of data points in a leaf.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the maximum tree depth (0 = unlimited).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum impurity reduction below which a split is skipped.
    #[must_use]
    pub fn with_eps_purity(mut self, eps_purity: f64) -> Self {
        self.eps_purity = eps_purity;
        self
    }

    /// Set the node count cap per tree (0 = unlimited).
    #[must_use]
    pub fn with_max_num_nodes(mut self, max_num_nodes: usize) -> Self {
        self.max_num_nodes = max_num_nodes;
        self
    }

    /// Set the random seed passed to the forest.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Return whether bootstrapping is enabled.
    #[must_use]
    pub fn do_bootstrapping(&self) -> bool {
        self.do_bootstrapping
    }

    /// Return the number of data points per tree (0 = all points).
    #[must_use]
    pub fn n_points_per_tree(&self) -> usize {
        self.n_points_per_tree
    }

    /// Return the ratio of features considered at each split.
    #[must_use]
    pub fn ratio_features(&self) -> f64 {
        self.ratio_features
    }

    /// Return the minimum number of data points to perform a split.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the minimum number of data points in a leaf.
    #[must_use]
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Return the maximum tree depth (0 = unlimited).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the purity epsilon.
    #[must_use]
    pub fn eps_purity(&self) -> f64 {
        self.eps_purity
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

    /// Export the raw hyperparameter list for per-iteration reproducibility
    /// logging by the optimization loop.
    ///
    /// The order is fixed: trees, node cap, bootstrap flag, points per tree,
    /// feature ratio, split minimum, leaf minimum, depth cap, purity epsilon,
    /// seed. Booleans are encoded as 0/1.
    #[must_use]
    pub fn hyperparameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("num_trees", self.num_trees as f64),
            ("max_num_nodes", self.max_num_nodes as f64),
            ("do_bootstrapping", f64::from(u8::from(self.do_bootstrapping))),
            ("n_points_per_tree", self.n_points_per_tree as f64),
            ("ratio_features", self.ratio_features),
            ("min_samples_split", self.min_samples_split as f64),
            ("min_samples_leaf", self.min_samples_leaf as f64),
            ("max_depth", self.max_depth as f64),
            ("eps_purity", self.eps_purity),
            ("seed", self.seed as f64),
        ]
    }
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self::new()
    }
}
