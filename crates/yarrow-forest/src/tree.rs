//! Single regression tree: growth and traversal.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::feature::FeatureType;
use crate::node::{NodeIndex, RegressionNode, SplitRule};
use crate::split::find_best_split;

/// Growth parameters for a single tree, resolved from the forest config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    /// Number of features considered at each split (already resolved,
    /// at least 1).
    pub(crate) max_features: usize,
    /// Minimum samples required to attempt a split.
    pub(crate) min_samples_split: usize,
    /// Minimum samples required in each child after a split.
    pub(crate) min_samples_leaf: usize,
    /// Depth cap; `None` means unlimited (root is depth 0).
    pub(crate) max_depth: Option<usize>,
    /// Minimum RSS decrease below which a split is not performed.
    pub(crate) epsilon_purity: f64,
    /// Arena size cap; 0 means unlimited.
    pub(crate) max_num_nodes: usize,
}

/// A fitted regression tree.
///
/// Stored as an arena-based `Vec<RegressionNode>` with index references.
/// Leaves carry the mean and population variance of their training targets.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    pub(crate) nodes: Vec<RegressionNode>,
    pub(crate) n_features: usize,
}

impl RegressionTree {
    /// Grow a tree on the given sample subset.
    ///
    /// `columns` is column-major and shared across all trees of a forest;
    /// `sample_indices` selects this tree's (bootstrap) sample.
    pub(crate) fn grow(
        columns: &[Vec<f64>],
        feature_types: &[FeatureType],
        targets: &[f64],
        sample_indices: &[usize],
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut arena: Vec<RegressionNode> = Vec::new();
        build_node(
            columns,
            feature_types,
            targets,
            sample_indices,
            params,
            0,
            0,
            rng,
            &mut arena,
        );
        debug!(n_nodes = arena.len(), "regression tree built");
        Self {
            nodes: arena,
            n_features: columns.len(),
        }
    }

    /// Return the leaf mean and variance for a single sample.
    ///
    /// Traverses from the root (index 0); width is checked by the forest.
    pub(crate) fn leaf_estimate(&self, sample: &[f64]) -> (f64, f64) {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                RegressionNode::Leaf { mean, variance, .. } => return (*mean, *variance),
                RegressionNode::Split {
                    feature,
                    rule,
                    left,
                    right,
                    ..
                } => {
                    if rule.goes_left(sample[feature.index()]) {
                        idx = left.index();
                    } else {
                        idx = right.index();
                    }
                }
            }
        }
    }

    /// Return the total number of nodes in the tree (splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));
        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                RegressionNode::Leaf { .. } => {
                    if d > max_depth {
                        max_depth = d;
                    }
                }
                RegressionNode::Split { left, right, .. } => {
                    queue.push_back((left.index(), d + 1));
                    queue.push_back((right.index(), d + 1));
                }
            }
        }
        max_depth
    }

    /// Return the number of features this tree was grown on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Mean and population variance of the targets selected by `sample_indices`.
fn leaf_stats(targets: &[f64], sample_indices: &[usize]) -> (f64, f64) {
    let n = sample_indices.len() as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for &si in sample_indices {
        sum += targets[si];
        sum_sq += targets[si] * targets[si];
    }
    let mean = sum / n;
    // Guard against tiny negative values from cancellation.
    let variance = (sum_sq / n - mean * mean).max(0.0);
    (mean, variance)
}

/// Recursively build the arena-based regression tree.
///
/// `pending` counts right siblings up the recursion stack that have not
/// been allocated yet; the node cap must leave room for each of them to
/// become at least a leaf.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`.
#[allow(clippy::too_many_arguments)]
fn build_node(
    columns: &[Vec<f64>],
    feature_types: &[FeatureType],
    targets: &[f64],
    sample_indices: &[usize],
    params: &TreeParams,
    depth: usize,
    pending: usize,
    rng: &mut ChaCha8Rng,
    arena: &mut Vec<RegressionNode>,
) -> NodeIndex {
    let n_samples = sample_indices.len();
    let (mean, variance) = leaf_stats(targets, sample_indices);

    let make_leaf = |arena: &mut Vec<RegressionNode>| -> NodeIndex {
        let idx = arena.len();
        arena.push(RegressionNode::Leaf {
            mean,
            variance,
            n_samples,
        });
        NodeIndex::new(idx)
    };

    // Stopping conditions: too few samples, depth cap, node cap, pure node.
    let depth_exceeded = params.max_depth.is_some_and(|max_d| depth >= max_d);
    let too_few = n_samples < params.min_samples_split;
    // A split needs room for this node, two children, and a leaf for every
    // pending right sibling up the stack.
    let node_cap_hit =
        params.max_num_nodes != 0 && arena.len() + 3 + pending > params.max_num_nodes;

    if too_few || depth_exceeded || node_cap_hit || variance == 0.0 {
        return make_leaf(arena);
    }

    let split = match find_best_split(
        columns,
        feature_types,
        targets,
        sample_indices,
        params.max_features,
        params.min_samples_leaf,
        rng,
    ) {
        Some(s) if s.rss_decrease >= params.epsilon_purity => s,
        _ => return make_leaf(arena),
    };

    // Arena pattern: reserve index, recurse, then overwrite with the split.
    let node_idx = arena.len();
    arena.push(RegressionNode::Leaf {
        mean,
        variance,
        n_samples,
    });

    let left_idx = build_node(
        columns,
        feature_types,
        targets,
        &split.left_indices,
        params,
        depth + 1,
        pending + 1,
        rng,
        arena,
    );
    let right_idx = build_node(
        columns,
        feature_types,
        targets,
        &split.right_indices,
        params,
        depth + 1,
        pending,
        rng,
        arena,
    );

    arena[node_idx] = RegressionNode::Split {
        feature: split.feature,
        rule: split.rule,
        left: left_idx,
        right: right_idx,
        n_samples,
    };

    NodeIndex::new(node_idx)
}
