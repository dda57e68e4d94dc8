use std::fmt;

/// Zero-based feature column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based column position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<RegressionNode>` arena, identifying a node in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Routing rule at an interior split node.
#[derive(Debug, Clone)]
pub enum SplitRule {
    /// Continuous split: samples with `value <= threshold` go left.
    Threshold(f64),
    /// Categorical split: samples whose category is in the (sorted) set go
    /// left, everything else — including categories unseen at this node
    /// during training — goes right.
    Categories(Vec<u32>),
}

impl SplitRule {
    /// Return `true` when `value` routes to the left child.
    #[must_use]
    pub fn goes_left(&self, value: f64) -> bool {
        match self {
            SplitRule::Threshold(threshold) => value <= *threshold,
            SplitRule::Categories(left_set) => {
                left_set.binary_search(&(value as u32)).is_ok()
            }
        }
    }
}

/// A node in a regression tree arena.
///
/// Trees are stored as `Vec<RegressionNode>` where children are referenced
/// by [`NodeIndex`] rather than pointers for cache-friendly traversal.
#[derive(Debug, Clone)]
pub enum RegressionNode {
    /// An interior split node.
    Split {
        /// Feature used for the split.
        feature: FeatureIndex,
        /// Routing rule for this split.
        rule: SplitRule,
        /// Index of the left child node.
        left: NodeIndex,
        /// Index of the right child node.
        right: NodeIndex,
        /// Number of training samples that reached this node.
        n_samples: usize,
    },
    /// A terminal leaf node.
    Leaf {
        /// Mean target value of the training samples in this leaf.
        mean: f64,
        /// Population variance of the training targets in this leaf.
        variance: f64,
        /// Number of training samples in this leaf.
        n_samples: usize,
    },
}

impl RegressionNode {
    /// Return the number of training samples that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            RegressionNode::Split { n_samples, .. }
            | RegressionNode::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, RegressionNode::Leaf { .. })
    }
}
