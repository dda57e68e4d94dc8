use std::fmt;

/// Per-dimension feature descriptor.
///
/// Continuous dimensions split on numeric thresholds; categorical dimensions
/// split on subsets of their category values. The raw wire form used by
/// callers is a cardinality: 0 for continuous, k for k categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureType {
    /// A real-valued dimension.
    Continuous,
    /// A categorical dimension with values in `[0, n_categories)`.
    Categorical {
        /// Number of distinct category values.
        n_categories: usize,
    },
}

impl FeatureType {
    /// Build a feature type from its cardinality: 0 means continuous,
    /// any other value is the number of categories.
    #[must_use]
    pub fn from_cardinality(n_categories: usize) -> Self {
        if n_categories == 0 {
            FeatureType::Continuous
        } else {
            FeatureType::Categorical { n_categories }
        }
    }

    /// Return `true` if this dimension is categorical.
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, FeatureType::Categorical { .. })
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Continuous => write!(f, "continuous"),
            FeatureType::Categorical { n_categories } => {
                write!(f, "categorical({n_categories})")
            }
        }
    }
}
