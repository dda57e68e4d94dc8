use yarrow_forest::ForestError;

/// Errors from surrogate model operations.
#[derive(Debug, thiserror::Error)]
pub enum SurrogateError {
    /// Returned when `predict` is called before any successful `train`.
    #[error("predict called before the surrogate was trained")]
    NotTrained,

    /// Returned when instance feature rows have inconsistent widths.
    #[error("instance row {row_index} has {got} features, expected {expected}")]
    InstanceRowMismatch {
        /// Width of the first instance row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
        /// The zero-based index of the offending row.
        row_index: usize,
    },

    /// Returned when instance rows are empty vectors.
    #[error("instance feature rows must not be empty")]
    EmptyInstanceRow,

    /// An error surfaced by the underlying forest engine.
    #[error(transparent)]
    Forest(#[from] ForestError),
}
