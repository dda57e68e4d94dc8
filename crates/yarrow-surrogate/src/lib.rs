//! Random-forest surrogate model for sequential model-based optimization.
//!
//! Wraps the [`yarrow_forest`] regression engine as a probabilistic
//! surrogate: configurations (and optionally per-instance features) go in,
//! a posterior mean/variance estimate of the observed performance comes
//! out. When instance features are configured, predictions are marginalized
//! over the instance population using the total-variance decomposition.
//!
//! The adapter is deliberately thin: hyperparameter forwarding, the
//! instance-marginalization loop, and a variance floor for downstream
//! numerical stability. Tree induction lives entirely in the forest crate.

mod config;
mod dedup;
mod error;
mod model;

pub use config::SurrogateConfig;
pub use dedup::DedupLogger;
pub use error::SurrogateError;
pub use model::{RandomForestSurrogate, VAR_THRESHOLD};
pub use yarrow_forest::Prediction;
