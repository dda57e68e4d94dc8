//! Random Forest regression: fit a forest on tabular data, predict with
//! mean and variance.
//!
//! Provides a hand-rolled regression Random Forest with RSS (sum of squared
//! residuals) split selection, native categorical splits, bootstrapping,
//! parallel training via rayon, and per-point predictive mean/variance from
//! the spread of the ensemble. Designed as the engine behind a surrogate
//! model in a sequential model-based optimization loop, but usable on its
//! own through [`RegressionForestConfig::fit`].

mod config;
mod data;
mod error;
mod feature;
mod forest;
mod node;
mod predict;
mod split;
mod tree;

pub use config::RegressionForestConfig;
pub use data::RegressionData;
pub use error::ForestError;
pub use feature::FeatureType;
pub use forest::RegressionForest;
pub use node::{FeatureIndex, NodeIndex, RegressionNode, SplitRule};
pub use predict::Prediction;
pub use tree::RegressionTree;
