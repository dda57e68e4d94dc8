//! Regression forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{info, instrument};

use crate::config::RegressionForestConfig;
use crate::data::RegressionData;
use crate::error::ForestError;
use crate::tree::{RegressionTree, TreeParams};

/// A fitted regression forest ensemble.
#[derive(Debug, Clone)]
pub struct RegressionForest {
    pub(crate) trees: Vec<RegressionTree>,
    pub(crate) n_features: usize,
}

/// Resolve the `max_features` flag (0 = all) to a concrete count.
pub(crate) fn resolve_max_features(
    max_features: usize,
    n_features: usize,
) -> Result<usize, ForestError> {
    if max_features > n_features {
        return Err(ForestError::InvalidMaxFeatures {
            max_features,
            n_features,
        });
    }
    Ok(if max_features == 0 {
        n_features
    } else {
        max_features
    })
}

/// Draw the sample indices for one tree.
///
/// With bootstrapping: `draw_count` indices with replacement. Without:
/// either all indices, or a without-replacement subset of `draw_count`.
fn draw_tree_sample(
    n_samples: usize,
    draw_count: usize,
    do_bootstrapping: bool,
    rng: &mut impl Rng,
) -> Vec<usize> {
    if do_bootstrapping {
        (0..draw_count).map(|_| rng.gen_range(0..n_samples)).collect()
    } else if draw_count >= n_samples {
        (0..n_samples).collect()
    } else {
        // Partial Fisher-Yates for a without-replacement subset.
        let mut order: Vec<usize> = (0..n_samples).collect();
        for i in 0..draw_count {
            let j = rng.gen_range(i..n_samples);
            order.swap(i, j);
        }
        order.truncate(draw_count);
        order
    }
}

/// Train the regression forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = data.n_samples()))]
pub(crate) fn train(
    config: &RegressionForestConfig,
    data: &RegressionData,
) -> Result<RegressionForest, ForestError> {
    let n_samples = data.n_samples();
    let n_features = data.n_features();

    // --- Validate config against the data ---
    let max_features_resolved = resolve_max_features(config.max_features, n_features)?;

    if config.min_samples_split < 2 {
        return Err(ForestError::InvalidMinSamplesSplit {
            min_samples_split: config.min_samples_split,
        });
    }
    if config.min_samples_leaf == 0 {
        return Err(ForestError::InvalidMinSamplesLeaf {
            min_samples_leaf: config.min_samples_leaf,
        });
    }
    if let Some(d) = config.max_depth
        && d == 0
    {
        return Err(ForestError::InvalidMaxDepth { max_depth: 0 });
    }

    let draw_count = if config.n_points_per_tree == 0 {
        n_samples
    } else {
        config.n_points_per_tree.min(n_samples)
    };

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features,
        max_features = max_features_resolved,
        draw_count,
        bootstrapping = config.do_bootstrapping,
        "training regression forest"
    );

    // Column-major layout, shared across trees.
    let columns: Vec<Vec<f64>> = (0..n_features)
        .map(|feat_idx| data.rows().iter().map(|row| row[feat_idx]).collect())
        .collect();
    let feature_types = data.feature_types();
    let targets = data.targets();

    let params = TreeParams {
        max_features: max_features_resolved,
        min_samples_split: config.min_samples_split,
        min_samples_leaf: config.min_samples_leaf,
        max_depth: config.max_depth,
        epsilon_purity: config.epsilon_purity,
        max_num_nodes: config.max_num_nodes,
    };

    // Generate per-tree seeds from the master RNG, then train in parallel.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();
    let do_bootstrapping = config.do_bootstrapping;

    let trees: Vec<RegressionTree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sample_indices =
                draw_tree_sample(n_samples, draw_count, do_bootstrapping, &mut rng);
            RegressionTree::grow(
                &columns,
                feature_types,
                targets,
                &sample_indices,
                &params,
                &mut rng,
            )
        })
        .collect();

    info!(n_trees_trained = trees.len(), "regression forest training complete");

    Ok(RegressionForest { trees, n_features })
}
