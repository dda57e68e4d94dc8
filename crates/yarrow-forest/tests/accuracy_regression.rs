//! Accuracy regression tests for yarrow-forest.
//!
//! These tests verify that algorithmic changes do not degrade regression
//! quality on deterministic synthetic datasets.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use yarrow_forest::{FeatureType, RegressionData, RegressionForestConfig};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic regression dataset
// ---------------------------------------------------------------------------

/// Generate a 300-sample, 6-feature regression dataset.
///
/// Features 0-1 are informative (y = 4*x0 - 3*x1 + noise in [0, 0.05]);
/// features 2-5 are pure noise in [0, 1].
fn make_regression() -> RegressionData {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_samples = 300;
    let n_features = 6;

    let mut rows = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>()).collect();
        let y = 4.0 * row[0] - 3.0 * row[1] + rng.r#gen::<f64>() * 0.05;
        rows.push(row);
        targets.push(y);
    }
    RegressionData::new(rows, targets, vec![FeatureType::Continuous; n_features]).unwrap()
}

fn rmse_on_training_data(data: &RegressionData, n_trees: usize) -> f64 {
    let forest = RegressionForestConfig::new(n_trees)
        .unwrap()
        .with_seed(42)
        .fit(data)
        .unwrap();
    let mut sq_err = 0.0;
    for (row, &y) in data.rows().iter().zip(data.targets()) {
        let pred = forest.predict(row).unwrap();
        sq_err += (pred.mean - y) * (pred.mean - y);
    }
    (sq_err / data.n_samples() as f64).sqrt()
}

/// In-sample RMSE with 100 trees must stay well below the target spread
/// (targets span roughly [-3, 4]).
#[test]
fn rmse_below_threshold() {
    let data = make_regression();
    let rmse = rmse_on_training_data(&data, 100);
    assert!(rmse < 0.5, "rmse {rmse} >= 0.5");
}

/// A forest on a dataset with a categorical driver must separate the
/// category means.
#[test]
fn categorical_driver_recovered() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let offsets = [0.0, 10.0, -5.0];
    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for i in 0..150 {
        let cat = i % 3;
        rows.push(vec![cat as f64, rng.r#gen::<f64>()]);
        targets.push(offsets[cat] + rng.r#gen::<f64>() * 0.1);
    }
    let data = RegressionData::new(
        rows,
        targets,
        vec![FeatureType::from_cardinality(3), FeatureType::Continuous],
    )
    .unwrap();

    let forest = RegressionForestConfig::new(50)
        .unwrap()
        .with_seed(7)
        .fit(&data)
        .unwrap();

    for (cat, &offset) in offsets.iter().enumerate() {
        let pred = forest.predict(&[cat as f64, 0.5]).unwrap();
        assert!(
            (pred.mean - offset).abs() < 1.0,
            "category {cat}: predicted {} for offset {offset}",
            pred.mean
        );
    }
}

/// Predictive variance must be larger away from the training range than
/// deep inside a densely sampled, locally flat region.
#[test]
fn variance_reflects_ensemble_disagreement() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    // Step function: flat at 0 on [0, 1), flat at 10 on [2, 3).
    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for _ in 0..100 {
        let x: f64 = rng.r#gen();
        rows.push(vec![x]);
        targets.push(0.0);
        rows.push(vec![x + 2.0]);
        targets.push(10.0);
    }
    let data = RegressionData::new(rows, targets, vec![FeatureType::Continuous]).unwrap();
    let forest = RegressionForestConfig::new(50)
        .unwrap()
        .with_seed(11)
        .fit(&data)
        .unwrap();

    let inside = forest.predict(&[0.5]).unwrap();
    let boundary = forest.predict(&[1.5]).unwrap();
    assert!(
        boundary.variance >= inside.variance,
        "boundary {} < inside {}",
        boundary.variance,
        inside.variance
    );
}
