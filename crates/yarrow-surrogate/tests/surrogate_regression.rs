//! End-to-end tests for the random-forest surrogate in an optimization-loop
//! usage pattern: construct once, train repeatedly, predict between rounds.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use yarrow_surrogate::{RandomForestSurrogate, SurrogateConfig, VAR_THRESHOLD};

/// 10 random points in [0, 1]^2 with a smooth quadratic response.
fn make_training_set(seed: u64) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut x = Vec::with_capacity(10);
    let mut y = Vec::with_capacity(10);
    for _ in 0..10 {
        let a: f64 = rng.r#gen();
        let b: f64 = rng.r#gen();
        y.push((a - 0.5) * (a - 0.5) + 0.3 * b);
        x.push(vec![a, b]);
    }
    (x, y)
}

#[test]
fn train_then_predict_returns_scalar_pair() {
    let (x, y) = make_training_set(42);
    let mut surrogate = RandomForestSurrogate::new(&[0, 0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let pred = surrogate.predict(&[0.4, 0.6]).unwrap();
    assert!(pred.mean.is_finite());
    assert!(pred.variance.is_finite());
    assert!(pred.variance >= 0.0);
}

#[test]
fn without_instances_predict_matches_direct_forest_output() {
    let (x, y) = make_training_set(42);
    let mut surrogate = RandomForestSurrogate::new(&[0, 0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let point = [0.3, 0.7];
    let via_adapter = surrogate.predict(&point).unwrap();
    let direct = surrogate.forest().unwrap().predict(&point).unwrap();
    assert_eq!(via_adapter.mean, direct.mean);
    assert_eq!(via_adapter.variance, direct.variance);
}

#[test]
fn instance_marginalization_adds_nonnegative_between_term() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    // 2 configuration dims + 1 instance feature dim.
    let instances = vec![vec![0.0], vec![0.5], vec![1.0]];
    let mut x = Vec::new();
    let mut y = Vec::new();
    for _ in 0..30 {
        let a: f64 = rng.r#gen();
        let b: f64 = rng.r#gen();
        for inst in &instances {
            x.push(vec![a, b, inst[0]]);
            // Instance feature shifts the response, so per-instance means differ.
            y.push(a + 2.0 * inst[0] + rng.r#gen::<f64>() * 0.01);
        }
    }

    let mut surrogate = RandomForestSurrogate::new(
        &[0, 0, 0],
        Some(instances.clone()),
        SurrogateConfig::new(),
    )
    .unwrap();
    surrogate.train(&x, &y).unwrap();

    let point = [0.5, 0.5];
    let marginalized = surrogate.predict(&point).unwrap();

    // Recompute the per-instance estimates through the public forest handle.
    let forest = surrogate.forest().unwrap();
    let mut mean_of_vars = 0.0;
    let mut means = Vec::new();
    for inst in &instances {
        let row: Vec<f64> = point.iter().chain(inst.iter()).copied().collect();
        let p = forest.predict(&row).unwrap();
        mean_of_vars += p.variance;
        means.push(p.mean);
    }
    mean_of_vars /= instances.len() as f64;

    assert!(
        marginalized.variance >= mean_of_vars - 1e-12,
        "marginalized {} < mean of per-instance variances {}",
        marginalized.variance,
        mean_of_vars
    );
    // The instance feature drives the response, so the between term is
    // strictly positive here.
    let spread = means.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        - means.iter().cloned().fold(f64::INFINITY, f64::min);
    assert!(spread > 0.0);
    assert!(marginalized.variance > mean_of_vars);
}

#[test]
fn identical_per_instance_means_collapse_to_mean_of_variances() {
    // Constant targets: every tree predicts the same value for every input,
    // so the per-instance means coincide and the between term vanishes.
    let instances = vec![vec![0.0], vec![1.0]];
    let x: Vec<Vec<f64>> = (0..12)
        .map(|i| vec![i as f64 / 12.0, (i % 2) as f64])
        .collect();
    let y = vec![3.0; 12];

    let mut surrogate =
        RandomForestSurrogate::new(&[0, 0], Some(instances), SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let pred = surrogate.predict(&[0.5]).unwrap();
    assert_eq!(pred.mean, 3.0);
    // Mean of per-instance variances is 0, between term is 0; no floor is
    // applied on the marginalized path.
    assert_eq!(pred.variance, 0.0);
}

#[test]
fn raw_batch_floors_degenerate_variances() {
    // Constant targets force zero predictive variance everywhere.
    let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
    let y = vec![1.0; 10];
    let mut surrogate = RandomForestSurrogate::new(&[0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let queries: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64 + 0.5]).collect();
    let (means, variances) = surrogate.predict_raw_batch(&queries).unwrap();
    assert_eq!(means.len(), 5);
    for (&m, &v) in means.iter().zip(&variances) {
        assert_eq!(m, 1.0);
        assert_eq!(v, VAR_THRESHOLD);
    }
}

#[test]
fn raw_single_floors_degenerate_variance() {
    let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
    let y = vec![1.0; 10];
    let mut surrogate = RandomForestSurrogate::new(&[0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let (mean, variance) = surrogate.predict_raw_single(&[4.5]).unwrap();
    assert_eq!(mean, 1.0);
    assert_eq!(variance, VAR_THRESHOLD);
}

#[test]
fn retraining_replaces_prior_fit() {
    let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
    let low = vec![0.0; 10];
    let high = vec![10.0; 10];

    let mut surrogate = RandomForestSurrogate::new(&[0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &low).unwrap();
    assert_eq!(surrogate.predict(&[3.0]).unwrap().mean, 0.0);

    surrogate.train(&x, &high).unwrap();
    assert_eq!(surrogate.predict(&[3.0]).unwrap().mean, 10.0);
    assert_eq!(surrogate.training_targets(), high.as_slice());
}

#[test]
fn feature_spec_width_mismatch_surfaces_from_train() {
    // 3-entry spec against 2-column data: the engine reports the mismatch.
    let (x, y) = make_training_set(42);
    let mut surrogate =
        RandomForestSurrogate::new(&[0, 0, 0], None, SurrogateConfig::new()).unwrap();
    assert!(surrogate.train(&x, &y).is_err());
}

#[test]
fn categorical_configuration_dimension_supported() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let offsets = [0.0, 5.0];
    let mut x = Vec::new();
    let mut y = Vec::new();
    for i in 0..40 {
        let cat = i % 2;
        x.push(vec![cat as f64, rng.r#gen::<f64>()]);
        y.push(offsets[cat] + rng.r#gen::<f64>() * 0.05);
    }

    let mut surrogate = RandomForestSurrogate::new(&[2, 0], None, SurrogateConfig::new()).unwrap();
    surrogate.train(&x, &y).unwrap();

    let low = surrogate.predict(&[0.0, 0.5]).unwrap();
    let high = surrogate.predict(&[1.0, 0.5]).unwrap();
    assert!((low.mean - 0.0).abs() < 1.0, "low.mean = {}", low.mean);
    assert!((high.mean - 5.0).abs() < 1.0, "high.mean = {}", high.mean);
}

/// Scenario from the adapter's contract: D=2 continuous spec, feature ratio
/// 5/6 (resolving to a single feature per split), 10 training points, and an
/// in-range query returning a finite mean with a floored variance.
#[test]
fn two_dim_scenario_with_single_feature_splits() {
    let (x, y) = make_training_set(123);
    let mut surrogate = RandomForestSurrogate::new(&[0, 0], None, SurrogateConfig::new()).unwrap();
    assert_eq!(surrogate.max_features(), 1);

    surrogate.train(&x, &y).unwrap();
    let (mean, variance) = surrogate.predict_raw_single(&[0.5, 0.5]).unwrap();
    assert!(mean.is_finite());
    assert!(variance >= VAR_THRESHOLD);
}
