//! RSS split finding for regression trees.

use rand::Rng;

use crate::feature::FeatureType;
use crate::node::{FeatureIndex, SplitRule};

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitCandidate {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Routing rule.
    pub(crate) rule: SplitRule,
    /// Decrease in residual sum of squares from this split.
    pub(crate) rss_decrease: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Running sums for incremental RSS computation over a set of targets.
#[derive(Debug, Clone, Copy, Default)]
struct TargetSums {
    n: usize,
    sum: f64,
    sum_sq: f64,
}

impl TargetSums {
    fn add(&mut self, y: f64) {
        self.n += 1;
        self.sum += y;
        self.sum_sq += y * y;
    }

    fn remove(&mut self, y: f64) {
        self.n -= 1;
        self.sum -= y;
        self.sum_sq -= y * y;
    }

    fn merge(&mut self, other: TargetSums) {
        self.n += other.n;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }

    /// Residual sum of squares around the mean: `Σy² - (Σy)²/n`.
    fn rss(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.n as f64).max(0.0)
    }
}

/// Find the best RSS-reducing split among a random subset of features.
///
/// For each of `max_features` randomly chosen features:
/// - continuous columns are sorted and scanned left-to-right with
///   incremental target sums, considering midpoint thresholds between
///   distinct adjacent values;
/// - categorical columns are reduced to per-category target sums, the
///   categories sorted by mean target, and the sorted prefix scanned (the
///   optimal binary partition under squared loss).
///
/// Returns `None` when no valid split exists (all values identical, or
/// every boundary would violate `min_samples_leaf`).
///
/// # Column-major layout
///
/// `columns` is column-major: `columns[feature_idx][sample_idx]`.
/// `sample_indices` index into the inner Vecs.
pub(crate) fn find_best_split(
    columns: &[Vec<f64>],
    feature_types: &[FeatureType],
    targets: &[f64],
    sample_indices: &[usize],
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitCandidate> {
    let n_features = columns.len();
    let n_samples = sample_indices.len();

    if n_samples < 2 || n_features == 0 {
        return None;
    }

    let mut parent = TargetSums::default();
    for &si in sample_indices {
        parent.add(targets[si]);
    }
    let parent_rss = parent.rss();

    // Partial Fisher-Yates: shuffle only the first `max_features` positions.
    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let take = max_features.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        feature_order.swap(i, j);
    }
    let selected_features = &feature_order[..take];

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, SplitRule)> = None;

    for &feat_idx in selected_features {
        let candidate = match feature_types[feat_idx] {
            FeatureType::Continuous => best_threshold(
                &columns[feat_idx],
                targets,
                sample_indices,
                parent,
                parent_rss,
                min_samples_leaf,
            ),
            FeatureType::Categorical { n_categories } => best_category_set(
                &columns[feat_idx],
                targets,
                sample_indices,
                n_categories,
                parent,
                parent_rss,
                min_samples_leaf,
            ),
        };
        if let Some((rule, decrease)) = candidate
            && decrease > best_decrease
        {
            best_decrease = decrease;
            best = Some((FeatureIndex::new(feat_idx), rule));
        }
    }

    let (feature, rule) = best?;

    // Partition sample_indices into left/right.
    let col = &columns[feature.index()];
    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for &si in sample_indices {
        if rule.goes_left(col[si]) {
            left_indices.push(si);
        } else {
            right_indices.push(si);
        }
    }

    Some(SplitCandidate {
        feature,
        rule,
        rss_decrease: best_decrease,
        left_indices,
        right_indices,
    })
}

/// Best threshold split on a continuous column, as (rule, RSS decrease).
fn best_threshold(
    col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    parent: TargetSums,
    parent_rss: f64,
    min_samples_leaf: usize,
) -> Option<(SplitRule, f64)> {
    let n_samples = sample_indices.len();

    let mut sorted: Vec<(f64, usize)> = sample_indices.iter().map(|&si| (col[si], si)).collect();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

    // Incremental scan: left grows from empty, right shrinks from full.
    let mut left = TargetSums::default();
    let mut right = parent;

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best_threshold = None;

    for i in 0..(n_samples - 1) {
        let (val_i, si) = sorted[i];
        let y = targets[si];
        left.add(y);
        right.remove(y);

        // Skip if next value is identical (no valid boundary here).
        let val_next = sorted[i + 1].0;
        if val_i == val_next {
            continue;
        }

        if left.n < min_samples_leaf || right.n < min_samples_leaf {
            continue;
        }

        let decrease = parent_rss - left.rss() - right.rss();
        if decrease > best_decrease {
            best_decrease = decrease;
            best_threshold = Some((val_i + val_next) / 2.0);
        }
    }

    best_threshold.map(|t| (SplitRule::Threshold(t), best_decrease))
}

/// Best category-subset split on a categorical column, as
/// (rule, RSS decrease).
///
/// Categories are ordered by mean target; under squared loss the optimal
/// binary partition is then a prefix of that ordering, so a single scan
/// suffices.
fn best_category_set(
    col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    n_categories: usize,
    parent: TargetSums,
    parent_rss: f64,
    min_samples_leaf: usize,
) -> Option<(SplitRule, f64)> {
    let mut per_category = vec![TargetSums::default(); n_categories];
    for &si in sample_indices {
        per_category[col[si] as usize].add(targets[si]);
    }

    let mut present: Vec<u32> = (0..n_categories as u32)
        .filter(|&c| per_category[c as usize].n > 0)
        .collect();
    if present.len() < 2 {
        return None;
    }
    present.sort_unstable_by(|&a, &b| {
        let mean_a = per_category[a as usize].sum / per_category[a as usize].n as f64;
        let mean_b = per_category[b as usize].sum / per_category[b as usize].n as f64;
        mean_a.total_cmp(&mean_b)
    });

    let mut left = TargetSums::default();
    let mut right = parent;

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best_prefix_len = None;

    for (prefix_len, &cat) in present.iter().enumerate().take(present.len() - 1) {
        let sums = per_category[cat as usize];
        left.merge(sums);
        right.n -= sums.n;
        right.sum -= sums.sum;
        right.sum_sq -= sums.sum_sq;

        if left.n < min_samples_leaf || right.n < min_samples_leaf {
            continue;
        }

        let decrease = parent_rss - left.rss() - right.rss();
        if decrease > best_decrease {
            best_decrease = decrease;
            best_prefix_len = Some(prefix_len + 1);
        }
    }

    best_prefix_len.map(|len| {
        let mut left_set: Vec<u32> = present[..len].to_vec();
        left_set.sort_unstable();
        (SplitRule::Categories(left_set), best_decrease)
    })
}
