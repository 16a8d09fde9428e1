use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Labels, policies and errors
// ---------------------------------------------------------------------------

/// 1-based quantile label (`1..=k`).
pub type QuartileLabel = u32;

/// Default number of groups: quartiles.
pub const DEFAULT_QUANTILES: usize = 4;

/// What to do when quantile boundaries collapse and leave bins empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`ClassifyError::DuplicateBoundary`].
    #[default]
    Raise,
    /// Collapse empty bins; the result reports a reduced `effective_k`.
    Merge,
    /// Leave rows sitting on a collapsed boundary out of the result.
    Drop,
}

impl DuplicatePolicy {
    pub const ALL: [DuplicatePolicy; 3] = [
        DuplicatePolicy::Raise,
        DuplicatePolicy::Merge,
        DuplicatePolicy::Drop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DuplicatePolicy::Raise => "raise",
            DuplicatePolicy::Merge => "merge",
            DuplicatePolicy::Drop => "drop",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown duplicate policy '{0}' (expected raise, merge or drop)")]
pub struct UnknownPolicy(pub String);

impl FromStr for DuplicatePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(DuplicatePolicy::Raise),
            "merge" => Ok(DuplicatePolicy::Merge),
            "drop" => Ok(DuplicatePolicy::Drop),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("cannot classify an empty set of values")]
    EmptyInput,

    #[error("invalid quantile count {k}: must be between 1 and {n} (the number of values)")]
    InvalidK { k: usize, n: usize },

    #[error(
        "quantile boundary {boundary} is not unique: {affected_rows} rows share that value, \
         leaving at least one bin empty"
    )]
    DuplicateBoundary { boundary: f64, affected_rows: usize },

    #[error("value at position {position} is not a finite number")]
    NonFinite { position: usize },
}

// ---------------------------------------------------------------------------
// Classification result
// ---------------------------------------------------------------------------

/// Output of [`classify`].
///
/// `labels[i]` belongs to the input value at `positions[i]`. Positions are in
/// ascending (original) order; under [`DuplicatePolicy::Drop`] they skip the
/// entries listed in `dropped`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub labels: Vec<QuartileLabel>,
    pub positions: Vec<usize>,
    pub requested_k: usize,
    /// Size of the label range; below `requested_k` only after a merge.
    pub effective_k: usize,
    /// The `k + 1` edges `q(0), q(1/k), …, q(1)` of the final partition.
    pub edges: Vec<f64>,
    pub dropped: Vec<usize>,
    pub policy: DuplicatePolicy,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(original position, label)` pairs in original order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, QuartileLabel)> + '_ {
        self.positions.iter().copied().zip(self.labels.iter().copied())
    }

    /// Number of rows per label; index 0 holds label 1.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.effective_k];
        for &label in &self.labels {
            counts[label as usize - 1] += 1;
        }
        counts
    }

    /// Distinct labels present, ascending.
    pub fn label_range(&self) -> std::ops::RangeInclusive<QuartileLabel> {
        1..=self.effective_k as QuartileLabel
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Assign every value a 1-based quantile label.
///
/// Bin edges are `q(i/k)` for `i in 0..=k`, estimated by linear interpolation
/// between order statistics. A value `v` lands in bin
/// `1 + #{interior edges e : v > e}`, i.e. bins are right-closed.
///
/// With at least `k` distinct values every input gets a label in `1..=k`
/// whatever the policy. A run of ties that straddles an edge can still leave
/// a bin empty there, and the label range keeps the gap. With fewer than `k`
/// distinct values some boundaries necessarily collapse and `policy` decides.
pub fn classify(
    values: &[f64],
    k: usize,
    policy: DuplicatePolicy,
) -> Result<Classification, ClassifyError> {
    validate(values, k)?;
    let mut partition = Partition::compute(values, k);
    let all: Vec<usize> = (0..values.len()).collect();

    if distinct_count(values) >= k {
        return Ok(partition.into_classification(all, Vec::new(), policy));
    }

    match policy {
        DuplicatePolicy::Raise => Err(partition.duplicate_error(values)),
        DuplicatePolicy::Merge => {
            partition.merge_empty_bins();
            Ok(partition.into_classification(all, Vec::new(), policy))
        }
        DuplicatePolicy::Drop => {
            let boundaries = partition.collapsed_boundaries();
            let (dropped, kept): (Vec<usize>, Vec<usize>) =
                all.into_iter().partition(|&i| boundaries.contains(&values[i]));
            if kept.is_empty() {
                return Err(partition.duplicate_error(values));
            }
            Ok(partition.into_classification(kept, dropped, policy))
        }
    }
}

fn validate(values: &[f64], k: usize) -> Result<(), ClassifyError> {
    if values.is_empty() {
        return Err(ClassifyError::EmptyInput);
    }
    if k < 1 || k > values.len() {
        return Err(ClassifyError::InvalidK { k, n: values.len() });
    }
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(ClassifyError::NonFinite { position });
    }
    Ok(())
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

// ---------------------------------------------------------------------------
// Partition internals
// ---------------------------------------------------------------------------

struct Partition {
    edges: Vec<f64>,
    /// 1-based bin per input value, in input order.
    bins: Vec<usize>,
    /// Rows per bin; index 0 is bin 1.
    counts: Vec<usize>,
}

impl Partition {
    fn compute(values: &[f64], k: usize) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let n = sorted.len();
        let edges: Vec<f64> = (0..=k)
            .map(|i| {
                // (i * (n - 1)) / k as one division keeps exact positions exact.
                let position = (i * (n - 1)) as f64 / k as f64;
                interpolate_sorted(&sorted, position)
            })
            .collect();

        let interior = &edges[1..k];
        let bins: Vec<usize> = values
            .iter()
            .map(|&v| 1 + interior.iter().filter(|&&e| v > e).count())
            .collect();

        let mut counts = vec![0; k];
        for &b in &bins {
            counts[b - 1] += 1;
        }

        Partition { edges, bins, counts }
    }

    fn empty_bins(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(|(i, _)| i + 1)
    }

    /// Lower edges of the empty bins: the values whose ties swallowed them.
    fn collapsed_boundaries(&self) -> Vec<f64> {
        self.empty_bins().map(|j| self.edges[j - 1]).collect()
    }

    /// The first empty bin, reported through the boundary that swallowed it.
    /// Fewer distinct values than bins always leaves one empty.
    fn duplicate_error(&self, values: &[f64]) -> ClassifyError {
        let bin = self.empty_bins().next().unwrap_or(1);
        let boundary = self.edges[bin - 1];
        let affected_rows = values.iter().filter(|&&v| v == boundary).count();
        ClassifyError::DuplicateBoundary {
            boundary,
            affected_rows,
        }
    }

    /// Dense re-rank of the occupied bins.
    fn merge_empty_bins(&mut self) {
        let mut remap = vec![0; self.counts.len()];
        let mut next = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > 0 {
                next += 1;
                remap[i] = next;
            }
        }
        for b in &mut self.bins {
            *b = remap[*b - 1];
        }
        self.counts.retain(|&c| c > 0);
    }

    fn into_classification(
        self,
        positions: Vec<usize>,
        dropped: Vec<usize>,
        policy: DuplicatePolicy,
    ) -> Classification {
        Classification {
            labels: positions.iter().map(|&p| self.bins[p] as QuartileLabel).collect(),
            positions,
            requested_k: self.edges.len() - 1,
            effective_k: self.counts.len(),
            edges: self.edges,
            dropped,
            policy,
        }
    }
}

/// Linear interpolation between order statistics at fractional `position`
/// (`0.0..=(n-1)`). `sorted` must be non-empty and ascending.
pub(crate) fn interpolate_sorted(sorted: &[f64], position: f64) -> f64 {
    let max_index = sorted.len() - 1;
    let lower = (position.floor() as usize).min(max_index);
    if lower == max_index {
        return sorted[max_index];
    }
    let frac = position - lower as f64;
    let (a, b) = (sorted[lower], sorted[lower + 1]);
    if frac == 0.0 || a == b {
        return a;
    }
    // Between neighbours one ulp apart the sum can round up to `b`; any edge
    // in `[a, b)` splits the data the same way, so fall back to `a`.
    let edge = a + (b - a) * frac;
    if edge < b { edge } else { a }
}

/// Quantile `p` (`0.0..=1.0`) of an ascending, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    interpolate_sorted(sorted, p * (sorted.len() - 1) as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
