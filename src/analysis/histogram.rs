use std::f64::consts::PI;

use super::describe::sample_std;
use super::quantile::quantile_sorted;

/// Upper bound on the automatic bin count.
pub const MAX_BINS: usize = 50;

/// Evaluation points for the density curve.
pub const KDE_GRID_SIZE: usize = 100;

/// How many bandwidths the density curve extends past the data.
pub const KDE_CUT: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// `count / (n * width)`, so bar areas sum to 1.
    pub density: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Freedman–Diaconis bin count: width `2 * IQR / n^(1/3)`, falling back to
/// `sqrt(n)` bins when the IQR is zero. Never more than [`MAX_BINS`].
pub fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    let h = 2.0 * iqr / (n as f64).cbrt();
    let bins = if h == 0.0 {
        (n as f64).sqrt() as usize
    } else {
        ((sorted[n - 1] - sorted[0]) / h).ceil() as usize
    };
    bins.clamp(1, MAX_BINS)
}

/// Density-normalised histogram over the finite values.
pub fn histogram(values: &[f64]) -> Vec<Bin> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_unstable_by(f64::total_cmp);

    let n = sorted.len();
    let bins = auto_bin_count(&sorted);
    let (mut lo, mut hi) = (sorted[0], sorted[n - 1]);
    if lo == hi {
        // Half a unit, or enough to move a value of large magnitude.
        let pad = (lo.abs() * 1e-9).max(0.5);
        lo -= pad;
        hi += pad;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &sorted {
        // Last bin is closed on the right.
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
            density: count as f64 / (n as f64 * width),
        })
        .collect()
}

/// Gaussian kernel density estimate using Scott's bandwidth rule.
///
/// Returns `[x, density]` points, or nothing when the spread is zero.
pub fn gaussian_kde(values: &[f64]) -> Vec<[f64; 2]> {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = data.len();
    if n < 2 {
        return Vec::new();
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let std = sample_std(&data, mean);
    let bw = std * (n as f64).powf(-0.2);
    if bw.is_nan() || bw <= 0.0 {
        return Vec::new();
    }

    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let start = min - KDE_CUT * bw;
    let step = (max - min + 2.0 * KDE_CUT * bw) / (KDE_GRID_SIZE - 1) as f64;
    let norm = 1.0 / (n as f64 * bw * (2.0 * PI).sqrt());

    (0..KDE_GRID_SIZE)
        .map(|i| {
            let x = start + i as f64 * step;
            let sum: f64 = data
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                .sum();
            [x, sum * norm]
        })
        .collect()
}
