use super::quantile::quantile_sorted;

// ---------------------------------------------------------------------------
// Descriptive summary (count, mean, std, min, quartiles, max)
// ---------------------------------------------------------------------------

/// Summary statistics for a single numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// `(statistic name, value)` pairs in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }

    /// Every statistic rounded to the nearest integer.
    pub fn rounded(&self) -> Summary {
        Summary {
            count: self.count,
            mean: self.mean.round(),
            std: self.std.round(),
            min: self.min.round(),
            q25: self.q25.round(),
            median: self.median.round(),
            q75: self.q75.round(),
            max: self.max.round(),
        }
    }
}

/// Describe `values`; `None` when there is nothing to describe.
///
/// Non-finite values are ignored, the same way a missing cell would be.
pub fn describe(values: &[f64]) -> Option<Summary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = sample_std(&sorted, mean);

    Some(Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_small_sample() {
        let s = describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - 1.290_994_448_7).abs() < 1e-9);
        assert_eq!((s.min, s.q25, s.median, s.q75, s.max), (1.0, 1.75, 2.5, 3.25, 4.0));
    }

    #[test]
    fn single_value_has_undefined_spread() {
        let s = describe(&[42.0]).unwrap();
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert_eq!(s.median, 42.0);
    }

    #[test]
    fn empty_and_non_finite_only_inputs_have_no_summary() {
        assert!(describe(&[]).is_none());
        assert!(describe(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn rounding_keeps_the_count() {
        let s = describe(&[50_123.4, 61_987.6, 48_000.5]).unwrap().rounded();
        assert_eq!(s.count, 3);
        assert_eq!(s.min, 48_001.0);
        assert_eq!(s.max, 61_988.0);
        assert_eq!(s.rows()[0], ("count", 3.0));
    }
}
