/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a line through `points`.
///
/// Returns `None` for fewer than two points or when every `x` is equal.
pub fn fit_line(points: &[[f64; 2]]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / nf;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p[0] - mean_x;
        let dy = p[1] - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let points: Vec<[f64; 2]> = (0..10).map(|i| [f64::from(i), 3.0 + 2.0 * f64::from(i)]).collect();
        let fit = fit_line(&points).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.predict(5.0), fit.intercept + fit.slope * 5.0);
    }

    #[test]
    fn noisy_points_have_partial_fit() {
        let points = [[0.0, 0.0], [1.0, 2.0], [2.0, 1.0], [3.0, 3.0]];
        let fit = fit_line(&points).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-12);
        assert!((fit.intercept - 0.3).abs() < 1e-12);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        assert!(fit_line(&[[1.0, 1.0]]).is_none());
        assert!(fit_line(&[[1.0, 1.0], [1.0, 5.0]]).is_none());
    }
}
