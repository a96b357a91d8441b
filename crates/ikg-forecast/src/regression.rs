//! Ordinary least squares linear regression (`spec.md` §4.5).

/// A fitted `cost = slope * day + intercept` model.
#[derive(Debug, Clone, Copy)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Standard error of residuals, `df = n - 2`.
    pub std_error: f64,
}

impl LinearModel {
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits an OLS line through `(x[i], y[i])`. Callers guarantee `x.len() ==
/// y.len() >= 2`.
#[must_use]
pub fn fit(x: &[f64], y: &[f64]) -> LinearModel {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        cov += (xi - mean_x) * (yi - mean_y);
        var_x += (xi - mean_x).powi(2);
    }
    let slope = if var_x == 0.0 { 0.0 } else { cov / var_x };
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let predicted = slope * xi + intercept;
        ss_res += (yi - predicted).powi(2);
        ss_tot += (yi - mean_y).powi(2);
    }
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    let df = (x.len() as f64 - 2.0).max(1.0);
    let std_error = (ss_res / df).sqrt();

    LinearModel { slope, intercept, r_squared, std_error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line_with_zero_error() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![10.0, 12.0, 14.0, 16.0];
        let model = fit(&x, &y);
        assert!((model.slope - 2.0).abs() < 1e-9);
        assert!((model.intercept - 10.0).abs() < 1e-9);
        assert!((model.r_squared - 1.0).abs() < 1e-9);
        assert!(model.std_error < 1e-9);
    }

    #[test]
    fn predicts_along_the_fitted_line() {
        let model = fit(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!((model.predict(10.0) - 11.0).abs() < 1e-9);
    }
}
