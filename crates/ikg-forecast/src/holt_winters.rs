//! Holt-Winters additive seasonal model, period `m` (`spec.md` §4.5).
//!
//! Refuses to fit (returns `None`) when the series holds a non-finite
//! value, when `m < 2`, or when `n < 2m` (testable property #10).

const COARSE_GRID: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];
const FINE_STEP: f64 = 0.05;
const FINE_RADIUS: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct HoltWintersModel {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub level: f64,
    pub trend: f64,
    pub seasonal: Vec<f64>,
    pub period: usize,
    pub n: usize,
    pub rmse: f64,
}

impl HoltWintersModel {
    #[must_use]
    pub fn predict(&self, h: usize) -> f64 {
        let seasonal_idx = (self.n + h - 1) % self.period;
        self.level + h as f64 * self.trend + self.seasonal[seasonal_idx]
    }
}

struct Fit {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    sse: f64,
}

fn run(y: &[f64], m: usize, alpha: f64, beta: f64, gamma: f64) -> Fit {
    let first_period_mean = y[0..m].iter().sum::<f64>() / m as f64;
    let second_period_mean = y[m..2 * m].iter().sum::<f64>() / m as f64;

    let mut level = first_period_mean;
    let mut trend = (second_period_mean - first_period_mean) / m as f64;
    let mut seasonal: Vec<f64> = y[0..m].iter().map(|yi| yi - first_period_mean).collect();
    let mut sse = 0.0;

    for (t, &actual) in y.iter().enumerate().skip(m) {
        let idx = t % m;
        let prev_seasonal = seasonal[idx];
        let forecast = level + trend + prev_seasonal;
        sse += (actual - forecast).powi(2);

        let new_level = alpha * (actual - prev_seasonal) + (1.0 - alpha) * (level + trend);
        let new_trend = beta * (new_level - level) + (1.0 - beta) * trend;
        let new_seasonal = gamma * (actual - new_level) + (1.0 - gamma) * prev_seasonal;

        level = new_level;
        trend = new_trend;
        seasonal[idx] = new_seasonal;
    }

    Fit { level, trend, seasonal, sse }
}

fn search_grid(y: &[f64], m: usize, grid: &[f64]) -> (f64, f64, f64, Fit) {
    let mut best_alpha = grid[0];
    let mut best_beta = grid[0];
    let mut best_gamma = grid[0];
    let mut best = run(y, m, best_alpha, best_beta, best_gamma);

    for &alpha in grid {
        for &beta in grid {
            for &gamma in grid {
                let candidate = run(y, m, alpha, beta, gamma);
                if candidate.sse < best.sse {
                    best_alpha = alpha;
                    best_beta = beta;
                    best_gamma = gamma;
                    best = candidate;
                }
            }
        }
    }
    (best_alpha, best_beta, best_gamma, best)
}

fn fine_grid_around(center: f64) -> Vec<f64> {
    let low = (center - FINE_RADIUS).max(0.01);
    let high = (center + FINE_RADIUS).min(0.99);
    let mut values = Vec::new();
    let mut v = low;
    while v <= high + 1e-9 {
        values.push(v);
        v += FINE_STEP;
    }
    values
}

/// Callers guarantee `y.len() == n`; this validates the refusal
/// conditions internally so it is safe to call directly off raw series
/// input.
#[must_use]
pub fn fit(y: &[f64], m: usize) -> Option<HoltWintersModel> {
    if m < 2 || y.iter().any(|v| !v.is_finite()) || y.len() < 2 * m {
        return None;
    }

    let (coarse_alpha, coarse_beta, coarse_gamma, _) = search_grid(y, m, &COARSE_GRID);

    let alpha_grid = fine_grid_around(coarse_alpha);
    let beta_grid = fine_grid_around(coarse_beta);
    let gamma_grid = fine_grid_around(coarse_gamma);

    let mut best_alpha = coarse_alpha;
    let mut best_beta = coarse_beta;
    let mut best_gamma = coarse_gamma;
    let mut best = run(y, m, best_alpha, best_beta, best_gamma);

    for &alpha in &alpha_grid {
        for &beta in &beta_grid {
            for &gamma in &gamma_grid {
                let candidate = run(y, m, alpha, beta, gamma);
                if candidate.sse < best.sse {
                    best_alpha = alpha;
                    best_beta = beta;
                    best_gamma = gamma;
                    best = candidate;
                }
            }
        }
    }

    let fitted_points = (y.len() - m) as f64;
    let rmse = (best.sse / fitted_points.max(1.0)).sqrt();

    Some(HoltWintersModel {
        alpha: best_alpha,
        beta: best_beta,
        gamma: best_gamma,
        level: best.level,
        trend: best.trend,
        seasonal: best.seasonal,
        period: m,
        n: y.len(),
        rmse,
    })
}
