//! Inverse-MAPE weighted ensemble across component forecasts (`spec.md`
//! §4.5 step 4).

/// Weight of each component is `(1/MAPE_i) / sum(1/MAPE_j)`. A component
/// with `MAPE == 0` is treated as a perfect fit and takes the entire
/// weight; components with non-finite MAPE get zero weight.
#[must_use]
pub fn weights(component_mapes: &[f64]) -> Vec<f64> {
    if let Some(perfect) = component_mapes.iter().position(|&m| m == 0.0) {
        return component_mapes.iter().enumerate().map(|(i, _)| if i == perfect { 1.0 } else { 0.0 }).collect();
    }

    let inverses: Vec<f64> = component_mapes.iter().map(|&m| if m.is_finite() && m > 0.0 { 1.0 / m } else { 0.0 }).collect();
    let total: f64 = inverses.iter().sum();
    if total == 0.0 {
        let n = component_mapes.len() as f64;
        return vec![1.0 / n; component_mapes.len()];
    }
    inverses.iter().map(|w| w / total).collect()
}

/// Weighted sum of component forecasts at each horizon step.
#[must_use]
pub fn weighted_forecast(component_forecasts: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
    let horizon = component_forecasts.first().map_or(0, Vec::len);
    let mut combined = vec![0.0; horizon];
    for (forecast, &weight) in component_forecasts.iter().zip(weights) {
        for (slot, value) in combined.iter_mut().zip(forecast) {
            *slot += weight * value;
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_favor_the_lower_mape_component() {
        let w = weights(&[10.0, 20.0]);
        assert!(w[0] > w[1]);
        assert!((w[0] + w[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perfect_component_takes_all_weight() {
        let w = weights(&[0.0, 15.0]);
        assert_eq!(w, vec![1.0, 0.0]);
    }

    #[test]
    fn weighted_forecast_combines_components() {
        let combined = weighted_forecast(&[vec![10.0, 10.0], vec![20.0, 20.0]], &[0.75, 0.25]);
        assert_eq!(combined, vec![12.5, 12.5]);
    }
}
