//! Holdout model selection and forecast assembly (`spec.md` §4.5).

use std::collections::BTreeMap;

use ikg_core::{Node, NodeFilter, Provider, ResourceType, SnapshotQuery, Storage};

use crate::error::Result;
use crate::series::{build_series, costs, day_offsets, TimeSeriesPoint};
use crate::{ensemble, ewma, holt, holt_winters, mape, regression};

const SEASONAL_PERIOD: usize = 7;
const HOLT_MIN_TRAIN: usize = 3;
const HW_MIN_TRAIN: usize = 2 * SEASONAL_PERIOD;

/// `spec.md` §4.5 forecast options, defaults matching the spec exactly.
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    pub forecast_days: u32,
    pub confidence_level: f64,
    pub provider: Option<Provider>,
    pub resource_type: Option<ResourceType>,
    pub min_data_points: usize,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self { forecast_days: 90, confidence_level: 0.95, provider: None, resource_type: None, min_data_points: 3 }
    }
}

fn z_score(confidence_level: f64) -> f64 {
    if (confidence_level - 0.90).abs() < 1e-9 {
        1.645
    } else if (confidence_level - 0.95).abs() < 1e-9 {
        1.96
    } else if (confidence_level - 0.99).abs() < 1e-9 {
        2.576
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    LinearRegression,
    Ewma,
    HoltLinear,
    HoltWinters,
    Ensemble,
}

#[derive(Debug, Clone, Copy)]
pub struct ForecastPoint {
    pub day: u32,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SeasonalityReport {
    pub detected: bool,
    pub day_of_week_averages: [f64; 7],
    pub peak_day_of_week: u8,
    pub variation_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendCategory {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastSummary {
    pub current_cost: f64,
    pub monthly_rate: f64,
    pub trend: Option<TrendCategory>,
    pub by_provider: BTreeMap<String, f64>,
    pub by_resource_type: BTreeMap<String, f64>,
    pub top_cost_drivers: Vec<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct ForecastResult {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
    pub holdout_mape: f64,
    pub seasonality: Option<SeasonalityReport>,
    pub summary: ForecastSummary,
}

#[derive(Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Pure forecast over an already-built series; no graph access.
    #[must_use]
    pub fn forecast(&self, points: &[TimeSeriesPoint], options: &ForecastOptions) -> ForecastResult {
        let x = day_offsets(points);
        let y = costs(points);

        if y.len() < options.min_data_points {
            return below_threshold(&y, options);
        }

        let (method, holdout_mape) = select_method(&x, &y);
        let generated_points = generate_points(&x, &y, method, options);
        let seasonality = seasonality_report(&y);
        let summary = base_summary(&y, options.forecast_days);

        ForecastResult { method, points: generated_points, holdout_mape, seasonality, summary }
    }

    /// Reads snapshots and current node state from `storage` to produce a
    /// forecast whose summary is enriched with per-provider,
    /// per-resource-type, and top-cost-driver breakdowns (`spec.md` §4.5).
    pub async fn forecast_for_graph(
        &self,
        storage: &dyn Storage,
        snapshot_query: SnapshotQuery,
        node_filter: Option<&NodeFilter>,
        options: &ForecastOptions,
    ) -> Result<ForecastResult> {
        let snapshots = storage.list_snapshots(snapshot_query).await?;
        let series = build_series(snapshots, options.provider);
        let mut result = self.forecast(&series, options);

        let default_filter = NodeFilter::new();
        let filter = node_filter.unwrap_or(&default_filter);
        let nodes = storage.query_nodes(filter).await?;
        enrich_with_graph_state(&mut result.summary, &nodes);

        tracing::debug!(method = ?result.method, holdout_mape = result.holdout_mape, "forecast computed");
        Ok(result)
    }
}

fn below_threshold(y: &[f64], options: &ForecastOptions) -> ForecastResult {
    let last = y.last().copied().unwrap_or(0.0);
    let points = (1..=options.forecast_days)
        .map(|day| ForecastPoint { day, predicted: last, lower_bound: last.max(0.0), upper_bound: last, confidence: 0.0 })
        .collect();
    ForecastResult {
        method: ForecastMethod::LinearRegression,
        points,
        holdout_mape: f64::INFINITY,
        seasonality: None,
        summary: base_summary(y, options.forecast_days),
    }
}

struct Candidate {
    method: ForecastMethod,
    test_forecast: Vec<f64>,
    test_mape: f64,
}

fn select_method(x: &[f64], y: &[f64]) -> (ForecastMethod, f64) {
    let test_len = y.len() / 5;
    if test_len == 0 {
        return (ForecastMethod::LinearRegression, f64::INFINITY);
    }
    let train_len = y.len() - test_len;
    let (train_x, test_x) = x.split_at(train_len);
    let (train_y, test_y) = y.split_at(train_len);

    let mut candidates = Vec::new();

    let lr = regression::fit(train_x, train_y);
    let lr_forecast: Vec<f64> = test_x.iter().map(|&xi| lr.predict(xi)).collect();
    candidates.push(Candidate { method: ForecastMethod::LinearRegression, test_mape: mape::mape(test_y, &lr_forecast), test_forecast: lr_forecast });

    let ewma_model = ewma::fit(train_y);
    let ewma_forecast: Vec<f64> = (1..=test_len).map(|h| ewma_model.predict(h)).collect();
    candidates.push(Candidate { method: ForecastMethod::Ewma, test_mape: mape::mape(test_y, &ewma_forecast), test_forecast: ewma_forecast });

    if train_len >= HOLT_MIN_TRAIN {
        let holt_model = holt::fit(train_y);
        let holt_forecast: Vec<f64> = (1..=test_len).map(|h| holt_model.predict(h)).collect();
        candidates.push(Candidate { method: ForecastMethod::HoltLinear, test_mape: mape::mape(test_y, &holt_forecast), test_forecast: holt_forecast });
    }

    if train_len >= HW_MIN_TRAIN {
        if let Some(hw_model) = holt_winters::fit(train_y, SEASONAL_PERIOD) {
            let hw_forecast: Vec<f64> = (1..=test_len).map(|h| hw_model.predict(h)).collect();
            candidates.push(Candidate { method: ForecastMethod::HoltWinters, test_mape: mape::mape(test_y, &hw_forecast), test_forecast: hw_forecast });
        }
    }

    let component_mapes: Vec<f64> = candidates.iter().map(|c| c.test_mape).collect();
    let ensemble_weights = ensemble::weights(&component_mapes);
    let component_forecasts: Vec<Vec<f64>> = candidates.iter().map(|c| c.test_forecast.clone()).collect();
    let ensemble_forecast = ensemble::weighted_forecast(&component_forecasts, &ensemble_weights);
    let ensemble_mape = mape::mape(test_y, &ensemble_forecast);

    let mut best_method = ForecastMethod::Ensemble;
    let mut best_mape = ensemble_mape;
    for candidate in &candidates {
        if candidate.test_mape < best_mape {
            best_mape = candidate.test_mape;
            best_method = candidate.method;
        }
    }

    (best_method, best_mape)
}

fn generate_points(x: &[f64], y: &[f64], method: ForecastMethod, options: &ForecastOptions) -> Vec<ForecastPoint> {
    let n = y.len() as f64;
    let z = z_score(options.confidence_level);
    let horizon = options.forecast_days as usize;
    let last_x = x.last().copied().unwrap_or(0.0);

    match method {
        ForecastMethod::Ensemble => {
            let lr = regression::fit(x, y);
            let ewma_model = ewma::fit(y);
            let holt_model = (y.len() >= HOLT_MIN_TRAIN).then(|| holt::fit(y));
            let hw_model = (y.len() >= HW_MIN_TRAIN).then(|| holt_winters::fit(y, SEASONAL_PERIOD)).flatten();

            let train_len = (y.len() * 4 / 5).max(1);
            let test_len = y.len() - train_len;
            let component_mapes = if test_len == 0 {
                vec![1.0]
            } else {
                let (train_x, test_x) = x.split_at(train_len);
                let (train_y, test_y) = y.split_at(train_len);
                let lr_holdout = regression::fit(train_x, train_y);
                let lr_test: Vec<f64> = test_x.iter().map(|&xi| lr_holdout.predict(xi)).collect();
                let mut mapes = vec![mape::mape(test_y, &lr_test)];

                let ewma_holdout = ewma::fit(train_y);
                let ewma_test: Vec<f64> = (1..=test_len).map(|h| ewma_holdout.predict(h)).collect();
                mapes.push(mape::mape(test_y, &ewma_test));

                if holt_model.is_some() && train_len >= HOLT_MIN_TRAIN {
                    let holt_holdout = holt::fit(train_y);
                    let holt_test: Vec<f64> = (1..=test_len).map(|h| holt_holdout.predict(h)).collect();
                    mapes.push(mape::mape(test_y, &holt_test));
                }
                if hw_model.is_some() && train_len >= HW_MIN_TRAIN {
                    if let Some(hw_holdout) = holt_winters::fit(train_y, SEASONAL_PERIOD) {
                        let hw_test: Vec<f64> = (1..=test_len).map(|h| hw_holdout.predict(h)).collect();
                        mapes.push(mape::mape(test_y, &hw_test));
                    }
                }
                mapes
            };
            let weights = ensemble::weights(&component_mapes);

            let sigmas: Vec<f64> = {
                let mut s = vec![lr.std_error];
                s.push(ewma_model.sigma);
                if let Some(h) = &holt_model {
                    s.push(h.rmse);
                }
                if let Some(hw) = &hw_model {
                    s.push(hw.rmse);
                }
                s
            };
            let weighted_sigma: f64 = weights.iter().zip(&sigmas).map(|(w, s)| w * s).sum();

            (1..=horizon)
                .map(|h| {
                    let mut components = vec![lr.predict(last_x + h as f64), ewma_model.predict(h)];
                    if let Some(m) = &holt_model {
                        components.push(m.predict(h));
                    }
                    if let Some(m) = &hw_model {
                        components.push(m.predict(h));
                    }
                    let predicted: f64 = weights.iter().zip(&components).map(|(w, v)| w * v).sum();
                    let spread = z * weighted_sigma * (1.0 + h as f64 / n).sqrt();
                    let confidence = linear_decay(h, horizon);
                    ForecastPoint {
                        day: h as u32,
                        predicted,
                        lower_bound: (predicted - spread).max(0.0),
                        upper_bound: predicted + spread,
                        confidence,
                    }
                })
                .collect()
        }
        ForecastMethod::LinearRegression => {
            let model = regression::fit(x, y);
            (1..=horizon)
                .map(|h| {
                    let target_x = last_x + h as f64;
                    let predicted = model.predict(target_x);
                    let spread = z * model.std_error * (1.0 + h as f64 / n).sqrt();
                    ForecastPoint {
                        day: h as u32,
                        predicted,
                        lower_bound: (predicted - spread).max(0.0),
                        upper_bound: predicted + spread,
                        confidence: 1.0,
                    }
                })
                .collect()
        }
        ForecastMethod::Ewma => {
            let model = ewma::fit(y);
            (1..=horizon)
                .map(|h| {
                    let predicted = model.predict(h);
                    let spread = z * model.interval_sigma(h);
                    ForecastPoint {
                        day: h as u32,
                        predicted,
                        lower_bound: (predicted - spread).max(0.0),
                        upper_bound: predicted + spread,
                        confidence: linear_decay(h, horizon),
                    }
                })
                .collect()
        }
        ForecastMethod::HoltLinear => {
            let model = holt::fit(y);
            (1..=horizon)
                .map(|h| {
                    let predicted = model.predict(h);
                    let spread = z * model.rmse * (1.0 + h as f64 / n).sqrt();
                    ForecastPoint {
                        day: h as u32,
                        predicted,
                        lower_bound: (predicted - spread).max(0.0),
                        upper_bound: predicted + spread,
                        confidence: linear_decay(h, horizon),
                    }
                })
                .collect()
        }
        ForecastMethod::HoltWinters => {
            let model = holt_winters::fit(y, SEASONAL_PERIOD).expect("selected after a successful fit");
            (1..=horizon)
                .map(|h| {
                    let predicted = model.predict(h);
                    let spread = z * model.rmse * (1.0 + h as f64 / n).sqrt();
                    ForecastPoint {
                        day: h as u32,
                        predicted,
                        lower_bound: (predicted - spread).max(0.0),
                        upper_bound: predicted + spread,
                        confidence: linear_decay(h, horizon),
                    }
                })
                .collect()
        }
    }
}

/// Confidence decays linearly from `1.0` at `h=1` to `0.5` at `h=horizon`
/// for the non-linear-regression methods (`spec.md` §4.5).
fn linear_decay(h: usize, horizon: usize) -> f64 {
    if horizon <= 1 {
        return 1.0;
    }
    let fraction = (h - 1) as f64 / (horizon - 1) as f64;
    1.0 - fraction * 0.5
}

fn seasonality_report(y: &[f64]) -> Option<SeasonalityReport> {
    if y.len() < SEASONAL_PERIOD {
        return None;
    }
    let mut sums = [0.0; SEASONAL_PERIOD];
    let mut counts = [0u32; SEASONAL_PERIOD];
    for (i, &value) in y.iter().enumerate() {
        let slot = i % SEASONAL_PERIOD;
        sums[slot] += value;
        counts[slot] += 1;
    }
    let mut averages = [0.0; SEASONAL_PERIOD];
    for i in 0..SEASONAL_PERIOD {
        averages[i] = if counts[i] == 0 { 0.0 } else { sums[i] / f64::from(counts[i]) };
    }

    let max = averages.iter().copied().fold(f64::MIN, f64::max);
    let min = averages.iter().copied().fold(f64::MAX, f64::min);
    let variation_factor = if min <= 0.0 { f64::INFINITY } else { max / min };
    let detected = variation_factor > 1.10;
    let peak_day_of_week = averages.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1)).map_or(0, |(i, _)| i as u8);

    Some(SeasonalityReport { detected, day_of_week_averages: averages, peak_day_of_week, variation_factor })
}

fn base_summary(y: &[f64], _forecast_days: u32) -> ForecastSummary {
    let current_cost = y.last().copied().unwrap_or(0.0);

    let (trend, monthly_rate) = if y.len() < 2 {
        (None, 0.0)
    } else {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        let model = regression::fit(&x, y);
        let monthly_rate = model.slope * 30.0;
        let threshold = (0.02 * current_cost).max(1.0);
        let trend = if monthly_rate > threshold {
            TrendCategory::Increasing
        } else if monthly_rate < -threshold {
            TrendCategory::Decreasing
        } else {
            TrendCategory::Stable
        };
        (Some(trend), monthly_rate)
    };

    ForecastSummary { current_cost, monthly_rate, trend, by_provider: BTreeMap::new(), by_resource_type: BTreeMap::new(), top_cost_drivers: Vec::new() }
}

fn enrich_with_graph_state(summary: &mut ForecastSummary, nodes: &[Node]) {
    let attribution = ikg_cost::attribute_cost(nodes);
    summary.by_provider = attribution.by_provider;
    summary.by_resource_type = attribution.by_resource_type;

    let mut drivers: Vec<(String, f64)> = nodes.iter().filter_map(|n| n.cost_monthly.map(|cost| (n.name.clone(), cost))).collect();
    drivers.sort_by(|a, b| b.1.total_cmp(&a.1));
    drivers.truncate(5);
    summary.top_cost_drivers = drivers;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn series_of(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = Utc::now();
        values
            .iter()
            .enumerate()
            .map(|(i, &cost)| TimeSeriesPoint { timestamp: start + Duration::days(i as i64), total_cost: cost, node_count: 10, provider: Some(Provider::Aws) })
            .collect()
    }

    #[test]
    fn below_threshold_series_is_flat_with_zero_confidence() {
        let points = series_of(&[100.0, 105.0]);
        let engine = ForecastEngine::new();
        let options = ForecastOptions { min_data_points: 3, forecast_days: 5, ..Default::default() };
        let result = engine.forecast(&points, &options);
        assert!(result.points.iter().all(|p| p.confidence == 0.0));
        assert!(result.points.iter().all(|p| (p.predicted - 105.0).abs() < 1e-9));
    }

    #[test]
    fn bounds_are_ordered_and_nonnegative_s6() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + 3.0 * i as f64).collect();
        let points = series_of(&values);
        let engine = ForecastEngine::new();
        let options = ForecastOptions { forecast_days: 30, ..Default::default() };
        let result = engine.forecast(&points, &options);
        for point in &result.points {
            assert!(point.lower_bound <= point.predicted, "lower={} predicted={}", point.lower_bound, point.predicted);
            assert!(point.predicted <= point.upper_bound);
            assert!(point.lower_bound >= 0.0);
        }
    }

    #[test]
    fn seasonal_series_is_detected_s7() {
        let mut values = Vec::new();
        for week in 0..8 {
            for day in 0..7 {
                let bump = if day >= 5 { 50.0 } else { 0.0 };
                values.push(100.0 + week as f64 + bump);
            }
        }
        let report = seasonality_report(&values).expect("long enough series");
        assert!(report.detected);
        assert!(report.variation_factor > 1.10);
    }

    #[test]
    fn holt_winters_refusal_falls_back_to_other_methods() {
        let values: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let points = series_of(&values);
        let engine = ForecastEngine::new();
        let result = engine.forecast(&points, &ForecastOptions::default());
        assert_ne!(result.method, ForecastMethod::HoltWinters);
    }
}
