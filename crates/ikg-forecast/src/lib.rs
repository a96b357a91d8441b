//! Time-series cost forecasting over the infrastructure knowledge graph
//! (`spec.md` §4.5): holdout-validated selection among linear regression,
//! EWMA, Holt linear, Holt-Winters, and an inverse-MAPE ensemble.

pub mod ensemble;
pub mod engine;
pub mod error;
pub mod ewma;
pub mod holt;
pub mod holt_winters;
pub mod mape;
pub mod regression;
pub mod series;

pub use engine::{ForecastEngine, ForecastMethod, ForecastOptions, ForecastPoint, ForecastResult, ForecastSummary, SeasonalityReport, TrendCategory};
pub use error::{Error, Result};
pub use series::{build_series, TimeSeriesPoint};
