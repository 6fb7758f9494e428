//! Turns a trading bot's charting payload (candles plus a bag of named
//! indicator time series) into a render-ready set of chart series.

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod series;
pub mod types;

pub use catalog::{IndicatorCatalog, IndicatorKind};
pub use error::{Result, TradechartError};
pub use series::{BuiltChart, ChartSeriesSet, ChartingPayload, IndicatorSeriesBuilder};
