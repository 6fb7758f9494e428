pub mod builder;
pub mod candles;
pub mod normalizer;
pub mod set;

pub use builder::{BuiltChart, ChartingPayload, IndicatorSeriesBuilder, SkipReason, SkippedIndicator};
pub use candles::{build_candle_data, CandleSeries, CANDLE_SERIES_NAME, VOLUME_SERIES_NAME};
pub use normalizer::{NamedPoints, NormalizedSeries, RawIndicatorPayload, RawSample};
pub use set::{ChartSeries, ChartSeriesSet, SeriesData, SeriesStyle, TooltipFormatter};
