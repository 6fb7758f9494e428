use super::candles::{build_candle_data, CANDLE_SERIES_NAME, VOLUME_SERIES_NAME};
use super::normalizer::RawIndicatorPayload;
use super::set::{ChartSeries, ChartSeriesSet, TooltipFormatter};
use crate::catalog::{IndicatorCatalog, IndicatorProfile};
use crate::config::{CandlePosition, ChartConfig, MalformedPolicy};
use crate::error::Result;
use crate::types::{CandleRow, Depth, Placement, RenderType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Charting data for one market as served to the dashboard
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartingPayload {
    #[serde(default)]
    pub candles: Vec<CandleRow>,
    /// Raw indicator key -> payload, in the order the bot sent them
    #[serde(default)]
    pub indicators: Map<String, Value>,
}

impl ChartingPayload {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Key does not resolve to a catalogued kind
    Unclassified,
    /// Kind belongs on its own panel, not the candle overlay
    OwnPanel,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedIndicator {
    pub key: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of one build: the series set plus every indicator left out of it
#[derive(Debug, Clone, Serialize)]
pub struct BuiltChart {
    pub series_set: ChartSeriesSet,
    pub skipped: Vec<SkippedIndicator>,
}

/// Turns a charting payload into the candle-panel series set.
///
/// Holds no state between builds; the same input always yields the same series.
#[derive(Debug, Clone)]
pub struct IndicatorSeriesBuilder {
    catalog: Arc<IndicatorCatalog>,
    config: ChartConfig,
    candle_formatter: TooltipFormatter,
}

impl IndicatorSeriesBuilder {
    pub fn new(catalog: IndicatorCatalog, config: ChartConfig) -> Self {
        Self::with_shared_catalog(Arc::new(catalog), config)
    }

    pub fn with_shared_catalog(catalog: Arc<IndicatorCatalog>, config: ChartConfig) -> Self {
        Self {
            catalog,
            config,
            candle_formatter: TooltipFormatter::Ohlc,
        }
    }

    /// Replaces the OHLC tooltip used for the candle series.
    pub fn with_candle_formatter(mut self, formatter: TooltipFormatter) -> Self {
        self.candle_formatter = formatter;
        self
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Profile of `raw_key` if it is a catalogued main-panel indicator.
    pub fn overlay_profile(&self, raw_key: &str) -> std::result::Result<IndicatorProfile, SkipReason> {
        let profile = self
            .catalog
            .classify(raw_key)
            .and_then(|kind| self.catalog.profile(kind))
            .ok_or(SkipReason::Unclassified)?;

        match profile.placement {
            Placement::Main => Ok(profile),
            Placement::Own => Err(SkipReason::OwnPanel),
        }
    }

    /// Shapes one indicator payload into named series without touching any set.
    pub fn overlay_series(
        &self,
        raw_key: &str,
        profile: &IndicatorProfile,
        payload: &Value,
    ) -> Result<Vec<ChartSeries>> {
        let render_type = profile.render_type;

        let series: Vec<ChartSeries> = match profile.depth {
            Depth::DoubleKeyed => RawIndicatorPayload::parse_double(raw_key, payload)?
                .into_iter()
                .map(|(label, samples)| {
                    ChartSeries::points(label, render_type, samples.points().collect())
                })
                .collect(),
            Depth::Single => {
                let samples = RawIndicatorPayload::parse_flat(raw_key, payload)?;
                vec![ChartSeries::points(raw_key, render_type, samples.points().collect())]
            }
            Depth::Keyed => RawIndicatorPayload::parse_keyed(raw_key, payload)?
                .named_points()
                .into_iter()
                .map(|(name, points)| ChartSeries::points(name, render_type, points))
                .collect(),
        };

        Ok(series)
    }

    /// Appends every series of one indicator, or nothing if its payload is malformed.
    /// Returns the number of series appended.
    pub fn attach(
        &self,
        set: &mut ChartSeriesSet,
        raw_key: &str,
        profile: &IndicatorProfile,
        payload: &Value,
    ) -> Result<usize> {
        let series = self.overlay_series(raw_key, profile, payload)?;
        let style = self.config.overlay_style(profile.render_type);
        let count = series.len();
        for s in series {
            set.push(s, style, TooltipFormatter::RawValue);
        }
        Ok(count)
    }

    /// Appends the candle series, plus volume when configured.
    /// No candles means no candle series.
    pub fn attach_candles(&self, set: &mut ChartSeriesSet, candles: &[CandleRow]) {
        if candles.is_empty() {
            return;
        }
        let built = build_candle_data(candles);
        let style = self.config.candle_style();

        set.push(
            ChartSeries::candles(CANDLE_SERIES_NAME, built.ohlc),
            style,
            self.candle_formatter.clone(),
        );

        if self.config.include_volume {
            set.push(
                ChartSeries::points(VOLUME_SERIES_NAME, RenderType::Bar, built.volume),
                style,
                TooltipFormatter::Integer,
            );
        }
    }

    pub fn build(&self, payload: &ChartingPayload) -> Result<BuiltChart> {
        self.build_overlay_series(&payload.candles, &payload.indicators)
    }

    /// Classifies, normalizes and attaches every indicator in map order,
    /// then places the candle series per `candle_position`.
    pub fn build_overlay_series(
        &self,
        candles: &[CandleRow],
        indicators: &Map<String, Value>,
    ) -> Result<BuiltChart> {
        let mut set = ChartSeriesSet::new();
        let mut skipped = Vec::new();

        if self.config.candle_position == CandlePosition::First {
            self.attach_candles(&mut set, candles);
        }

        for (raw_key, payload) in indicators {
            let profile = match self.overlay_profile(raw_key) {
                Ok(profile) => profile,
                Err(reason) => {
                    log::debug!("Skipping indicator '{}': {:?}", raw_key, reason);
                    skipped.push(SkippedIndicator {
                        key: raw_key.clone(),
                        reason,
                    });
                    continue;
                }
            };

            match self.attach(&mut set, raw_key, &profile, payload) {
                Ok(count) => {
                    log::debug!(
                        "Attached {} series for '{}' ({}, {:?})",
                        count,
                        raw_key,
                        profile.kind,
                        profile.depth
                    );
                }
                Err(err) if self.config.on_malformed == MalformedPolicy::Skip => {
                    log::warn!("Skipping indicator '{}': {}", raw_key, err);
                    skipped.push(SkippedIndicator {
                        key: raw_key.clone(),
                        reason: SkipReason::Malformed(err.to_string()),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        if self.config.candle_position == CandlePosition::Last {
            self.attach_candles(&mut set, candles);
        }

        Ok(BuiltChart {
            series_set: set,
            skipped,
        })
    }
}

impl Default for IndicatorSeriesBuilder {
    fn default() -> Self {
        Self::new(IndicatorCatalog::standard(), ChartConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IndicatorKind;
    use crate::error::TradechartError;
    use crate::series::SeriesStyle;
    use crate::types::ChartPoint;
    use serde_json::json;

    fn indicators(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_overlay_profile_filters_own_panel() {
        let builder = IndicatorSeriesBuilder::default();
        assert_eq!(builder.overlay_profile("rsi14"), Err(SkipReason::OwnPanel));
        assert_eq!(builder.overlay_profile("vwap"), Err(SkipReason::Unclassified));
        let profile = builder.overlay_profile("ema").unwrap();
        assert_eq!(profile.kind, IndicatorKind::Ema);
        assert_eq!(profile.depth, Depth::DoubleKeyed);
    }

    #[test]
    fn test_single_series_named_after_raw_key() {
        let builder = IndicatorSeriesBuilder::default();
        let built = builder
            .build_overlay_series(&[], &indicators(json!({"tops_bottoms5": [[1000, 3.5], [2000, 4.0]]})))
            .unwrap();
        let set = built.series_set;
        assert_eq!(set.names(), vec!["tops_bottoms5"]);
        assert_eq!(set.get(0).unwrap().render_type, RenderType::Scatter);
        assert_eq!(set.marker_sizes(), &[8]);
        assert_eq!(set.stroke_widths(), &[2]);
        assert_eq!(set.style(0), Some(SeriesStyle { stroke_width: 2, marker_size: 8 }));
    }

    #[test]
    fn test_keyed_object_of_sequences_named_by_key() {
        let builder = IndicatorSeriesBuilder::default();
        let built = builder
            .build_overlay_series(
                &[],
                &indicators(json!({"boll": {"upper": [[1000, 3.0], [2000, 4.0]], "lower": [[1000, 1.0]]}})),
            )
            .unwrap();
        let set = built.series_set;
        assert_eq!(set.names(), vec!["upper", "lower"]);
        assert_eq!(set.get(0).unwrap().point(1), Some(&ChartPoint::new(2000, 4.0)));
        assert_eq!(set.style(1), Some(SeriesStyle { stroke_width: 2, marker_size: 0 }));
    }

    #[test]
    fn test_double_depth_series_named_by_label() {
        let builder = IndicatorSeriesBuilder::default();
        let built = builder
            .build_overlay_series(
                &[],
                &indicators(json!({"ema": {"12": [[1000, 1.0]], "26": [[1000, 2.0], [2000, 2.5]]}})),
            )
            .unwrap();
        let set = built.series_set;
        assert_eq!(set.names(), vec!["12", "26"]);
        assert_eq!(set.get(1).unwrap().point(1), Some(&ChartPoint::new(2000, 2.5)));
        assert_eq!(set.marker_sizes(), &[0, 0]);
    }

    #[test]
    fn test_malformed_indicator_skipped_atomically() {
        let builder = IndicatorSeriesBuilder::default();
        let built = builder
            .build_overlay_series(
                &[],
                &indicators(json!({
                    "ema": {"12": [[1000, 1.0]], "26": [[1000, "bad"]]},
                    "rma9": [[1000, 1.0]],
                })),
            )
            .unwrap();
        assert_eq!(built.series_set.names(), vec!["rma9"]);
        assert_eq!(built.skipped.len(), 1);
        assert_eq!(built.skipped[0].key, "ema");
        assert!(matches!(built.skipped[0].reason, SkipReason::Malformed(_)));
    }

    #[test]
    fn test_abort_policy_fails_build() {
        let config = ChartConfig {
            on_malformed: MalformedPolicy::Abort,
            ..ChartConfig::default()
        };
        let builder = IndicatorSeriesBuilder::new(IndicatorCatalog::standard(), config);
        let err = builder
            .build_overlay_series(&[], &indicators(json!({"cps": {"a": 1}})))
            .unwrap_err();
        assert!(matches!(err, TradechartError::MalformedIndicatorPayload { ref key, .. } if key == "cps"));
    }

    #[test]
    fn test_candles_first_and_volume() {
        let config = ChartConfig {
            candle_position: CandlePosition::First,
            include_volume: true,
            ..ChartConfig::default()
        };
        let builder = IndicatorSeriesBuilder::new(IndicatorCatalog::standard(), config);
        let candles = [CandleRow::new(1000, 10.0, 12.0, 9.0, 11.0, 500.2)];
        let built = builder
            .build_overlay_series(&candles, &indicators(json!({"rma": [[1000, 10.5]]})))
            .unwrap();
        let set = built.series_set;
        assert_eq!(set.names(), vec!["candle", "volume", "rma"]);
        assert_eq!(set.tooltip(1, 0).as_deref(), Some("500"));
        assert_eq!(set.tooltip(2, 0).as_deref(), Some("10.50000000"));
    }

    #[test]
    fn test_injected_candle_formatter() {
        let builder = IndicatorSeriesBuilder::default().with_candle_formatter(TooltipFormatter::custom(
            |series, idx| series.candle(idx).map(|c| format!("C:{}", c.close())),
        ));
        let candles = [CandleRow::new(1000, 10.0, 12.0, 9.0, 11.0, 500.0)];
        let built = builder
            .build_overlay_series(&candles, &indicators(json!({"rma": [[1000, 10.5]]})))
            .unwrap();
        assert_eq!(built.series_set.tooltip(1, 0).as_deref(), Some("C:11"));
        assert_eq!(built.series_set.tooltip(0, 0).as_deref(), Some("10.50000000"));
    }

    #[test]
    fn test_payload_preserves_indicator_order() {
        let payload = ChartingPayload::from_json_str(
            r#"{"candles": [[1000, 1, 2, 0.5, 1.5, 10]], "indicators": {"rma9": [[1, 1.0]], "cps": [[1, 2.0]], "data_lines": [[1, 3.0]]}}"#,
        )
        .unwrap();
        let built = IndicatorSeriesBuilder::default().build(&payload).unwrap();
        assert_eq!(built.series_set.names(), vec!["rma9", "cps", "data_lines", "candle"]);
    }
}
