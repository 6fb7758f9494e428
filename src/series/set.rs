use crate::types::{ChartPoint, OhlcPoint, RenderType};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Points(Vec<ChartPoint>),
    Candles(Vec<OhlcPoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Candles(candles) => candles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub render_type: RenderType,
    pub data: SeriesData,
}

impl ChartSeries {
    pub fn points(name: impl Into<String>, render_type: RenderType, points: Vec<ChartPoint>) -> Self {
        Self {
            name: name.into(),
            render_type,
            data: SeriesData::Points(points),
        }
    }

    pub fn candles(name: impl Into<String>, candles: Vec<OhlcPoint>) -> Self {
        Self {
            name: name.into(),
            render_type: RenderType::Candlestick,
            data: SeriesData::Candles(candles),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<&ChartPoint> {
        match &self.data {
            SeriesData::Points(points) => points.get(index),
            SeriesData::Candles(_) => None,
        }
    }

    pub fn candle(&self, index: usize) -> Option<&OhlcPoint> {
        match &self.data {
            SeriesData::Candles(candles) => candles.get(index),
            SeriesData::Points(_) => None,
        }
    }
}

/// Per-series stroke and marker settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub stroke_width: u32,
    pub marker_size: u32,
}

pub type FormatterFn = dyn Fn(&ChartSeries, usize) -> Option<String> + Send + Sync;

/// Tooltip text for a point of one series.
///
/// Formatters receive the series they belong to and a point index, so no
/// index has to be captured when the formatter is created.
#[derive(Clone)]
pub enum TooltipFormatter {
    /// The 8-decimal value string
    RawValue,
    /// Value printed as a whole number (volume)
    Integer,
    /// Open/high/low/close block for candles
    Ohlc,
    Custom(Arc<FormatterFn>),
}

impl TooltipFormatter {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ChartSeries, usize) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::RawValue => "raw_value",
            Self::Integer => "integer",
            Self::Ohlc => "ohlc",
            Self::Custom(_) => "custom",
        }
    }

    pub fn format(&self, series: &ChartSeries, point_index: usize) -> Option<String> {
        match self {
            Self::RawValue => series.point(point_index).map(ChartPoint::display_value),
            Self::Integer => series
                .point(point_index)
                .map(|p| format!("{}", p.value.round() as i64)),
            Self::Ohlc => series.candle(point_index).map(|c| {
                format!(
                    "Open:{}<br>High:{}<br>Low:{}<br>Close:{}",
                    c.open(),
                    c.high(),
                    c.low(),
                    c.close()
                )
            }),
            Self::Custom(f) => f(series, point_index),
        }
    }
}

impl fmt::Debug for TooltipFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TooltipFormatter::{}", self.tag())
    }
}

impl Serialize for TooltipFormatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Render-ready series plus parallel style arrays.
///
/// `series`, `stroke_width`, `marker_size` and `tooltip_formatter` always
/// have the same length: `push` is the only way in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSeriesSet {
    series: Vec<ChartSeries>,
    stroke_width: Vec<u32>,
    marker_size: Vec<u32>,
    tooltip_formatter: Vec<TooltipFormatter>,
}

impl ChartSeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a series with its style and formatter; returns its index.
    pub fn push(&mut self, series: ChartSeries, style: SeriesStyle, formatter: TooltipFormatter) -> usize {
        self.series.push(series);
        self.stroke_width.push(style.stroke_width);
        self.marker_size.push(style.marker_size);
        self.tooltip_formatter.push(formatter);
        self.series.len() - 1
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn stroke_widths(&self) -> &[u32] {
        &self.stroke_width
    }

    pub fn marker_sizes(&self) -> &[u32] {
        &self.marker_size
    }

    pub fn tooltip_formatters(&self) -> &[TooltipFormatter] {
        &self.tooltip_formatter
    }

    pub fn get(&self, index: usize) -> Option<&ChartSeries> {
        self.series.get(index)
    }

    pub fn style(&self, index: usize) -> Option<SeriesStyle> {
        Some(SeriesStyle {
            stroke_width: *self.stroke_width.get(index)?,
            marker_size: *self.marker_size.get(index)?,
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Tooltip text for `(series_index, point_index)`.
    pub fn tooltip(&self, series_index: usize, point_index: usize) -> Option<String> {
        let series = self.series.get(series_index)?;
        self.tooltip_formatter
            .get(series_index)?
            .format(series, point_index)
    }
}
