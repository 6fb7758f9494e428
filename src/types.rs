use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decimal places kept for indicator values
pub const VALUE_PRECISION: usize = 8;

/// How a series is drawn by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    Line,
    Scatter,
    Macd,
    Candlestick, // Candle series only
    Bar,         // Volume series only
}

impl RenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Macd => "macd",
            Self::Candlestick => "candlestick",
            Self::Bar => "bar",
        }
    }
}

/// Which chart panel an indicator lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Overlaid on the candle panel
    #[serde(alias = "MAIN")]
    Main,
    /// Separate panel with its own axis
    #[serde(alias = "OWN")]
    Own,
}

/// Shape of an indicator's raw payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    /// One flat sample sequence, plotted under the raw key
    Single,
    /// Named sub-series, one series per sub-series name
    Keyed,
    /// Sub-indicator label -> flat sample sequence, one series per label
    DoubleKeyed,
}

/// A single overlay value at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub value: f64,
}

impl ChartPoint {
    /// Builds a point with `value` fixed to 8 decimal places.
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            value: round_to_precision(value),
        }
    }

    /// Value as an 8-decimal string, zero padded ("1.50000000").
    pub fn display_value(&self) -> String {
        format_fixed(self.value)
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Fractional digits needed to print any finite f64 exactly
const EXACT_DIGITS: usize = 1100;

/// Formats `value` with `VALUE_PRECISION` decimals, rounding half away from zero.
///
/// The decision is made on the exact binary expansion of `value`, so only
/// inputs that are exactly halfway between two 8-decimal numbers (such as
/// `0.001953125`) count as ties; they round to the larger magnitude.
pub fn format_fixed(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(VALUE_PRECISION))
        .collect();

    if frac_part.as_bytes().get(VALUE_PRECISION).is_some_and(|d| *d >= b'5') {
        increment_digits(&mut digits);
    }

    let split = digits.len() - VALUE_PRECISION;
    let (int_digits, frac_digits) = digits.split_at(split);
    let sign = if value < 0.0 && digits.iter().any(|d| *d != b'0') { "-" } else { "" };
    format!(
        "{}{}.{}",
        sign,
        String::from_utf8_lossy(int_digits),
        String::from_utf8_lossy(frac_digits)
    )
}

fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Rounds through the fixed-precision decimal string so the stored value
/// always matches what `display_value` prints.
pub fn round_to_precision(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format_fixed(value).parse().unwrap_or(value)
}

/// Candle body for the candlestick series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub timestamp: i64,
    pub ohlc: [f64; 4],
}

impl OhlcPoint {
    pub fn open(&self) -> f64 {
        self.ohlc[0]
    }

    pub fn high(&self) -> f64 {
        self.ohlc[1]
    }

    pub fn low(&self) -> f64 {
        self.ohlc[2]
    }

    pub fn close(&self) -> f64 {
        self.ohlc[3]
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Raw candle row: `[timestamp, open, high, low, close, volume]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f64, f64, f64, f64, f64, f64)")]
pub struct CandleRow {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl CandleRow {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl From<(f64, f64, f64, f64, f64, f64)> for CandleRow {
    fn from((t, o, h, l, c, v): (f64, f64, f64, f64, f64, f64)) -> Self {
        // Timestamps arrive as numbers; fractional millis are dropped.
        Self::new(t.trunc() as i64, o, h, l, c, v)
    }
}
