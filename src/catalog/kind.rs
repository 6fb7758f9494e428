use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indicator families the dashboard knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    PatternsDataLines,
    PatternsDataPoints,
    TopsBottoms,
    DataLines,
    Cps,
    Ichi,
    Boll,
    Adx,
    Stock,
    Order,
    Ema,
    Sma,
    Rma,
    Rsi,
    Mfi,
    Cci,
    Zerolagmacd,
    Macd,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 18] = [
        Self::PatternsDataLines,
        Self::PatternsDataPoints,
        Self::TopsBottoms,
        Self::DataLines,
        Self::Cps,
        Self::Ichi,
        Self::Boll,
        Self::Adx,
        Self::Stock,
        Self::Order,
        Self::Ema,
        Self::Sma,
        Self::Rma,
        Self::Rsi,
        Self::Mfi,
        Self::Cci,
        Self::Zerolagmacd,
        Self::Macd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatternsDataLines => "patterns_data_lines",
            Self::PatternsDataPoints => "patterns_data_points",
            Self::TopsBottoms => "tops_bottoms",
            Self::DataLines => "data_lines",
            Self::Cps => "cps",
            Self::Ichi => "ichi",
            Self::Boll => "boll",
            Self::Adx => "adx",
            Self::Stock => "stock",
            Self::Order => "order",
            Self::Ema => "ema",
            Self::Sma => "sma",
            Self::Rma => "rma",
            Self::Rsi => "rsi",
            Self::Mfi => "mfi",
            Self::Cci => "cci",
            Self::Zerolagmacd => "zerolagmacd",
            Self::Macd => "macd",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = crate::error::TradechartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::error::TradechartError::UnknownIndicatorKind(s.to_string()))
    }
}

/// First maximal run of non-digit characters in a raw indicator key.
///
/// `"ema12"` -> `"ema"`, `"12sma"` -> `"sma"`, `"42"` -> `None`.
pub fn kind_name(raw_key: &str) -> Option<&str> {
    let start = raw_key.find(|c: char| !c.is_ascii_digit())?;
    let rest = &raw_key[start..];
    let end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_strips_period_suffix() {
        assert_eq!(kind_name("ema12"), Some("ema"));
        assert_eq!(kind_name("rsi"), Some("rsi"));
        assert_eq!(kind_name("patterns_data_lines3"), Some("patterns_data_lines"));
    }

    #[test]
    fn test_kind_name_skips_leading_digits() {
        assert_eq!(kind_name("12sma"), Some("sma"));
        assert_eq!(kind_name("ema12x4"), Some("ema"));
    }

    #[test]
    fn test_kind_name_all_digits() {
        assert_eq!(kind_name("1234"), None);
        assert_eq!(kind_name(""), None);
    }

    #[test]
    fn test_round_trip_names() {
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.as_str().parse::<IndicatorKind>().unwrap(), kind);
        }
        assert!("vwap".parse::<IndicatorKind>().is_err());
    }
}
