use crate::error::{Result, TradechartError};
use crate::types::ChartPoint;
use chrono::DateTime;
use serde_json::{Map, Value};

/// One `[timestampMillis, value]` pair as it arrives from the bot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: i64,
    pub value: f64,
}

impl RawSample {
    pub fn to_point(self) -> ChartPoint {
        ChartPoint::new(self.timestamp, self.value)
    }
}

/// Indicator payload, shaped by the depth the catalog declares for its kind
#[derive(Debug, Clone, PartialEq)]
pub enum RawIndicatorPayload {
    /// Ordered samples of one series
    FlatSamples(Vec<RawSample>),
    /// Ordered samples per sub-series, sub-series in first-seen order
    KeyedSamples(Vec<(String, Vec<RawSample>)>),
}

/// Sub-series points in first-seen name order
pub type NamedPoints = Vec<(String, Vec<ChartPoint>)>;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedSeries {
    Flat(Vec<ChartPoint>),
    Keyed(NamedPoints),
}

impl RawIndicatorPayload {
    /// Reads `value` as a flat sample sequence. `key` names the indicator in errors.
    pub fn parse_flat(key: &str, value: &Value) -> Result<Self> {
        Ok(Self::FlatSamples(parse_samples(key, value)?))
    }

    /// Reads a keyed payload in either of its two shapes:
    ///
    /// - `{ name: [[t, v], ...], ... }`, one sample sequence per sub-series;
    /// - `[{ name: [t, v], ... }, ...]`, entries interleaving the sub-series.
    pub fn parse_keyed(key: &str, value: &Value) -> Result<Self> {
        if let Some(map) = value.as_object().filter(|map| holds_sequences(map)) {
            let named = map
                .iter()
                .map(|(name, sequence)| -> Result<(String, Vec<RawSample>)> {
                    let context = format!("{}.{}", key, name);
                    Ok((name.clone(), parse_samples(&context, sequence)?))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::KeyedSamples(named));
        }

        let mut named: Vec<(String, Vec<RawSample>)> = Vec::new();
        for (i, entry) in entries(key, value)?.enumerate() {
            let map = entry.as_object().ok_or_else(|| {
                TradechartError::malformed(
                    key,
                    format!("entry {} should map sub-series names to samples, found {}", i, kind_of(entry)),
                )
            })?;
            for (name, sample) in map {
                let sample = parse_sample(key, sample, i)?;
                match named.iter_mut().find(|(existing, _)| existing.as_str() == name.as_str()) {
                    Some((_, samples)) => samples.push(sample),
                    None => named.push((name.clone(), vec![sample])),
                }
            }
        }
        Ok(Self::KeyedSamples(named))
    }

    /// Reads `value` as `{ sub-indicator label: flat samples }`, keeping label order.
    pub fn parse_double(key: &str, value: &Value) -> Result<Vec<(String, Self)>> {
        let map = value.as_object().ok_or_else(|| {
            TradechartError::malformed(
                key,
                format!("expected a mapping of sub-indicator labels, found {}", kind_of(value)),
            )
        })?;
        map.iter()
            .map(|(label, inner)| -> Result<(String, Self)> {
                let context = format!("{}.{}", key, label);
                Ok((label.clone(), Self::parse_flat(&context, inner)?))
            })
            .collect()
    }

    /// Total number of samples across all sub-series.
    pub fn len(&self) -> usize {
        match self {
            Self::FlatSamples(samples) => samples.len(),
            Self::KeyedSamples(named) => named.iter().map(|(_, samples)| samples.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily converted points of a flat payload; empty for keyed payloads.
    pub fn points(&self) -> impl Iterator<Item = ChartPoint> + '_ {
        let samples: &[RawSample] = match self {
            Self::FlatSamples(samples) => samples,
            Self::KeyedSamples(_) => &[],
        };
        samples.iter().copied().map(RawSample::to_point)
    }

    /// Converted points per sub-series of a keyed payload; empty for flat payloads.
    pub fn named_points(&self) -> NamedPoints {
        match self {
            Self::FlatSamples(_) => Vec::new(),
            Self::KeyedSamples(named) => named
                .iter()
                .map(|(name, samples)| {
                    (name.clone(), samples.iter().copied().map(RawSample::to_point).collect())
                })
                .collect(),
        }
    }

    pub fn normalize(&self) -> NormalizedSeries {
        match self {
            Self::FlatSamples(_) => NormalizedSeries::Flat(self.points().collect()),
            Self::KeyedSamples(_) => NormalizedSeries::Keyed(self.named_points()),
        }
    }
}

/// True when every value of `map` is a sequence of samples rather than a sample.
fn holds_sequences(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map.values().all(|value| {
            value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_array))
        })
}

fn parse_samples(key: &str, value: &Value) -> Result<Vec<RawSample>> {
    entries(key, value)?
        .enumerate()
        .map(|(i, entry)| parse_sample(key, entry, i))
        .collect()
}

/// Entries of a payload container: array elements, or object values in key order.
fn entries<'a>(key: &str, value: &'a Value) -> Result<Box<dyn Iterator<Item = &'a Value> + 'a>> {
    match value {
        Value::Array(items) => Ok(Box::new(items.iter())),
        Value::Object(map) => Ok(Box::new(map.values())),
        other => Err(TradechartError::malformed(
            key,
            format!("expected a sequence of samples, found {}", kind_of(other)),
        )),
    }
}

fn parse_sample(key: &str, value: &Value, index: usize) -> Result<RawSample> {
    let pair = value.as_array().filter(|pair| pair.len() >= 2).ok_or_else(|| {
        TradechartError::malformed(
            key,
            format!("entry {} should be a [timestamp, value] pair, found {}", index, kind_of(value)),
        )
    })?;

    let timestamp = match &pair[0] {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        _ => None,
    }
    .ok_or_else(|| {
        TradechartError::malformed(key, format!("entry {} has a non-numeric timestamp", index))
    })?;

    if DateTime::from_timestamp_millis(timestamp).is_none() {
        return Err(TradechartError::malformed(
            key,
            format!("entry {} has timestamp {} outside the representable date range", index, timestamp),
        ));
    }

    let value = pair[1].as_f64().ok_or_else(|| {
        TradechartError::malformed(key, format!("entry {} has a non-numeric value", index))
    })?;

    Ok(RawSample { timestamp, value })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_payload_normalizes_in_order() {
        let payload =
            RawIndicatorPayload::parse_flat("rma", &json!([[2000, 2.0], [1000, 1.123456789]])).unwrap();
        let NormalizedSeries::Flat(points) = payload.normalize() else {
            panic!("expected flat series");
        };
        assert_eq!(points, vec![ChartPoint::new(2000, 2.0), ChartPoint::new(1000, 1.12345679)]);
    }

    #[test]
    fn test_flat_payload_from_indexed_object() {
        let payload = RawIndicatorPayload::parse_flat(
            "cps",
            &json!({"0": [1000, 1.0], "1": [2000, 2.0]}),
        )
        .unwrap();
        assert_eq!(payload.len(), 2);
        let timestamps: Vec<i64> = payload.points().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![1000, 2000]);
    }

    #[test]
    fn test_float_timestamp_truncated() {
        let payload = RawIndicatorPayload::parse_flat("rma", &json!([[1000.9, 1.0]])).unwrap();
        assert_eq!(payload.points().next().unwrap().timestamp, 1000);
    }

    #[test]
    fn test_keyed_payload_deinterleaves_first_seen() {
        let payload = RawIndicatorPayload::parse_keyed(
            "boll",
            &json!([
                {"upper": [1000, 3.0], "lower": [1000, 1.0]},
                {"upper": [2000, 4.0], "mid": [2000, 3.0], "lower": [2000, 2.0]},
            ]),
        )
        .unwrap();
        let NormalizedSeries::Keyed(named) = payload.normalize() else {
            panic!("expected keyed series");
        };
        let names: Vec<&str> = named.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["upper", "lower", "mid"]);
        assert_eq!(named[0].1.len(), 2);
        assert_eq!(named[1].1[1], ChartPoint::new(2000, 2.0));
        assert_eq!(named[2].1.len(), 1);
    }

    #[test]
    fn test_keyed_object_of_sequences_keeps_key_order() {
        let payload = RawIndicatorPayload::parse_keyed(
            "boll",
            &json!({"A": [[1000, 1.0], [2000, 1.5]], "B": [[1000, 2.0]]}),
        )
        .unwrap();
        assert_eq!(payload.len(), 3);
        let named = payload.named_points();
        let names: Vec<&str> = named.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(named[0].1, vec![ChartPoint::new(1000, 1.0), ChartPoint::new(2000, 1.5)]);
        assert_eq!(payload.normalize(), NormalizedSeries::Keyed(named));
    }

    #[test]
    fn test_keyed_object_error_names_sub_series() {
        let err = RawIndicatorPayload::parse_keyed("boll", &json!({"upper": [[1000, "x"]]}))
            .unwrap_err();
        assert!(err.to_string().contains("boll.upper"));
    }

    #[test]
    fn test_out_of_range_timestamp_rejected() {
        let err = RawIndicatorPayload::parse_flat("rma", &json!([[i64::MAX, 1.0]])).unwrap_err();
        assert!(err.to_string().contains("date range"));
        assert!(RawIndicatorPayload::parse_keyed("boll", &json!([{"a": [i64::MIN, 1.0]}])).is_err());
    }

    #[test]
    fn test_keyed_points_iterator_is_empty() {
        let payload =
            RawIndicatorPayload::parse_keyed("ichi", &json!([{"a": [1, 1.0]}])).unwrap();
        assert_eq!(payload.points().count(), 0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let keyed_data = json!([{"a": [1000, 1.0]}]);
        let err = RawIndicatorPayload::parse_flat("rma14", &keyed_data).unwrap_err();
        assert!(err.to_string().contains("rma14"));

        let flat_data = json!([[1000, 1.0]]);
        assert!(RawIndicatorPayload::parse_keyed("boll", &flat_data).is_err());
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        assert!(RawIndicatorPayload::parse_flat("rma", &json!([[1000, null]])).is_err());
        assert!(RawIndicatorPayload::parse_flat("rma", &json!([["t", 1.0]])).is_err());
        assert!(RawIndicatorPayload::parse_flat("rma", &json!(5)).is_err());
    }

    #[test]
    fn test_double_payload_keeps_label_order() {
        let parsed = RawIndicatorPayload::parse_double(
            "ema",
            &json!({"26": [[1000, 2.0]], "12": [[1000, 1.0]]}),
        )
        .unwrap();
        let labels: Vec<&str> = parsed.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["26", "12"]);
    }

    #[test]
    fn test_double_payload_error_names_label() {
        let err = RawIndicatorPayload::parse_double("ema", &json!({"12": [[1000, "x"]]})).unwrap_err();
        assert!(err.to_string().contains("ema.12"));
    }
}
