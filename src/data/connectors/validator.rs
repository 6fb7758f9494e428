use crate::error::{Result, TradechartError};
use crate::types::CandleRow;
use chrono::DateTime;
use polars::prelude::*;
use super::types::RequiredColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Validate that DataFrame has the required time + OHLCV columns, all numeric
    pub fn validate_ohlcv(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(TradechartError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        for (req_col, actual_name) in &column_map {
            let series = df.column(actual_name)?;
            if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
                return Err(TradechartError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    req_col.as_str(),
                    series.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    /// Find column by checking aliases
    fn find_column(df: &DataFrame, required: &RequiredColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        required
            .aliases()
            .into_iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == *alias))
    }

    /// High must bound open/close/low from above, low must bound open/close from below
    pub fn validate_candles(rows: &[CandleRow]) -> Result<()> {
        for (i, row) in rows.iter().enumerate() {
            if DateTime::from_timestamp_millis(row.timestamp).is_none() {
                return Err(TradechartError::MalformedCandle {
                    row: i,
                    reason: format!("timestamp {} outside the representable date range", row.timestamp),
                });
            }
            let (o, h, l, c) = (row.open, row.high, row.low, row.close);
            if h < l {
                return Err(TradechartError::MalformedCandle {
                    row: i,
                    reason: format!("high ({}) < low ({})", h, l),
                });
            }
            if h < o || h < c {
                return Err(TradechartError::MalformedCandle {
                    row: i,
                    reason: format!("high ({}) < open ({}) or close ({})", h, o, c),
                });
            }
            if l > o || l > c {
                return Err(TradechartError::MalformedCandle {
                    row: i,
                    reason: format!("low ({}) > open ({}) or close ({})", l, o, c),
                });
            }
        }

        Ok(())
    }

    /// Check for null values in any column
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "time" => &[1000i64, 2000, 3000],
            "open" => &[100.0, 101.0, 102.0],
            "high" => &[101.0, 103.0, 104.0],
            "low" => &[99.0, 100.0, 101.0],
            "close" => &[100.5, 102.0, 103.0],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        let result = DataValidator::validate_ohlcv(&df);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df! {
            "time" => &[1000i64, 2000],
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            // Missing 'close'
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        let result = DataValidator::validate_ohlcv(&df);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_column_rejected() {
        let df = df! {
            "time" => &["a", "b"],
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "close" => &[100.5, 102.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_err());
    }

    #[test]
    fn test_column_aliases() {
        let df = df! {
            "Timestamp" => &[1000i64, 2000],
            "Open" => &[100.0, 101.0],  // Capital O
            "HIGH" => &[101.0, 103.0],   // All caps
            "low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],  // Capital C
            "Vol" => &[1000.0, 1500.0],  // Alias for volume
        }
        .unwrap();

        let column_map = DataValidator::validate_ohlcv(&df).unwrap();
        assert_eq!(column_map[&RequiredColumn::Time], "Timestamp");
        assert_eq!(column_map[&RequiredColumn::Volume], "Vol");
    }

    #[test]
    fn test_validate_invalid_ohlc() {
        let rows = [
            CandleRow::new(1000, 100.0, 101.0, 99.0, 100.5, 10.0),
            CandleRow::new(2000, 101.0, 99.0, 99.0, 100.0, 10.0), // High < Open
        ];
        let err = DataValidator::validate_candles(&rows).unwrap_err();
        assert!(matches!(err, TradechartError::MalformedCandle { row: 1, .. }));
        assert!(DataValidator::validate_candles(&rows[..1]).is_ok());
    }

    #[test]
    fn test_validate_out_of_range_timestamp() {
        let rows = [
            CandleRow::new(1_700_000_000_000, 100.0, 101.0, 99.0, 100.5, 10.0),
            CandleRow::new(i64::MAX, 100.0, 101.0, 99.0, 100.5, 10.0),
        ];
        let err = DataValidator::validate_candles(&rows).unwrap_err();
        assert!(matches!(err, TradechartError::MalformedCandle { row: 1, .. }));
    }
}
