use crate::error::{Result, TradechartError};
use crate::types::CandleRow;
use polars::prelude::*;
use std::path::Path;
use super::{types::RequiredColumn, validator::DataValidator};
use std::collections::HashMap;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TradechartError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a time/OHLCV CSV as candle rows, validating columns and OHLC relationships
    pub fn load_candles<P: AsRef<Path>>(path: P) -> Result<Vec<CandleRow>> {
        let df = Self::load(&path)?;
        let column_map = DataValidator::validate_ohlcv(&df)?;

        // Rows with nulls fail below; report the columns up front
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        let rows = Self::candle_rows(&df, &column_map)?;
        DataValidator::validate_candles(&rows)?;

        log::debug!("Loaded {} candles from {}", rows.len(), path.as_ref().display());
        Ok(rows)
    }

    /// Convert a validated DataFrame into candle rows in file order
    pub fn candle_rows(
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
    ) -> Result<Vec<CandleRow>> {
        let column_name = |required: RequiredColumn| {
            column_map.get(&required).ok_or_else(|| {
                TradechartError::DataLoading(format!("Column map has no {} column", required.as_str()))
            })
        };

        let time = df.column(column_name(RequiredColumn::Time)?)?.cast(&DataType::Int64)?;
        let open = df.column(column_name(RequiredColumn::Open)?)?.cast(&DataType::Float64)?;
        let high = df.column(column_name(RequiredColumn::High)?)?.cast(&DataType::Float64)?;
        let low = df.column(column_name(RequiredColumn::Low)?)?.cast(&DataType::Float64)?;
        let close = df.column(column_name(RequiredColumn::Close)?)?.cast(&DataType::Float64)?;
        let volume = df.column(column_name(RequiredColumn::Volume)?)?.cast(&DataType::Float64)?;

        let time = time.i64()?;
        let open = open.f64()?;
        let high = high.f64()?;
        let low = low.f64()?;
        let close = close.f64()?;
        let volume = volume.f64()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            match (time.get(i), open.get(i), high.get(i), low.get(i), close.get(i), volume.get(i)) {
                (Some(t), Some(o), Some(h), Some(l), Some(c), Some(v)) => {
                    rows.push(CandleRow::new(t, o, h, l, c, v));
                }
                _ => {
                    return Err(TradechartError::MalformedCandle {
                        row: i,
                        reason: "missing value".to_string(),
                    });
                }
            }
        }

        Ok(rows)
    }
}
