use crate::types::{CandleRow, ChartPoint, OhlcPoint};

pub const CANDLE_SERIES_NAME: &str = "candle";
pub const VOLUME_SERIES_NAME: &str = "volume";

/// Candle bodies and per-candle volume, one entry per row in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    pub ohlc: Vec<OhlcPoint>,
    pub volume: Vec<ChartPoint>,
}

pub fn build_candle_data(rows: &[CandleRow]) -> CandleSeries {
    let ohlc = rows
        .iter()
        .map(|row| OhlcPoint {
            timestamp: row.timestamp,
            ohlc: [row.open, row.high, row.low, row.close],
        })
        .collect();

    let volume = rows
        .iter()
        .map(|row| ChartPoint::new(row.timestamp, row.volume.round()))
        .collect();

    CandleSeries { ohlc, volume }
}
