// src/metrics/outcome.rs
use crate::types::round_to_precision;
use serde::{Deserialize, Serialize};

/// One leg from a trader's trade log: `[time, price, quantity, order type]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(f64, f64, f64, String)")]
pub struct TradeRecord {
    pub time: i64,
    pub price: f64,
    pub quantity: f64,
    pub order_type: String,
}

impl TradeRecord {
    pub fn new(time: i64, price: f64, quantity: f64, order_type: impl Into<String>) -> Self {
        Self {
            time,
            price,
            quantity,
            order_type: order_type.into(),
        }
    }

    pub fn is_short(&self) -> bool {
        self.order_type.contains("SHORT")
    }
}

impl From<(f64, f64, f64, String)> for TradeRecord {
    fn from((time, price, quantity, order_type): (f64, f64, f64, String)) -> Self {
        Self::new(time.trunc() as i64, price, quantity, order_type)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TradeOutcome {
    pub total_trades: usize,
    /// Profit/loss in quote currency, 8 decimals
    pub outcome: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total_trades: usize,
    pub total_pl: f64,
}

pub struct OutcomeMetrics;

impl OutcomeMetrics {
    /// Scores a trade log as consecutive (entry, exit) pairs.
    ///
    /// Both legs are valued at the entry quantity. A trailing unmatched
    /// entry is an open position and is not counted.
    pub fn calculate(records: &[TradeRecord]) -> TradeOutcome {
        let mut outcome = 0.0;
        let mut total_trades = 0;

        for pair in records.chunks_exact(2) {
            let (entry, exit) = (&pair[0], &pair[1]);
            let entry_value = entry.price * entry.quantity;
            let exit_value = exit.price * entry.quantity;

            outcome += if entry.is_short() {
                entry_value - exit_value
            } else {
                exit_value - entry_value
            };
            total_trades += 1;
        }

        TradeOutcome {
            total_trades,
            outcome: round_to_precision(outcome),
        }
    }

    pub fn fleet<'a>(outcomes: impl IntoIterator<Item = &'a TradeOutcome>) -> FleetSummary {
        outcomes
            .into_iter()
            .fold(FleetSummary::default(), |mut summary, o| {
                summary.total_trades += o.total_trades;
                summary.total_pl += o.outcome;
                summary
            })
    }
}
