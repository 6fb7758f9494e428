pub mod outcome;

pub use outcome::{FleetSummary, OutcomeMetrics, TradeOutcome, TradeRecord};
