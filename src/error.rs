use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradechartError {
    #[error("Malformed payload for indicator '{key}': {reason}")]
    MalformedIndicatorPayload { key: String, reason: String },

    #[error("Malformed candle at row {row}: {reason}")]
    MalformedCandle { row: usize, reason: String },

    #[error("Unknown indicator kind: {0}")]
    UnknownIndicatorKind(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TradechartError {
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIndicatorPayload {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TradechartError>;
