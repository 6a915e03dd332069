use thiserror::Error;

use crate::types::Table;

pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    /// A required table is missing, unreadable or malformed. Fatal to
    /// evaluation: no query may run against a partially loaded dataset.
    #[error("Data unavailable: {table} table {reason}")]
    DataUnavailable { table: Table, reason: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MarketError {
    pub fn data_unavailable(table: Table, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            table,
            reason: reason.into(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

impl From<config::ConfigError> for MarketError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
