/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description: 시뮬레이터 공통 오류 타입
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Stock not found: {0}")]
    StockNotFound(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Insufficient shares. You own {owned} shares of {symbol}")]
    InsufficientShares { owned: u32, symbol: String },

    #[error("{0}")]
    Duplicate(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<::config::ConfigError> for SimError {
    fn from(e: ::config::ConfigError) -> Self {
        SimError::ConfigError(e.to_string())
    }
}

impl From<reqwest::Error> for SimError {
    fn from(e: reqwest::Error) -> Self {
        SimError::BackendError(e.to_string())
    }
}
