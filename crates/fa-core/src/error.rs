//! Error types for Folio Arcade

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum FaError {
    #[error("Insufficient funds: bet {bet} exceeds balance {balance}")]
    InsufficientFunds { bet: u64, balance: u64 },

    #[error("Invalid persisted state: {0}")]
    InvalidPersistedState(String),

    #[error("Persistence write failed: {0}")]
    PersistenceWriteFailure(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FaError {
    fn from(e: serde_json::Error) -> Self {
        FaError::Serialization(e.to_string())
    }
}

/// Result type alias
pub type FaResult<T> = Result<T, FaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_display() {
        let err = FaError::InsufficientFunds { bet: 20, balance: 10 };
        let msg = err.to_string();
        assert!(msg.contains("bet 20"));
        assert!(msg.contains("balance 10"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: FaError = parse.unwrap_err().into();
        assert!(matches!(err, FaError::Serialization(_)));
    }
}
