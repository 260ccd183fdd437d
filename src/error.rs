//! Error types for account and transaction group operations.

use thiserror::Error;

/// Result type alias for banking operations
pub type Result<T> = std::result::Result<T, BankingError>;

/// Errors that can occur while building or querying accounts.
#[derive(Error, Debug)]
pub enum BankingError {
    /// Raw encoding failed structural or value validation
    #[error("{0}")]
    InvalidEncoding(String),

    /// Account group storage is full
    #[error("the capacity of this account's group storage is {capacity}")]
    CapacityExceeded { capacity: usize },

    /// Transaction index is not below the available count
    #[error("transaction index {index} out of range: exceeds the limit {limit}")]
    IndexOutOfRange { index: usize, limit: usize },

    /// Backing account source does not exist
    #[error("account source not found: {path}")]
    SourceNotFound { path: String },

    /// Name or identifier line of a persisted account is missing or unreadable
    #[error("malformed account header at line {line}: {message}")]
    MalformedHeader { line: usize, message: String },

    /// Configuration value could not be used
    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    /// Failed to read or write an account source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: exceptional-banking <account-file>...")]
    MissingArgument,
}

impl BankingError {
    pub(crate) fn invalid_encoding(message: &str) -> Self {
        BankingError::InvalidEncoding(message.to_string())
    }

    /// Returns `true` for errors the reconstruction path recovers from.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, BankingError::InvalidEncoding(_))
    }
}
