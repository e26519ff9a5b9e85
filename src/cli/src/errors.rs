//! Error types for the CLI.

use std::error::Error as StdError;
use std::fmt;

use multisend_core::{CoreError, LedgerError};

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when the recipient list cannot be parsed.
    ParseError(String),

    /// Error when the configuration is missing or invalid.
    ConfigError(String),

    /// Error from the verification or building engine.
    CoreError(CoreError),

    /// Error when a request to the node fails.
    LedgerError(LedgerError),

    /// Error when the balance is insufficient for a batch.
    InsufficientBalance(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileError(e) => write!(f, "File error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::ParseError(msg) => write!(f, "Recipient list error: {}", msg),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CliError::CoreError(e) => write!(f, "{}", e),
            CliError::LedgerError(e) => write!(f, "{}", e),
            CliError::InsufficientBalance(msg) => write!(f, "Insufficient balance: {}", msg),
        }
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CliError::FileError(e) => Some(e),
            CliError::JsonError(e) => Some(e),
            CliError::CoreError(e) => Some(e),
            CliError::LedgerError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::FileError(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::JsonError(error)
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        CliError::CoreError(error)
    }
}

impl From<LedgerError> for CliError {
    fn from(error: LedgerError) -> Self {
        CliError::LedgerError(error)
    }
}
