//! Error types for the derivation algebra core.
//!
//! Only boundary operations (grammar import, logging setup) return errors.
//! Inadmissible combinations are signaled by `None` from the combinators,
//! never by an error value; algebra contract violations (non-finite
//! priorities, incompatible contexts) are fatal assertions.

use thiserror::Error;

/// Grammar import and validation errors
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("Duplicate non-terminal declaration: {0}")]
    DuplicateNonTerminal(String),

    #[error("Unknown symbol `{symbol}` in production for `{lhs}`")]
    UnknownSymbol { lhs: String, symbol: String },

    #[error("Non-finite priority in production for `{lhs}`")]
    NonFinitePriority { lhs: String },

    #[error("Malformed grammar: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Grammar I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Logging configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log directive: {0}")]
    InvalidLogDirective(String),

    #[error("Failed to initialize logging: {0}")]
    InitFailed(String),
}
