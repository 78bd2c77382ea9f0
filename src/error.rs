//! Error types for the Sentinel risk engine

use thiserror::Error;

/// Result type alias for Sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Error taxonomy for the two-lane engine.
///
/// Scorer and graph-backend failures are recovered locally (fallback policy
/// and skipped deep analysis respectively) and never reach the transaction
/// originator. A failed freeze is the one error that must propagate.
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Scorer exceeded deadline after {elapsed_ms:.2}ms")]
    ScorerTimeout { elapsed_ms: f64 },

    #[error("Scorer failure: {0}")]
    ScorerFailure(String),

    #[error("Graph backend error: {0}")]
    GraphBackend(String),

    #[error("Ledger freeze failed for {account}: {message}")]
    LedgerFreeze { account: String, message: String },

    #[error("Watchlist error: {0}")]
    Watchlist(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SentinelError {
    /// Create a scorer failure error
    pub fn scorer<S: Into<String>>(message: S) -> Self {
        Self::ScorerFailure(message.into())
    }

    /// Create a graph backend error
    pub fn graph<S: Into<String>>(message: S) -> Self {
        Self::GraphBackend(message.into())
    }

    /// Create a ledger freeze error
    pub fn freeze<A: Into<String>, M: Into<String>>(account: A, message: M) -> Self {
        Self::LedgerFreeze {
            account: account.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}
