//! Ledger and watchlist ports
//!
//! Containment acts through these two interfaces; the core banking system
//! and case-review tooling behind them are external collaborators.

use async_trait::async_trait;

use crate::error::Result;

/// Core-banking ledger operations needed by containment.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Freeze an account. Idempotent: freezing an already-frozen account
    /// succeeds and returns `false`; `true` means this call froze it.
    async fn freeze(&self, account: &str, reason: &str) -> Result<bool>;
}

/// Watchlist sink for accounts flagged during downstream tracing.
#[async_trait]
pub trait Watchlist: Send + Sync {
    /// Mark an account as a suspect for human review
    async fn flag(&self, account: &str, note: &str) -> Result<()>;
}

/// Ledger that only logs, for demos and local runs.
#[derive(Debug, Default)]
pub struct LoggingLedger;

#[async_trait]
impl Ledger for LoggingLedger {
    async fn freeze(&self, account: &str, reason: &str) -> Result<bool> {
        tracing::info!(account, reason, "wallet frozen");
        Ok(true)
    }
}

/// Watchlist that only logs, for demos and local runs.
#[derive(Debug, Default)]
pub struct LoggingWatchlist;

#[async_trait]
impl Watchlist for LoggingWatchlist {
    async fn flag(&self, account: &str, note: &str) -> Result<()> {
        tracing::info!(account, note, "downstream suspect flagged");
        Ok(())
    }
}
