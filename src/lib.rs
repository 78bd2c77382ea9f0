//! Sentinel Risk Engine
//!
//! Two-lane transaction risk decisioning for a payments platform:
//!
//! 1. **Fast lane**: every transaction gets an ALLOW/BLOCK decision within a
//!    strict deadline, with a circuit breaker that fails open on low-value
//!    and closed on high-value transactions when the scorer is unavailable.
//! 2. **Deep lane**: asynchronous graph-pattern analysis (fan-in mules,
//!    laundering loops) whose findings feed back through the shared risk
//!    store so future fast decisions are pre-informed, and which escalates
//!    high-confidence detections to autonomous containment.
//!
//! External collaborators (trained scorer, graph database, core-banking
//! ledger, watchlist) sit behind traits in [`scorer`], [`graph`] and
//! [`ledger`].

pub mod agents;
pub mod config;
pub mod deeppath;
pub mod error;
pub mod fastpath;
pub mod graph;
pub mod ledger;
pub mod pipeline;
pub mod scorer;
pub mod store;
pub mod types;

pub use agents::{ContainmentAgent, DeceptionAgent};
pub use config::{DeepPathConfig, FastPathConfig, PipelineConfig, SentinelConfig};
pub use deeppath::DeepPathWorker;
pub use error::{Result, SentinelError};
pub use fastpath::{fallback_decision, FastPathEngine};
pub use graph::{GraphBackend, MemoryGraph};
pub use ledger::{Ledger, LoggingLedger, LoggingWatchlist, Watchlist};
pub use pipeline::Sentinel;
pub use scorer::{HeuristicScorer, Scorer};
pub use store::RiskStore;
pub use types::*;

/// Version of the sentinel risk engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
