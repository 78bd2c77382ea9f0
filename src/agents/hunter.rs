//! Containment agent ("Hunter")
//!
//! Acts on high-confidence deep-lane detections: freeze the implicated
//! account, then trace and flag its immediate downstream recipients. The
//! freeze is the part that matters; an unfrozen flagged account is a live
//! security incident, so freeze failure propagates while trace failures
//! merely reduce thoroughness.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{Result, SentinelError};
use crate::graph::GraphBackend;
use crate::ledger::{Ledger, Watchlist};
use crate::types::{EscalationEvent, Evidence};

/// Autonomous containment unit.
pub struct ContainmentAgent {
    ledger: Arc<dyn Ledger>,
    graph: Arc<dyn GraphBackend>,
    watchlist: Arc<dyn Watchlist>,
    /// Accounts already engaged in this process; skips duplicate deliveries
    /// cheaply. The ledger's own freeze idempotency is the real guarantee.
    engaged: DashSet<String>,
}

impl ContainmentAgent {
    /// Create an agent over the ledger, graph and watchlist collaborators
    pub fn new(
        ledger: Arc<dyn Ledger>,
        graph: Arc<dyn GraphBackend>,
        watchlist: Arc<dyn Watchlist>,
    ) -> Self {
        Self {
            ledger,
            graph,
            watchlist,
            engaged: DashSet::new(),
        }
    }

    /// Execute the containment protocol for one target.
    ///
    /// Idempotent per account: re-delivery of the same escalation is a
    /// no-op. A failed freeze is fatal and leaves the account eligible for
    /// re-engagement; a failed downstream trace is not.
    pub async fn engage(&self, target: &str, evidence: &Evidence) -> Result<()> {
        if !self.engaged.insert(target.to_string()) {
            debug!(account = target, "already engaged, ignoring re-delivery");
            return Ok(());
        }

        info!(
            account = target,
            score = evidence.score,
            pattern = ?evidence.pattern,
            "engaging containment"
        );

        let reason = format!("high-risk fraud pattern: {:?}", evidence.pattern);
        match self.ledger.freeze(target, &reason).await {
            Ok(newly_frozen) => {
                info!(account = target, newly_frozen, "account frozen");
            }
            Err(e) => {
                // Allow a later engagement to retry the freeze
                self.engaged.remove(target);
                return Err(SentinelError::freeze(target, e.to_string()));
            }
        }

        let downstream = match self.graph.downstream_one_hop(target).await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(account = target, error = %e, "downstream trace failed, primary freeze stands");
                return Ok(());
            }
        };

        for suspect in downstream {
            let note = format!("received funds from contained account {}", target);
            if let Err(e) = self.watchlist.flag(&suspect, &note).await {
                warn!(account = %suspect, error = %e, "watchlist flag failed");
            } else {
                info!(account = %suspect, "downstream suspect flagged");
            }
        }

        Ok(())
    }

    /// Consume escalation events until the channel closes. Freeze failures
    /// are logged at error level so alerting can page a human; the loop
    /// keeps serving subsequent events.
    pub async fn run(self: Arc<Self>, mut escalations: mpsc::Receiver<EscalationEvent>) {
        while let Some(event) = escalations.recv().await {
            if let Err(e) = self.engage(&event.account, &event.evidence).await {
                error!(account = %event.account, error = %e, "containment engagement failed");
            }
        }
        debug!("containment agent stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternKind;
    use async_trait::async_trait;
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Ledger fake counting freeze calls per account.
    #[derive(Default)]
    struct CountingLedger {
        freezes: Mutex<HashMap<String, u32>>,
        fail: bool,
    }

    #[async_trait]
    impl Ledger for CountingLedger {
        async fn freeze(&self, account: &str, _reason: &str) -> Result<bool> {
            if self.fail {
                return Err(SentinelError::internal("ledger unreachable"));
            }
            let mut freezes = self.freezes.lock();
            let count = freezes.entry(account.to_string()).or_insert(0);
            *count += 1;
            Ok(*count == 1)
        }
    }

    #[derive(Default)]
    struct RecordingWatchlist {
        flagged: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Watchlist for RecordingWatchlist {
        async fn flag(&self, account: &str, _note: &str) -> Result<()> {
            self.flagged.lock().push(account.to_string());
            Ok(())
        }
    }

    struct StaticGraph {
        downstream: Vec<String>,
        fail_trace: bool,
    }

    #[async_trait]
    impl GraphBackend for StaticGraph {
        async fn fan_in(&self, _account: &str, _window: Duration) -> Result<u32> {
            Ok(0)
        }

        async fn has_cycle(&self, _account: &str, _min: usize, _max: usize) -> Result<bool> {
            Ok(false)
        }

        async fn downstream_one_hop(&self, _account: &str) -> Result<Vec<String>> {
            if self.fail_trace {
                return Err(SentinelError::graph("trace query timed out"));
            }
            Ok(self.downstream.clone())
        }
    }

    fn evidence() -> Evidence {
        Evidence {
            score: 0.9,
            pattern: PatternKind::FanInAndCycle,
        }
    }

    #[tokio::test]
    async fn engage_freezes_and_flags_downstream() {
        let ledger = Arc::new(CountingLedger::default());
        let watchlist = Arc::new(RecordingWatchlist::default());
        let agent = ContainmentAgent::new(
            ledger.clone(),
            Arc::new(StaticGraph {
                downstream: vec!["C_M1".to_string(), "C_M2".to_string()],
                fail_trace: false,
            }),
            watchlist.clone(),
        );

        agent.engage("C_BAD", &evidence()).await.unwrap();

        assert_eq!(ledger.freezes.lock().get("C_BAD"), Some(&1));
        assert_eq!(watchlist.flagged.lock().as_slice(), &["C_M1", "C_M2"]);
    }

    #[tokio::test]
    async fn repeated_engagement_freezes_exactly_once() {
        let ledger = Arc::new(CountingLedger::default());
        let agent = ContainmentAgent::new(
            ledger.clone(),
            Arc::new(StaticGraph {
                downstream: Vec::new(),
                fail_trace: false,
            }),
            Arc::new(RecordingWatchlist::default()),
        );

        agent.engage("C_BAD", &evidence()).await.unwrap();
        agent.engage("C_BAD", &evidence()).await.unwrap();

        assert_eq!(ledger.freezes.lock().get("C_BAD"), Some(&1));
    }

    #[tokio::test]
    async fn freeze_failure_is_fatal_and_retryable() {
        let agent = ContainmentAgent::new(
            Arc::new(CountingLedger {
                freezes: Mutex::new(HashMap::new()),
                fail: true,
            }),
            Arc::new(StaticGraph {
                downstream: Vec::new(),
                fail_trace: false,
            }),
            Arc::new(RecordingWatchlist::default()),
        );

        let err = agent.engage("C_BAD", &evidence()).await.unwrap_err();
        assert!(matches!(err, SentinelError::LedgerFreeze { .. }));

        // The failed engagement must not poison the idempotency set
        assert!(!agent.engaged.contains("C_BAD"));
    }

    #[tokio::test]
    async fn trace_failure_is_non_fatal() {
        let ledger = Arc::new(CountingLedger::default());
        let agent = ContainmentAgent::new(
            ledger.clone(),
            Arc::new(StaticGraph {
                downstream: Vec::new(),
                fail_trace: true,
            }),
            Arc::new(RecordingWatchlist::default()),
        );

        agent.engage("C_BAD", &evidence()).await.unwrap();
        assert_eq!(ledger.freezes.lock().get("C_BAD"), Some(&1));
    }
}
