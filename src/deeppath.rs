//! Deep lane: asynchronous graph-pattern analysis
//!
//! Runs off the critical path with no deadline. Findings are written back to
//! the shared risk store so the *next* transaction from the same sender is
//! pre-informed, and high-confidence detections escalate to containment.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::DeepPathConfig;
use crate::error::Result;
use crate::graph::GraphBackend;
use crate::store::RiskStore;
use crate::types::{DeepVerdict, EscalationEvent, Evidence, PatternKind, RiskSource, Transaction};

/// Additive weight of the fan-in (mule) signal
const FAN_IN_WEIGHT: f64 = 0.5;

/// Additive weight of the cycle (laundering loop) signal
const CYCLE_WEIGHT: f64 = 0.4;

/// Cycle search bounds, in hops
const CYCLE_MIN_LEN: usize = 3;
const CYCLE_MAX_LEN: usize = 6;

/// Asynchronous-lane pattern analysis worker.
///
/// The sole writer into the risk store. Concurrent invocations for the same
/// sender may interleave; the store's last-write-wins rule resolves the race.
pub struct DeepPathWorker {
    config: DeepPathConfig,
    graph: Arc<dyn GraphBackend>,
    store: Arc<RiskStore>,
}

impl DeepPathWorker {
    /// Create a worker over a graph backend and the shared risk store
    pub fn new(config: DeepPathConfig, graph: Arc<dyn GraphBackend>, store: Arc<RiskStore>) -> Self {
        Self {
            config,
            graph,
            store,
        }
    }

    /// Analyze one transaction's sender. Never fails: a graph-backend error
    /// aborts this transaction's analysis (no risk write, no escalation) and
    /// the fast lane has already answered the caller.
    pub async fn process(&self, txn: &Transaction) -> DeepVerdict {
        match self.analyze(txn).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(txn_id = %txn.id, sender = %txn.sender, error = %e, "deep analysis aborted");
                DeepVerdict::Ok
            }
        }
    }

    async fn analyze(&self, txn: &Transaction) -> Result<DeepVerdict> {
        debug!(txn_id = %txn.id, sender = %txn.sender, "analyzing transaction graph");

        let window = Duration::seconds(self.config.fan_in_window_secs as i64);
        let fan_in = self.graph.fan_in(&txn.sender, window).await?;
        let has_cycle = self
            .graph
            .has_cycle(&txn.sender, CYCLE_MIN_LEN, CYCLE_MAX_LEN)
            .await?;

        let fan_in_hit = fan_in > self.config.fan_in_threshold;
        let mut deep_risk = 0.0;
        if fan_in_hit {
            deep_risk += FAN_IN_WEIGHT;
        }
        if has_cycle {
            deep_risk += CYCLE_WEIGHT;
        }

        if deep_risk <= 0.0 {
            return Ok(DeepVerdict::Ok);
        }

        info!(
            sender = %txn.sender,
            fan_in,
            has_cycle,
            deep_risk,
            "deep fraud pattern detected"
        );
        self.store.set(&txn.sender, deep_risk, RiskSource::Deep);

        if deep_risk > self.config.containment_threshold {
            let pattern = match (fan_in_hit, has_cycle) {
                (true, true) => PatternKind::FanInAndCycle,
                (true, false) => PatternKind::FanIn,
                (false, _) => PatternKind::Cycle,
            };
            return Ok(DeepVerdict::TriggerContainment(EscalationEvent {
                account: txn.sender.clone(),
                evidence: Evidence {
                    score: deep_risk,
                    pattern,
                },
            }));
        }

        Ok(DeepVerdict::Ok)
    }

    /// Consume transactions until the channel closes, forwarding escalations.
    /// Nothing awaits this loop per-transaction; it is cancelled only at
    /// process shutdown.
    pub async fn run(
        self: Arc<Self>,
        mut transactions: mpsc::Receiver<Transaction>,
        escalations: mpsc::Sender<EscalationEvent>,
    ) {
        while let Some(txn) = transactions.recv().await {
            if let DeepVerdict::TriggerContainment(event) = self.process(&txn).await {
                if escalations.send(event).await.is_err() {
                    warn!("escalation channel closed, dropping containment trigger");
                }
            }
        }
        debug!("deep lane worker stopped");
    }
}
