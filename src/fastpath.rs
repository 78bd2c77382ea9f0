//! Fast lane: deadline-bounded decisioning with circuit-breaker fallback
//!
//! Every transaction gets exactly one decision, within roughly the
//! configured deadline, regardless of what the scorer does. The scorer runs
//! on a cancellable blocking task joined against a timer; when the deadline
//! expires the in-flight call is abandoned, not awaited, so a wedged model
//! cannot stretch tail latency.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::Duration;
use tracing::{debug, warn};

use crate::config::FastPathConfig;
use crate::error::SentinelError;
use crate::scorer::Scorer;
use crate::store::RiskStore;
use crate::types::{Decision, Disposition, Transaction};

/// Synchronous-lane decision engine.
pub struct FastPathEngine {
    config: FastPathConfig,
    store: Arc<RiskStore>,
    scorer: Arc<dyn Scorer>,
}

impl FastPathEngine {
    /// Create an engine over a shared risk store and a scorer
    pub fn new(config: FastPathConfig, store: Arc<RiskStore>, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config,
            store,
            scorer,
        }
    }

    /// Decide ALLOW/BLOCK for one transaction. Infallible: scorer timeout or
    /// failure routes to the fallback policy, never to the caller. Single
    /// attempt, no retry.
    pub async fn decide(&self, txn: &Transaction) -> Decision {
        let started = Instant::now();

        // A prior deep-lane finding on the sender short-circuits the scorer
        // entirely; this is how the slow lane shapes future fast decisions.
        if let Some(signal) = self.store.get(&txn.sender) {
            if signal.score >= self.config.pre_block_threshold {
                debug!(
                    sender = %txn.sender,
                    score = signal.score,
                    "sender pre-flagged, skipping scorer"
                );
                return Decision {
                    disposition: Disposition::Block,
                    risk_score: signal.score,
                    reason: "pre-flagged by deep path".to_string(),
                    circuit_breaker_triggered: false,
                    latency_ms: elapsed_ms(started),
                };
            }
        }

        let scorer = Arc::clone(&self.scorer);
        let scorer_txn = txn.clone();
        let deadline = Duration::from_millis(self.config.deadline_ms);
        let handle = tokio::task::spawn_blocking(move || scorer.score(&scorer_txn));

        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(Ok(score))) => {
                let disposition = if score > self.config.block_threshold {
                    Disposition::Block
                } else {
                    Disposition::Allow
                };
                Decision {
                    disposition,
                    risk_score: score,
                    reason: format!("model score {:.3}", score),
                    circuit_breaker_triggered: false,
                    latency_ms: elapsed_ms(started),
                }
            }
            Ok(Ok(Err(e))) => {
                warn!(txn_id = %txn.id, error = %e, "scorer failed, circuit breaker engaged");
                fallback_decision(
                    txn.amount,
                    self.config.fail_open_threshold,
                    &e.to_string(),
                    elapsed_ms(started),
                )
            }
            Ok(Err(join_err)) => {
                warn!(txn_id = %txn.id, error = %join_err, "scorer panicked, circuit breaker engaged");
                fallback_decision(
                    txn.amount,
                    self.config.fail_open_threshold,
                    &SentinelError::scorer(format!("scorer task aborted: {}", join_err)).to_string(),
                    elapsed_ms(started),
                )
            }
            // Deadline expired; the blocking call keeps running detached and
            // its result is discarded.
            Err(_) => {
                let latency = elapsed_ms(started);
                warn!(txn_id = %txn.id, latency_ms = latency, "scorer deadline breached, circuit breaker engaged");
                fallback_decision(
                    txn.amount,
                    self.config.fail_open_threshold,
                    &SentinelError::ScorerTimeout {
                        elapsed_ms: latency,
                    }
                    .to_string(),
                    latency,
                )
            }
        }
    }
}

/// Fallback policy when the scorer is unavailable: decide on transaction
/// value, not risk. Pure function of `(amount, fail_open_threshold)` - this
/// is the safety net invoked exactly when the rest of the system is
/// unreliable, so it must not depend on anything that can fail.
pub fn fallback_decision(
    amount: f64,
    fail_open_threshold: f64,
    reason: &str,
    latency_ms: f64,
) -> Decision {
    if amount < fail_open_threshold {
        // Low stakes: preserve user experience, allow
        Decision {
            disposition: Disposition::Allow,
            risk_score: 0.0,
            reason: format!("FAIL-OPEN: {}", reason),
            circuit_breaker_triggered: true,
            latency_ms,
        }
    } else {
        // High stakes: preserve funds, deny
        Decision {
            disposition: Disposition::Block,
            risk_score: 1.0,
            reason: format!("FAIL-CLOSED: {}", reason),
            circuit_breaker_triggered: true,
            latency_ms,
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
