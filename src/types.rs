//! Core types for the Sentinel risk engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction kind, mirroring the upstream payments schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxnKind {
    Transfer,
    CashOut,
    CashIn,
    Payment,
    Debit,
}

/// Immutable transaction record as received from the payments platform.
///
/// Balance-discrepancy features are derived here, never accepted from the
/// caller, so a client cannot feed the scorer manipulated features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID for correlation
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// Sending account ID
    pub sender: String,

    /// Receiving account ID
    pub recipient: String,

    /// Transaction kind
    pub kind: TxnKind,

    /// Transfer amount, non-negative
    pub amount: f64,

    /// Sender balance before the transaction
    pub old_balance_orig: f64,

    /// Sender balance after the transaction
    pub new_balance_orig: f64,

    /// Recipient balance before the transaction
    pub old_balance_dest: f64,

    /// Recipient balance after the transaction
    pub new_balance_dest: f64,
}

impl Transaction {
    /// Sender-side balance discrepancy. Zero for a clean transfer; a large
    /// residual is a strong manipulation signal.
    pub fn error_balance_orig(&self) -> f64 {
        self.new_balance_orig + self.amount - self.old_balance_orig
    }

    /// Recipient-side balance discrepancy.
    pub fn error_balance_dest(&self) -> f64 {
        self.old_balance_dest + self.amount - self.new_balance_dest
    }
}

/// Which lane produced a risk signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSource {
    Fast,
    Deep,
}

/// Per-account risk entry held by the [`RiskStore`](crate::store::RiskStore).
///
/// Last-write-wins by `updated_at`; see the store for the resolution rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSignal {
    /// Risk score in [0, 1]
    pub score: f64,

    /// Producing lane
    pub source: RiskSource,

    /// Timestamp of the producing write
    pub updated_at: DateTime<Utc>,
}

/// Final disposition for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Allow,
    Block,
}

/// Decision returned to the transaction originator.
///
/// This is the wire contract the API layer, simulator and tests depend on.
/// Exactly one decision is produced per transaction; it is never retried or
/// mutated after being returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// ALLOW or BLOCK
    pub disposition: Disposition,

    /// Risk score backing the disposition, in [0, 1]
    pub risk_score: f64,

    /// Free-text diagnostic ("FAIL-OPEN: ...", "pre-flagged by deep path", ...)
    pub reason: String,

    /// Whether the fallback policy produced this decision
    pub circuit_breaker_triggered: bool,

    /// End-to-end decide latency in milliseconds
    pub latency_ms: f64,
}

/// Graph pattern that produced an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Many distinct senders funnelling into one account (mule signal)
    FanIn,

    /// Directed path of 3..=6 hops returning to the originating account
    Cycle,

    /// Both signals firing jointly
    FanInAndCycle,
}

/// Evidence attached to an escalation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Deep risk score that crossed the containment threshold
    pub score: f64,

    /// Pattern(s) observed
    pub pattern: PatternKind,
}

/// Emitted by the deep lane when risk crosses the containment threshold.
///
/// Consumed at-most-once by the containment agent; re-delivery is harmless
/// because account freezing is idempotent by account ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationEvent {
    /// Account to contain
    pub account: String,

    /// Why
    pub evidence: Evidence,
}

/// Outcome of a deep-lane analysis pass
#[derive(Debug, Clone, PartialEq)]
pub enum DeepVerdict {
    /// Nothing actionable (includes aborted analysis on backend failure)
    Ok,

    /// High-confidence detection; containment should engage
    TriggerContainment(EscalationEvent),
}

/// Decoy account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecoyStatus {
    Active,
    Locked,
}

/// Schema-valid but fabricated account record served to reconnaissance
/// traffic instead of real data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoyRecord {
    /// Fake account ID
    pub id: String,

    /// Fake balance
    pub balance: f64,

    /// Fake status
    pub status: DecoyStatus,
}

/// Upstream reconnaissance verdict handed to the deception agent.
///
/// The detection rule itself (e.g. a burst of not-found responses from one
/// source) lives in the API layer; this core only consumes the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeEvidence {
    /// Origin of the suspected probe (IP or client ID)
    pub source: String,

    /// Whether the upstream detector classified the traffic as a probe
    pub is_probe: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_txn() -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sender: "C_ORIG".to_string(),
            recipient: "C_DEST".to_string(),
            kind: TxnKind::Transfer,
            amount: 250_000.0,
            old_balance_orig: 300_000.0,
            new_balance_orig: 50_000.0,
            old_balance_dest: 0.0,
            new_balance_dest: 250_000.0,
        }
    }

    #[test]
    fn derived_features_are_zero_for_consistent_balances() {
        let txn = sample_txn();
        assert_eq!(txn.error_balance_orig(), 0.0);
        assert_eq!(txn.error_balance_dest(), 0.0);
    }

    #[test]
    fn derived_features_expose_discrepancy() {
        let mut txn = sample_txn();
        // Sender claims less left their account than the amount moved
        txn.new_balance_orig = 100_000.0;
        assert_eq!(txn.error_balance_orig(), 50_000.0);
    }

    #[test]
    fn decision_serializes_to_wire_contract() {
        let decision = Decision {
            disposition: Disposition::Block,
            risk_score: 1.0,
            reason: "FAIL-CLOSED: scorer timeout".to_string(),
            circuit_breaker_triggered: true,
            latency_ms: 201.3,
        };

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["disposition"], "BLOCK");
        assert_eq!(json["circuit_breaker_triggered"], true);
    }

    #[test]
    fn txn_kind_uses_upstream_names() {
        let json = serde_json::to_value(TxnKind::CashOut).unwrap();
        assert_eq!(json, "CASH_OUT");
    }
}
