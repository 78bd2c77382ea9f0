//! Scorer port
//!
//! The fast lane treats scoring as an opaque, replaceable capability: any
//! trained classifier can sit behind [`Scorer`] as long as it is a pure
//! synchronous function of the transaction. The engine supplies the deadline
//! and cancellation; implementations need no timeout logic of their own.

use crate::error::Result;
use crate::types::{Transaction, TxnKind};

/// Synchronous transaction scorer, probability of fraud in [0, 1].
///
/// Contract: pure (no side effects), deterministic for a given transaction.
/// The engine runs the call on a cancellable blocking task, so a slow
/// implementation is abandoned rather than awaited past the deadline.
pub trait Scorer: Send + Sync + 'static {
    fn score(&self, txn: &Transaction) -> Result<f64>;
}

/// Reference scorer used by demos when no trained model is wired in.
///
/// Step heuristic on amount and balance discrepancy; only TRANSFER and
/// CASH_OUT carry meaningful risk in the upstream dataset, other kinds score
/// a floor value.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    /// Amount above which the heuristic treats a transfer as high risk
    pub high_value_cutoff: f64,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            high_value_cutoff: 100_000.0,
        }
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, txn: &Transaction) -> Result<f64> {
        if !matches!(txn.kind, TxnKind::Transfer | TxnKind::CashOut) {
            return Ok(0.01);
        }

        let mut score: f64 = 0.1;
        if txn.amount > self.high_value_cutoff {
            score += 0.8;
        }
        if txn.error_balance_orig().abs() > 1.0 || txn.error_balance_dest().abs() > 1.0 {
            score += 0.1;
        }

        Ok(score.min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn txn(kind: TxnKind, amount: f64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sender: "C_A".to_string(),
            recipient: "C_B".to_string(),
            kind,
            amount,
            old_balance_orig: amount,
            new_balance_orig: 0.0,
            old_balance_dest: 0.0,
            new_balance_dest: amount,
        }
    }

    #[test]
    fn payment_kinds_score_low() {
        let scorer = HeuristicScorer::default();
        assert_eq!(scorer.score(&txn(TxnKind::Payment, 1_000_000.0)).unwrap(), 0.01);
    }

    #[test]
    fn high_value_transfer_scores_above_block_threshold() {
        let scorer = HeuristicScorer::default();
        let score = scorer.score(&txn(TxnKind::Transfer, 250_000.0)).unwrap();
        assert!(score > 0.8);
    }

    #[test]
    fn low_value_transfer_scores_low() {
        let scorer = HeuristicScorer::default();
        let score = scorer.score(&txn(TxnKind::Transfer, 50.0)).unwrap();
        assert!(score < 0.8);
    }
}
