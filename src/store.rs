//! Shared risk store coupling the two lanes
//!
//! Written by the deep lane, read by the fast lane. Sharded concurrent map,
//! so reads never block writes and contention is per-key, which matches the
//! access pattern: one writer role and one reader role per account, high
//! fan-out across accounts.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::types::{RiskSignal, RiskSource};

/// Concurrent account-ID -> risk-signal cache.
///
/// Each write is atomic from the perspective of any read: a reader sees
/// either the previous record or the new one, never a torn record. There is
/// no cross-account atomicity and no eviction in this core; a production
/// deployment would layer a TTL on top.
#[derive(Debug, Default)]
pub struct RiskStore {
    signals: DashMap<String, RiskSignal>,
}

impl RiskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            signals: DashMap::new(),
        }
    }

    /// Current signal for an account, if any
    pub fn get(&self, account: &str) -> Option<RiskSignal> {
        self.signals.get(account).map(|entry| *entry.value())
    }

    /// Record a signal stamped with the current time
    pub fn set(&self, account: &str, score: f64, source: RiskSource) {
        self.set_at(account, score, source, Utc::now());
    }

    /// Record a signal with an explicit timestamp.
    ///
    /// Concurrent deep-lane analyses for the same sender may complete in any
    /// order; last-write-wins by timestamp makes the outcome independent of
    /// completion order. A write older than the stored record is dropped.
    pub fn set_at(&self, account: &str, score: f64, source: RiskSource, at: DateTime<Utc>) {
        let incoming = RiskSignal {
            score: score.clamp(0.0, 1.0),
            source,
            updated_at: at,
        };

        self.signals
            .entry(account.to_string())
            .and_modify(|current| {
                if incoming.updated_at >= current.updated_at {
                    *current = incoming;
                }
            })
            .or_insert(incoming);
    }

    /// Number of accounts currently carrying a signal
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
