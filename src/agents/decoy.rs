//! Deception agent ("Decoy")
//!
//! When the API layer detects reconnaissance (enumeration bursts and the
//! like), this agent answers with a schema-valid but fabricated account
//! record instead of real data. Selection is uniform random over a small
//! fixed pool so repeated probes do not see a constant, fingerprintable
//! response; one record is a deliberately attractive honeypot.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::types::{DecoyRecord, DecoyStatus, ProbeEvidence};

/// Serves disinformation to suspected probes.
pub struct DeceptionAgent {
    pool: Vec<DecoyRecord>,
    rng: Mutex<StdRng>,
}

impl DeceptionAgent {
    /// Create an agent with the standard decoy pool
    pub fn new() -> Self {
        Self::with_pool(Self::default_pool())
    }

    /// Create an agent with a custom pool. Panics if the pool is empty,
    /// since an empty pool would break the "never absent on a positive
    /// verdict" contract.
    pub fn with_pool(pool: Vec<DecoyRecord>) -> Self {
        assert!(!pool.is_empty(), "decoy pool must not be empty");
        Self {
            pool,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic RNG seed, for tests
    #[cfg(test)]
    fn with_seed(seed: u64) -> Self {
        Self {
            pool: Self::default_pool(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn default_pool() -> Vec<DecoyRecord> {
        vec![
            DecoyRecord {
                id: "ACC_DECOY_1".to_string(),
                balance: 5_000.0,
                status: DecoyStatus::Active,
            },
            // Honeypot: large locked balance, worth a probe's attention
            DecoyRecord {
                id: "ACC_DECOY_2".to_string(),
                balance: 120_000.0,
                status: DecoyStatus::Locked,
            },
            DecoyRecord {
                id: "ACC_DECOY_3".to_string(),
                balance: 0.0,
                status: DecoyStatus::Active,
            },
        ]
    }

    /// Serve a decoy for a positive probe verdict; `None` only when the
    /// upstream detector says the request is not a probe.
    pub fn intercept(&self, probe: &ProbeEvidence) -> Option<DecoyRecord> {
        if !probe.is_probe {
            return None;
        }

        let index = self.rng.lock().gen_range(0..self.pool.len());
        let record = self.pool[index].clone();
        info!(source = %probe.source, decoy = %record.id, "serving decoy to suspected probe");
        Some(record)
    }
}

impl Default for DeceptionAgent {
    fn default() -> Self {
        Self::new()
    }
}
