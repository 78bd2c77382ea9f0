//! Graph backend port and in-memory implementation
//!
//! The deep lane reads its pattern queries through [`GraphBackend`], keeping
//! the actual graph database (Neo4j or similar) an external collaborator.
//! Tests substitute deterministic fakes; demos use [`MemoryGraph`], an
//! in-process directed transaction graph.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::HashSet;

use crate::error::Result;

/// Read queries the deep lane and containment agent need from the
/// transaction graph.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Distinct accounts that sent funds into `account` within the trailing
    /// `window`. Mule accounts show abnormally high fan-in.
    async fn fan_in(&self, account: &str, window: Duration) -> Result<u32>;

    /// Whether a directed path of `min_len..=max_len` edges leads from
    /// `account` back to itself. Laundering loops show up here.
    async fn has_cycle(&self, account: &str, min_len: usize, max_len: usize) -> Result<bool>;

    /// Immediate recipients of funds sent by `account` (one-hop SENT edges),
    /// used by containment to trace where money went next.
    async fn downstream_one_hop(&self, account: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
struct Edge {
    peer: String,
    at: DateTime<Utc>,
}

/// In-process directed transaction graph.
///
/// Adjacency is kept both ways: incoming edges answer the fan-in query,
/// outgoing edges drive the cycle search and downstream trace. Suitable for
/// demos and tests, not a replacement for a real graph database.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    outgoing: DashMap<String, Vec<Edge>>,
    incoming: DashMap<String, Vec<Edge>>,
}

impl MemoryGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a SENT edge from `sender` to `recipient`
    pub fn record_transfer(&self, sender: &str, recipient: &str, at: DateTime<Utc>) {
        self.outgoing
            .entry(sender.to_string())
            .or_default()
            .push(Edge {
                peer: recipient.to_string(),
                at,
            });
        self.incoming
            .entry(recipient.to_string())
            .or_default()
            .push(Edge {
                peer: sender.to_string(),
                at,
            });
    }

    fn neighbors(&self, account: &str) -> Vec<String> {
        self.outgoing
            .get(account)
            .map(|edges| edges.iter().map(|e| e.peer.clone()).collect())
            .unwrap_or_default()
    }

    /// Depth-limited DFS looking for a path of length `min_len..=max_len`
    /// returning to `origin`. Nodes may not repeat within a path except for
    /// the origin closing the loop.
    fn search_cycle(
        &self,
        origin: &str,
        current: &str,
        depth: usize,
        min_len: usize,
        max_len: usize,
        visited: &mut HashSet<String>,
    ) -> bool {
        if depth >= max_len {
            return false;
        }
        for next in self.neighbors(current) {
            if next == origin {
                if depth + 1 >= min_len {
                    return true;
                }
                continue;
            }
            if visited.insert(next.clone()) {
                if self.search_cycle(origin, &next, depth + 1, min_len, max_len, visited) {
                    return true;
                }
                visited.remove(&next);
            }
        }
        false
    }
}

#[async_trait]
impl GraphBackend for MemoryGraph {
    async fn fan_in(&self, account: &str, window: Duration) -> Result<u32> {
        let cutoff = Utc::now() - window;
        let senders: HashSet<String> = self
            .incoming
            .get(account)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|e| e.at >= cutoff)
                    .map(|e| e.peer.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(senders.len() as u32)
    }

    async fn has_cycle(&self, account: &str, min_len: usize, max_len: usize) -> Result<bool> {
        let mut visited = HashSet::new();
        visited.insert(account.to_string());
        Ok(self.search_cycle(account, account, 0, min_len, max_len, &mut visited))
    }

    async fn downstream_one_hop(&self, account: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .neighbors(account)
            .into_iter()
            .filter(|peer| seen.insert(peer.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fan_in_counts_distinct_senders_in_window() {
        let graph = MemoryGraph::new();
        let now = Utc::now();

        graph.record_transfer("C_A", "C_MULE", now);
        graph.record_transfer("C_B", "C_MULE", now);
        // Duplicate sender counted once
        graph.record_transfer("C_A", "C_MULE", now);
        // Outside the window
        graph.record_transfer("C_OLD", "C_MULE", now - Duration::days(3));

        let count = graph.fan_in("C_MULE", Duration::days(1)).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn cycle_of_three_hops_is_found() {
        let graph = MemoryGraph::new();
        let now = Utc::now();

        graph.record_transfer("C_A", "C_B", now);
        graph.record_transfer("C_B", "C_C", now);
        graph.record_transfer("C_C", "C_A", now);

        assert!(graph.has_cycle("C_A", 3, 6).await.unwrap());
    }

    #[tokio::test]
    async fn two_hop_loop_is_below_min_length() {
        let graph = MemoryGraph::new();
        let now = Utc::now();

        graph.record_transfer("C_A", "C_B", now);
        graph.record_transfer("C_B", "C_A", now);

        assert!(!graph.has_cycle("C_A", 3, 6).await.unwrap());
    }

    #[tokio::test]
    async fn long_chain_beyond_max_is_not_a_cycle() {
        let graph = MemoryGraph::new();
        let now = Utc::now();

        // 7-hop loop: one past the max search depth
        let accounts = ["C_A", "C_B", "C_C", "C_D", "C_E", "C_F", "C_G"];
        for pair in accounts.windows(2) {
            graph.record_transfer(pair[0], pair[1], now);
        }
        graph.record_transfer("C_G", "C_A", now);

        assert!(!graph.has_cycle("C_A", 3, 6).await.unwrap());
    }

    #[tokio::test]
    async fn downstream_one_hop_is_deduplicated() {
        let graph = MemoryGraph::new();
        let now = Utc::now();

        graph.record_transfer("C_BAD", "C_M1", now);
        graph.record_transfer("C_BAD", "C_M2", now);
        graph.record_transfer("C_BAD", "C_M1", now);

        let downstream = graph.downstream_one_hop("C_BAD").await.unwrap();
        assert_eq!(downstream.len(), 2);
    }
}
