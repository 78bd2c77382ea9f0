//! Lane wiring
//!
//! Owns the single shared risk store, hands it to both lanes, and runs the
//! deep lane and containment agent as background tasks. The caller-facing
//! surface is [`Sentinel::submit`]: decide now, analyze later.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::agents::ContainmentAgent;
use crate::config::SentinelConfig;
use crate::deeppath::DeepPathWorker;
use crate::fastpath::FastPathEngine;
use crate::graph::GraphBackend;
use crate::ledger::{Ledger, Watchlist};
use crate::scorer::Scorer;
use crate::store::RiskStore;
use crate::types::{Decision, Transaction};

/// The assembled two-lane engine.
pub struct Sentinel {
    engine: FastPathEngine,
    store: Arc<RiskStore>,
    deep_tx: mpsc::Sender<Transaction>,
    worker_task: JoinHandle<()>,
    containment_task: JoinHandle<()>,
}

impl Sentinel {
    /// Wire both lanes and spawn the background tasks.
    pub fn new(
        config: SentinelConfig,
        scorer: Arc<dyn Scorer>,
        graph: Arc<dyn GraphBackend>,
        ledger: Arc<dyn Ledger>,
        watchlist: Arc<dyn Watchlist>,
    ) -> Self {
        let store = Arc::new(RiskStore::new());

        let engine = FastPathEngine::new(config.fast.clone(), store.clone(), scorer);

        let (deep_tx, deep_rx) = mpsc::channel(config.pipeline.deep_queue_depth);
        let (escalation_tx, escalation_rx) = mpsc::channel(config.pipeline.escalation_queue_depth);

        let worker = Arc::new(DeepPathWorker::new(
            config.deep.clone(),
            graph.clone(),
            store.clone(),
        ));
        let worker_task = tokio::spawn(worker.run(deep_rx, escalation_tx));

        let agent = Arc::new(ContainmentAgent::new(ledger, graph, watchlist));
        let containment_task = tokio::spawn(agent.run(escalation_rx));

        info!("sentinel pipeline started");

        Self {
            engine,
            store,
            deep_tx,
            worker_task,
            containment_task,
        }
    }

    /// Decide this transaction now and queue it for deep analysis.
    ///
    /// The decision comes back on the fast lane's deadline; the deep lane is
    /// advisory and never awaited. A full deep queue drops the analysis for
    /// this transaction rather than delaying the caller.
    pub async fn submit(&self, txn: Transaction) -> Decision {
        let decision = self.engine.decide(&txn).await;

        if let Err(e) = self.deep_tx.try_send(txn) {
            warn!(error = %e, "deep lane queue full, dropping analysis");
        }

        decision
    }

    /// Shared risk store, for inspection and tests
    pub fn risk_store(&self) -> Arc<RiskStore> {
        self.store.clone()
    }

    /// Close the lanes and wait for in-flight deep work to finish.
    pub async fn shutdown(self) {
        drop(self.deep_tx);
        // Worker drains its queue, then its escalation sender drops and the
        // containment loop ends.
        let _ = self.worker_task.await;
        let _ = self.containment_task.await;
        info!("sentinel pipeline stopped");
    }
}
