//! Sentinel Risk Engine - main entry point
//!
//! Wires the two-lane pipeline against the in-process collaborators
//! (heuristic scorer, in-memory graph, logging ledger) and either serves
//! until shutdown or drives a burst of synthetic traffic through it.

use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, Command};
use rand::Rng;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chrono::Utc;
use uuid::Uuid;

use sentinel_risk::{
    HeuristicScorer, LoggingLedger, LoggingWatchlist, MemoryGraph, Sentinel, SentinelConfig,
    Transaction, TxnKind, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("sentinel")
        .version(VERSION)
        .about("Sentinel Risk Engine - two-lane transaction decisioning")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("OUTPUT")
                .help("Generate example config and exit"),
        )
        .arg(
            Arg::new("simulate")
                .long("simulate")
                .value_name("COUNT")
                .help("Drive COUNT synthetic transactions through the pipeline and exit"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .get_matches();

    let log_level = matches.get_one::<String>("log-level").unwrap();
    init_logging(log_level);

    if let Some(output_path) = matches.get_one::<String>("generate-config") {
        let config = SentinelConfig::default();
        config.save_to_file(output_path)?;
        info!("Generated example config at: {}", output_path);
        return Ok(());
    }

    info!(version = VERSION, "Sentinel risk engine starting");

    let config = if let Some(config_path) = matches.get_one::<String>("config") {
        info!("Loading config from: {}", config_path);
        SentinelConfig::from_file(config_path)?
    } else {
        SentinelConfig::from_env_or_default()?
    };

    let graph = Arc::new(MemoryGraph::new());
    let sentinel = Sentinel::new(
        config,
        Arc::new(HeuristicScorer::default()),
        graph.clone(),
        Arc::new(LoggingLedger),
        Arc::new(LoggingWatchlist),
    );

    if let Some(count) = matches.get_one::<String>("simulate") {
        let count: usize = count.parse().context("--simulate expects a number")?;
        simulate_traffic(&sentinel, &graph, count).await;
        sentinel.shutdown().await;
        return Ok(());
    }

    info!("Pipeline ready; waiting for shutdown signal");
    shutdown_signal().await;
    sentinel.shutdown().await;

    info!("Sentinel risk engine stopped");
    Ok(())
}

fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid log level: {}. Using 'info'", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sentinel_risk={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Push synthetic traffic through the pipeline: mostly benign payments, a
/// seeded mule account with heavy fan-in, and a three-hop laundering loop so
/// both deep-lane patterns fire.
async fn simulate_traffic(sentinel: &Sentinel, graph: &MemoryGraph, count: usize) {
    let now = Utc::now();

    // Fan-in: fifteen distinct senders into one mule
    for i in 0..15 {
        graph.record_transfer(&format!("C_FEEDER_{}", i), "C_MULE", now);
    }
    // Loop: C_MULE -> C_HOP1 -> C_HOP2 -> C_MULE
    graph.record_transfer("C_MULE", "C_HOP1", now);
    graph.record_transfer("C_HOP1", "C_HOP2", now);
    graph.record_transfer("C_HOP2", "C_MULE", now);

    let mut rng = rand::thread_rng();
    let mut blocked = 0usize;

    for i in 0..count {
        let mule_turn = i % 10 == 9;
        let amount = if mule_turn {
            rng.gen_range(50_000.0..500_000.0)
        } else {
            rng.gen_range(10.0..2_000.0)
        };
        let sender = if mule_turn {
            "C_MULE".to_string()
        } else {
            format!("C_USER_{}", rng.gen_range(0..1_000))
        };

        let txn = Transaction {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sender,
            recipient: format!("C_SHOP_{}", rng.gen_range(0..100)),
            kind: if mule_turn {
                TxnKind::Transfer
            } else {
                TxnKind::Payment
            },
            amount,
            old_balance_orig: amount * 2.0,
            new_balance_orig: amount,
            old_balance_dest: 0.0,
            new_balance_dest: amount,
        };

        // Graph ingestion is the data pipeline's job in production; the demo
        // feeds the backend directly.
        graph.record_transfer(&txn.sender, &txn.recipient, txn.timestamp);

        let decision = sentinel.submit(txn).await;
        if decision.disposition == sentinel_risk::Disposition::Block {
            blocked += 1;
            warn!(
                reason = %decision.reason,
                risk = decision.risk_score,
                latency_ms = decision.latency_ms,
                "transaction blocked"
            );
        }
    }

    info!(
        total = count,
        blocked,
        flagged_accounts = sentinel.risk_store().len(),
        "simulation complete"
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
