//! Process entry point: loads configuration, recovers the persistence
//! manager, and serves spec.md §6's HTTP surface until shut down.
//!
//! ```text
//! $ server [config.json]
//! ```
//!
//! With no argument, or if the file is absent, built-in defaults are used
//! (see [`config::Config::default`]).

use anyhow::{Context, Result};
use cache::Cache;
use manager::{ManagerConfig, ManagerHandle};
use router::Router;
use server::AppState;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "driftkv failed to start");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::Config::load_from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => config::Config::default(),
    };

    let manager_cfg = ManagerConfig {
        bloom_filter_size: cfg.bloom_filter_size,
        bloom_hash_count: cfg.bloom_hash_count,
        max_keys_per_sstable: cfg.max_keys_per_sstable,
        compaction_threshold: cfg.compaction_threshold,
    };

    let persistence = ManagerHandle::spawn(PathBuf::from(&cfg.sstable_directory), manager_cfg)
        .await
        .context("recovering persistence manager")?;
    let cache = Arc::new(Cache::new());
    let router = Router::new(cache, persistence);
    let state = Arc::new(AppState { router });

    let app = server::build_app(state);
    let listener = tokio::net::TcpListener::bind(cfg.http_addr)
        .await
        .with_context(|| format!("binding {}", cfg.http_addr))?;

    tracing::info!(addr = %cfg.http_addr, dir = %cfg.sstable_directory, "driftkv listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
