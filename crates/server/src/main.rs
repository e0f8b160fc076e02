//! Recommendation service entry point.
//!
//! Loads the signal files, trains the factor model, and only then binds
//! the HTTP listener, so the service never accepts a request before the
//! model is ready.
//!
//! Configuration comes from the environment:
//! - `RECS_DATA_DIR`  directory holding clicks.csv/orders.csv/ratings.csv
//!   (default "data")
//! - `RECS_ADDR`      listen address (default "127.0.0.1:8080")

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use factor_model::AlsTrainer;
use recommender::{Recommender, build_snapshot};
use server::{AppState, router};
use signal_store::{SignalWeights, load_signal_set};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data_dir =
        PathBuf::from(std::env::var("RECS_DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    let addr = std::env::var("RECS_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!("Loading signals from {}", data_dir.display());

    // Training is CPU-bound; keep it off the async runtime's core threads
    let engine = tokio::task::spawn_blocking(move || -> Result<Recommender> {
        let signals = load_signal_set(&data_dir)
            .with_context(|| format!("Failed to load signals from {}", data_dir.display()))?;
        let snapshot = build_snapshot(
            &signals,
            &SignalWeights::default(),
            &AlsTrainer::default(),
        )?;
        Ok(Recommender::new(snapshot))
    })
    .await
    .context("Training task panicked")??;

    info!(
        users = engine.known_users().len(),
        "Model trained, starting server"
    );

    let state = AppState {
        engine: Arc::new(engine),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
