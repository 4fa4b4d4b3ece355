// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod handlers;
mod health;
mod metrics;
mod store;

use config::{Config, StoreSettings};
use handlers::{
    api_router, health_live, health_ready, health_startup, metrics_handler, ApiState,
    HealthState, MetricsState,
};
use health::HealthChecker;
use metrics::{track_requests, Metrics};
use offer_policy::record::SeedData;
use store::{InMemoryStore, OfferStore, PostgrestStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config);

    // Select the store backend
    let store = build_store(&config).await?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = store.backend(),
        version = offer_policy::VERSION,
        "starting offer-gateway"
    );

    // Create shutdown broadcast channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutting_down = Arc::new(AtomicBool::new(false));

    // Create metrics registry
    let metrics = Metrics::new();

    // Create health checker and spawn its loop
    let health_checker = Arc::new(HealthChecker::new(
        Arc::clone(&store),
        Duration::from_secs(config.health_check_interval_secs),
    ));
    let store_healthy = health_checker.state();

    let health_shutdown_rx = shutdown_tx.subscribe();
    let health_checker_clone = Arc::clone(&health_checker);
    tokio::spawn(async move {
        health_checker_clone.run(health_shutdown_rx).await;
    });

    let health_state = HealthState {
        store_healthy: Arc::clone(&store_healthy),
        shutting_down: Arc::clone(&shutting_down),
        backend: store.backend(),
    };
    let metrics_state = MetricsState {
        metrics: metrics.clone(),
        store_healthy,
        backend: store.backend(),
    };

    // Build application router
    let app = Router::new()
        .merge(api_router(ApiState::new(store, metrics.clone())))
        // Health endpoints (no state needed for live/startup)
        .route("/health/live", get(health_live))
        .route("/health/startup", get(health_startup))
        .route("/health/ready", get(health_ready).with_state(health_state))
        // Metrics endpoint
        .route("/metrics", get(metrics_handler).with_state(metrics_state))
        .layer(middleware::from_fn_with_state(metrics, track_requests))
        .layer(TraceLayer::new_for_http());

    // Create TCP listener
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "listening for connections");

    // Spawn graceful shutdown handler
    let shutdown_tx_clone = shutdown_tx.clone();
    let shutting_down_clone = Arc::clone(&shutting_down);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received, initiating graceful shutdown");

        // Mark as shutting down (readiness turns 503)
        shutting_down_clone.store(true, Ordering::SeqCst);

        // Signal all tasks to stop
        let _ = shutdown_tx_clone.send(());
    });

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let mut rx = shutdown_tx.subscribe();
            let _ = rx.recv().await;
        })
        .await?;

    tracing::info!(
        store_outages = health_checker.outage_count(),
        "offer-gateway stopped"
    );
    Ok(())
}

/// Build the configured store. Without a hosted database URL the gateway
/// runs on the in-memory store, seeded from `SEED_FILE` when set.
async fn build_store(config: &Config) -> Result<Arc<dyn OfferStore>> {
    match config.store_settings()? {
        StoreSettings::Postgrest(pg) => {
            tracing::info!(url = %pg.base_url, "using PostgREST store");
            Ok(Arc::new(PostgrestStore::new(pg)?))
        }
        StoreSettings::Memory { seed_file: None } => {
            tracing::warn!("no SUPABASE_URL configured, using an empty in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreSettings::Memory {
            seed_file: Some(path),
        } => {
            let yaml = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read seed file {}", path))?;
            let seed = SeedData::from_yaml(&yaml)
                .with_context(|| format!("failed to parse seed file {}", path))?;
            tracing::info!(path = %path, records = seed.len(), "using seeded in-memory store");
            Ok(Arc::new(InMemoryStore::from_seed(seed)?))
        }
    }
}

/// Initialize tracing based on configuration.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
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
