// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::store::OfferStore;

/// Health checker for the record store.
///
/// Periodically pings the store and tracks outages. Supports graceful
/// shutdown via broadcast channel.
pub struct HealthChecker {
    store: Arc<dyn OfferStore>,
    check_interval: Duration,
    current_state: Arc<AtomicBool>,
    outage_count: Arc<AtomicU64>,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn OfferStore>, check_interval: Duration) -> Self {
        Self {
            store,
            check_interval,
            current_state: Arc::new(AtomicBool::new(true)), // Assume healthy initially
            outage_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the health check loop until a shutdown signal is received.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.check_interval);
        // Don't burst on startup
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            backend = self.store.backend(),
            interval_secs = self.check_interval.as_secs(),
            "starting health checker"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.check_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("health checker received shutdown signal");
                    break;
                }
            }
        }

        tracing::info!("health checker stopped");
    }

    /// Ping the store once and publish the result.
    pub async fn check_once(&self) -> bool {
        let is_healthy = match self.store.ping().await {
            Ok(()) => {
                tracing::trace!(backend = self.store.backend(), "store health check passed");
                true
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.store.backend(),
                    error = %e,
                    "store health check failed"
                );
                false
            }
        };

        let was_healthy = self.current_state.swap(is_healthy, Ordering::SeqCst);
        if was_healthy && !is_healthy {
            let count = self.outage_count.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::warn!(
                event = "outage",
                backend = self.store.backend(),
                total_outages = count,
                "store became unreachable"
            );
        } else if !was_healthy && is_healthy {
            tracing::info!(
                event = "recovery",
                backend = self.store.backend(),
                "store recovered"
            );
        }

        is_healthy
    }

    pub fn outage_count(&self) -> u64 {
        self.outage_count.load(Ordering::Relaxed)
    }

    /// Get an Arc clone of the health state for sharing with handlers.
    pub fn state(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.current_state)
    }
}
