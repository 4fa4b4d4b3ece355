// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Prometheus metrics for the offer gateway.
///
/// Thread-safe registry tracking request latency, throughput, redactions
/// and store health.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    /// Request duration histogram: offer_gateway_request_duration_seconds{method, route, status}
    request_duration: HistogramVec,

    /// Request counter: offer_gateway_request_total{method, route, status}
    request_total: CounterVec,

    /// Redacted records: offer_gateway_redactions_total{role}
    redactions_total: CounterVec,

    /// Store failures: offer_gateway_store_errors_total{kind}
    store_errors_total: CounterVec,

    /// Store reachability: offer_gateway_store_health{backend} (1=up, 0=down)
    store_health: GaugeVec,
}

impl Metrics {
    /// Create a new metrics registry with all collectors registered.
    pub fn new() -> Self {
        let registry = Registry::new();

        // Request duration: buckets from 1ms to 10s (exponential)
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "offer_gateway_request_duration_seconds",
                "Request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.002, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route", "status"],
        )
        .expect("failed to create request_duration histogram");

        let request_total = CounterVec::new(
            Opts::new("offer_gateway_request_total", "Total number of requests"),
            &["method", "route", "status"],
        )
        .expect("failed to create request_total counter");

        let redactions_total = CounterVec::new(
            Opts::new(
                "offer_gateway_redactions_total",
                "Records passed through role redaction",
            ),
            &["role"],
        )
        .expect("failed to create redactions_total counter");

        let store_errors_total = CounterVec::new(
            Opts::new("offer_gateway_store_errors_total", "Store call failures"),
            &["kind"],
        )
        .expect("failed to create store_errors_total counter");

        let store_health = GaugeVec::new(
            Opts::new(
                "offer_gateway_store_health",
                "Store reachability (1=up, 0=down)",
            ),
            &["backend"],
        )
        .expect("failed to create store_health gauge");

        registry
            .register(Box::new(request_duration.clone()))
            .expect("failed to register request_duration");
        registry
            .register(Box::new(request_total.clone()))
            .expect("failed to register request_total");
        registry
            .register(Box::new(redactions_total.clone()))
            .expect("failed to register redactions_total");
        registry
            .register(Box::new(store_errors_total.clone()))
            .expect("failed to register store_errors_total");
        registry
            .register(Box::new(store_health.clone()))
            .expect("failed to register store_health");

        Self {
            registry: Arc::new(registry),
            request_duration,
            request_total,
            redactions_total,
            store_errors_total,
            store_health,
        }
    }

    /// Record a completed HTTP request.
    pub fn record_request(&self, method: &str, route: &str, duration: Duration, status: u16) {
        let status_str = status.to_string();

        self.request_duration
            .with_label_values(&[method, route, &status_str])
            .observe(duration.as_secs_f64());
        self.request_total
            .with_label_values(&[method, route, &status_str])
            .inc();
    }

    /// Count records redacted for a role.
    pub fn record_redactions(&self, role: &str, count: usize) {
        self.redactions_total
            .with_label_values(&[role])
            .inc_by(count as f64);
    }

    pub fn record_store_error(&self, kind: &str) {
        self.store_errors_total.with_label_values(&[kind]).inc();
    }

    /// Set store health status.
    pub fn set_store_health(&self, backend: &str, healthy: bool) {
        self.store_health
            .with_label_values(&[backend])
            .set(if healthy { 1.0 } else { 0.0 });
    }

    /// Encode metrics in Prometheus text format.
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("failed to encode metrics");
        String::from_utf8(buffer).expect("metrics are not valid UTF-8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
