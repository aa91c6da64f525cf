//! Prometheus metrics definitions for the advisor
//!
//! All metrics use the `advisor_` prefix and are read-only.

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the analysis pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Completed analyses by outcome (ok, invalid_timeframe, insufficient_data, ...)
    pub analyses_total: CounterVec,
    /// Retries issued against external collaborators, by source
    pub provider_retries_total: CounterVec,
    /// Articles dropped because scoring failed
    pub articles_dropped_total: Counter,
    /// Report deliveries by status
    pub deliveries_total: CounterVec,
    /// Wall-clock time of a full analysis request
    pub analysis_duration_seconds: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance with all counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let analyses_total = CounterVec::new(
            Opts::new("advisor_analyses_total", "Total analyses by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(analyses_total.clone()))?;

        let provider_retries_total = CounterVec::new(
            Opts::new(
                "advisor_provider_retries_total",
                "Total retries against external providers",
            ),
            &["source"],
        )?;
        registry.register(Box::new(provider_retries_total.clone()))?;

        let articles_dropped_total = Counter::with_opts(Opts::new(
            "advisor_articles_dropped_total",
            "Articles dropped after a sentiment scoring failure",
        ))?;
        registry.register(Box::new(articles_dropped_total.clone()))?;

        let deliveries_total = CounterVec::new(
            Opts::new("advisor_deliveries_total", "Report deliveries by status"),
            &["status"],
        )?;
        registry.register(Box::new(deliveries_total.clone()))?;

        let analysis_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "advisor_analysis_duration_seconds",
                "End-to-end analysis duration in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(analysis_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            analyses_total,
            provider_retries_total,
            articles_dropped_total,
            deliveries_total,
            analysis_duration_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_analyses(&self, outcome: &str) {
        self.analyses_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_retries(&self, source: &str) {
        self.provider_retries_total.with_label_values(&[source]).inc();
    }

    pub fn add_dropped_articles(&self, count: usize) {
        self.articles_dropped_total.inc_by(count as f64);
    }

    pub fn inc_deliveries(&self, status: &str) {
        self.deliveries_total.with_label_values(&[status]).inc();
    }

    pub fn observe_duration(&self, seconds: f64) {
        self.analysis_duration_seconds.observe(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_render_contains_updated_series() {
        let metrics = Metrics::new().unwrap();
        metrics.inc_analyses("ok");
        metrics.inc_retries("twelvedata");
        metrics.add_dropped_articles(3);
        metrics.inc_deliveries("failed");
        metrics.observe_duration(0.4);

        let output = metrics.render();
        assert!(output.contains("advisor_analyses_total{outcome=\"ok\"} 1"));
        assert!(output.contains("advisor_provider_retries_total{source=\"twelvedata\"} 1"));
        assert!(output.contains("advisor_articles_dropped_total 3"));
        assert!(output.contains("advisor_deliveries_total{status=\"failed\"} 1"));
        assert!(output.contains("advisor_analysis_duration_seconds_count 1"));
    }
}
