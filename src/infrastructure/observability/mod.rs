//! Observability for the advisor
//!
//! Prometheus counters and histograms, rendered as text on demand. There is
//! no HTTP endpoint; the binary logs the exposition on exit.

pub mod metrics;

pub use metrics::Metrics;
