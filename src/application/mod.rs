// Pure analysis core
pub mod analysis;
pub mod indicators;
pub mod sentiment_aggregator;
pub mod synthesizer;

// Request orchestration
pub mod pipeline;
pub mod retry;

pub use analysis::AnalysisCore;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, DeliveryStatus};
pub use retry::RetryPolicy;
