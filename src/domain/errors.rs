use std::time::Duration;
use thiserror::Error;

/// Errors that mean the request, as given, cannot be analyzed.
///
/// None of these are retried: the same input would fail the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid timeframe: '{selector}'. Valid options: 1h, 12h, 24h, 1m, 3m, 1y")]
    InvalidTimeframe { selector: String },

    #[error("Insufficient data: need at least {required} candles, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },
}

/// Errors raised by external collaborators (price/news providers, scorers, report sinks).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Data unavailable from {source_name}: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("Rate limited by {source_name}")]
    RateLimited {
        source_name: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Sentiment scoring unavailable for article {article_id}: {reason}")]
    ScoringUnavailable { article_id: String, reason: String },

    #[error("Report delivery to {destination} failed: {reason}")]
    DeliveryFailed { destination: String, reason: String },
}

impl ProviderError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Server-provided hint for how long to wait before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_secs: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// A per-article score outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("polarity {0} outside [-1, 1]")]
    PolarityOutOfRange(f64),

    #[error("relevance {0} outside [0, 1]")]
    RelevanceOutOfRange(f64),
}

/// Everything the analysis pipeline can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Classifies an error for the retry policy.
pub trait Retryable {
    fn is_retryable(&self) -> bool;

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for ProviderError {
    // Every collaborator failure is transient from our point of view; the
    // bounded attempt count decides when to give up.
    fn is_retryable(&self) -> bool {
        true
    }

    fn retry_after(&self) -> Option<Duration> {
        ProviderError::retry_after(self)
    }
}

impl Retryable for AdvisorError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Analysis(_) => false,
            Self::Provider(e) => e.is_retryable(),
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Analysis(_) => None,
            Self::Provider(e) => e.retry_after(),
        }
    }
}
