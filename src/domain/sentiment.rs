use crate::domain::errors::ScoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A news article as handed over by a news provider, already stripped of provider-specific shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub source: String,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Per-article score produced by a sentiment scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItemScore {
    article_id: String,
    polarity: f64,
    relevance: f64,
}

impl NewsItemScore {
    /// Validates a raw score. Polarity must lie in [-1, 1] and relevance in [0, 1].
    pub fn new(article_id: impl Into<String>, polarity: f64, relevance: f64) -> Result<Self, ScoreError> {
        if !polarity.is_finite() || !(-1.0..=1.0).contains(&polarity) {
            return Err(ScoreError::PolarityOutOfRange(polarity));
        }
        if !relevance.is_finite() || !(0.0..=1.0).contains(&relevance) {
            return Err(ScoreError::RelevanceOutOfRange(relevance));
        }
        Ok(Self {
            article_id: article_id.into(),
            polarity,
            relevance,
        })
    }

    pub fn article_id(&self) -> &str {
        &self.article_id
    }

    pub fn polarity(&self) -> f64 {
        self.polarity
    }

    pub fn relevance(&self) -> f64 {
        self.relevance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bearish,
    Neutral,
    Bullish,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Bullish => write!(f, "Bullish"),
        }
    }
}

/// Aggregate news sentiment for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    /// Relevance-weighted mean polarity, in [-1, 1]
    pub aggregate_polarity: f64,
    /// Mean relevance, in [0, 1]
    pub strength: f64,
    /// Weighted standard deviation of polarity
    pub dispersion: f64,
    pub article_count: usize,
}

impl SentimentSignal {
    pub fn neutral() -> Self {
        Self {
            aggregate_polarity: 0.0,
            strength: 0.0,
            dispersion: 0.0,
            article_count: 0,
        }
    }

    /// Polarity scaled by how much of it is actually news-driven.
    pub fn effective_polarity(&self) -> f64 {
        self.aggregate_polarity * self.strength
    }

    pub fn label(&self) -> SentimentLabel {
        // Same bands the scorer uses for individual headlines
        if self.aggregate_polarity > 0.1 {
            SentimentLabel::Bullish
        } else if self.aggregate_polarity < -0.1 {
            SentimentLabel::Bearish
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl Default for SentimentSignal {
    fn default() -> Self {
        Self::neutral()
    }
}
