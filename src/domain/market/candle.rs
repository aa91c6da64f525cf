use crate::domain::errors::AnalysisError;
use crate::domain::market::timeframe::Granularity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One time-bucketed OHLCV record.
///
/// Volume is optional because several crypto feeds report prices only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Checks the physical integrity of a single candle.
    pub fn validate(&self, index: usize) -> Result<(), AnalysisError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(AnalysisError::MalformedCandle {
                index,
                reason: "non-positive or non-finite price component".to_string(),
            });
        }

        if self.high < self.low {
            return Err(AnalysisError::MalformedCandle {
                index,
                reason: format!("high {} < low {}", self.high, self.low),
            });
        }

        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume <= 0.0 {
                return Err(AnalysisError::MalformedCandle {
                    index,
                    reason: format!("non-positive volume {}", volume),
                });
            }
        }

        Ok(())
    }
}

impl ta::High for Candle {
    fn high(&self) -> f64 {
        self.high
    }
}

impl ta::Low for Candle {
    fn low(&self) -> f64 {
        self.low
    }
}

impl ta::Close for Candle {
    fn close(&self) -> f64 {
        self.close
    }
}

/// Validated, strictly time-ordered candles for one ticker at one granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    granularity: Granularity,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Builds a series, rejecting it wholesale if any candle is malformed or out of order.
    pub fn new(
        ticker: impl Into<String>,
        granularity: Granularity,
        candles: Vec<Candle>,
    ) -> Result<Self, AnalysisError> {
        let ticker = ticker.into();

        for (index, candle) in candles.iter().enumerate() {
            if let Err(e) = candle.validate(index) {
                warn!("PriceSeries [{}]: rejecting series: {}", ticker, e);
                return Err(e);
            }
        }

        if let Some(index) = candles
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            let err = AnalysisError::MalformedCandle {
                index: index + 1,
                reason: "timestamp not strictly increasing".to_string(),
            };
            warn!("PriceSeries [{}]: rejecting series: {}", ticker, err);
            return Err(err);
        }

        Ok(Self {
            ticker,
            granularity,
            candles,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// True when at least one candle reports volume.
    pub fn has_volume(&self) -> bool {
        self.candles.iter().any(|c| c.volume.is_some())
    }

    /// Period statistics for the report header. `None` for an empty series.
    pub fn summary(&self) -> Option<SeriesSummary> {
        let first = self.candles.first()?;
        let last = self.candles.last()?;

        let period_high = self
            .candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let period_low = self
            .candles
            .iter()
            .map(|c| c.low)
            .fold(f64::INFINITY, f64::min);
        let avg_close =
            self.candles.iter().map(|c| c.close).sum::<f64>() / self.candles.len() as f64;
        let total_change = last.close - first.close;

        Some(SeriesSummary {
            current_price: last.close,
            period_open: first.open,
            period_high,
            period_low,
            total_change,
            total_change_pct: total_change / first.close * 100.0,
            range: period_high - period_low,
            avg_close,
            candle_count: self.candles.len(),
            start: first.timestamp,
            end: last.timestamp,
        })
    }
}

/// Headline statistics over a whole price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub current_price: f64,
    pub period_open: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub total_change: f64,
    pub total_change_pct: f64,
    /// Period high minus period low
    pub range: f64,
    pub avg_close: f64,
    pub candle_count: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
