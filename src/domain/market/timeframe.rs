use crate::domain::errors::AnalysisError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candle granularity requested from a price provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    OneMin,
    FifteenMin,
    ThirtyMin,
    FourHour,
    OneDay,
    OneWeek,
}

impl Granularity {
    /// Returns the duration of one candle in minutes
    pub fn to_minutes(&self) -> i64 {
        match self {
            Granularity::OneMin => 1,
            Granularity::FifteenMin => 15,
            Granularity::ThirtyMin => 30,
            Granularity::FourHour => 240,
            Granularity::OneDay => 1440,
            Granularity::OneWeek => 10080,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.to_minutes())
    }

    /// Converts to TwelveData API interval string
    pub fn to_twelvedata_string(&self) -> &'static str {
        match self {
            Granularity::OneMin => "1min",
            Granularity::FifteenMin => "15min",
            Granularity::ThirtyMin => "30min",
            Granularity::FourHour => "4h",
            Granularity::OneDay => "1day",
            Granularity::OneWeek => "1week",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_twelvedata_string())
    }
}

/// The six user-facing analysis horizons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeframeSelector {
    OneHour,
    TwelveHours,
    TwentyFourHours,
    OneMonth,
    ThreeMonths,
    OneYear,
}

/// Output of the timeframe resolver: how far back to look and at what resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeframeResolution {
    pub lookback: Duration,
    pub granularity: Granularity,
    /// Window used when searching for news about the ticker
    pub news_lookback: Duration,
}

impl TimeframeResolution {
    /// Number of candles the lookback holds at this granularity
    pub fn expected_candles(&self) -> usize {
        (self.lookback.num_minutes() / self.granularity.to_minutes()).max(0) as usize
    }
}

impl TimeframeSelector {
    pub fn all() -> [TimeframeSelector; 6] {
        [
            TimeframeSelector::OneHour,
            TimeframeSelector::TwelveHours,
            TimeframeSelector::TwentyFourHours,
            TimeframeSelector::OneMonth,
            TimeframeSelector::ThreeMonths,
            TimeframeSelector::OneYear,
        ]
    }

    /// Maps the selector to its fixed lookback window and candle granularity.
    ///
    /// Every mapping yields at least 30 candles so the indicator windows are stable.
    pub fn resolve(&self) -> TimeframeResolution {
        let (lookback, granularity, news_days) = match self {
            TimeframeSelector::OneHour => (Duration::hours(1), Granularity::OneMin, 1),
            TimeframeSelector::TwelveHours => (Duration::hours(12), Granularity::FifteenMin, 2),
            TimeframeSelector::TwentyFourHours => {
                (Duration::hours(24), Granularity::ThirtyMin, 3)
            }
            TimeframeSelector::OneMonth => (Duration::days(30), Granularity::FourHour, 7),
            TimeframeSelector::ThreeMonths => (Duration::days(90), Granularity::OneDay, 14),
            TimeframeSelector::OneYear => (Duration::days(365), Granularity::OneWeek, 30),
        };

        TimeframeResolution {
            lookback,
            granularity,
            news_lookback: Duration::days(news_days),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeframeSelector::OneHour => "1h",
            TimeframeSelector::TwelveHours => "12h",
            TimeframeSelector::TwentyFourHours => "24h",
            TimeframeSelector::OneMonth => "1m",
            TimeframeSelector::ThreeMonths => "3m",
            TimeframeSelector::OneYear => "1y",
        }
    }

    /// Human-readable label used in report subjects
    pub fn label(&self) -> &'static str {
        match self {
            TimeframeSelector::OneHour => "Hourly",
            TimeframeSelector::TwelveHours => "12-Hour",
            TimeframeSelector::TwentyFourHours => "Daily",
            TimeframeSelector::OneMonth => "Monthly",
            TimeframeSelector::ThreeMonths => "Quarterly",
            TimeframeSelector::OneYear => "Yearly",
        }
    }

    pub fn trading_style(&self) -> &'static str {
        match self {
            TimeframeSelector::OneHour => "scalping and ultra-short-term trades",
            TimeframeSelector::TwelveHours => "intraday trading with quick entries/exits",
            TimeframeSelector::TwentyFourHours => "day trading with swing potential",
            TimeframeSelector::OneMonth => "swing trading over days to weeks",
            TimeframeSelector::ThreeMonths => "position trading with medium-term outlook",
            TimeframeSelector::OneYear => "long-term investment and major trend analysis",
        }
    }
}

impl FromStr for TimeframeSelector {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Ok(TimeframeSelector::OneHour),
            "12h" => Ok(TimeframeSelector::TwelveHours),
            "24h" => Ok(TimeframeSelector::TwentyFourHours),
            "1m" => Ok(TimeframeSelector::OneMonth),
            "3m" => Ok(TimeframeSelector::ThreeMonths),
            "1y" => Ok(TimeframeSelector::OneYear),
            _ => Err(AnalysisError::InvalidTimeframe {
                selector: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeframeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
