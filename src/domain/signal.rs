use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn direction(&self) -> f64 {
        match self {
            Trend::Up => 1.0,
            Trend::Down => -1.0,
            Trend::Flat => 0.0,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Flat => write!(f, "flat"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTrend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTrend::Rising => write!(f, "rising"),
            VolumeTrend::Falling => write!(f, "falling"),
            VolumeTrend::Stable => write!(f, "stable"),
        }
    }
}

/// A clustered support or resistance price and how many extrema fed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub touches: usize,
}

/// Technical view of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub trend: Trend,
    /// Volatility-normalized rate of change, in [-1, 1]
    pub momentum: f64,
    /// Ascending by price
    pub support_levels: Vec<PriceLevel>,
    /// Ascending by price
    pub resistance_levels: Vec<PriceLevel>,
    pub volume_trend: VolumeTrend,
    /// Average true range
    pub volatility: f64,
    pub short_ma: f64,
    pub long_ma: f64,
}

impl TechnicalSignal {
    /// Highest support strictly below `price`.
    pub fn nearest_support_below(&self, price: f64) -> Option<f64> {
        self.support_levels
            .iter()
            .map(|l| l.price)
            .filter(|p| *p < price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
    }

    /// Lowest resistance strictly above `price`.
    pub fn nearest_resistance_above(&self, price: f64) -> Option<f64> {
        self.resistance_levels
            .iter()
            .map(|l| l.price)
            .filter(|p| *p > price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
    }

    /// Closest support at or below `price`, as a distance.
    pub fn support_distance(&self, price: f64) -> Option<f64> {
        self.support_levels
            .iter()
            .filter(|l| l.price <= price)
            .map(|l| price - l.price)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    /// Closest resistance at or above `price`, as a distance.
    pub fn resistance_distance(&self, price: f64) -> Option<f64> {
        self.resistance_levels
            .iter()
            .filter(|l| l.price >= price)
            .map(|l| l.price - price)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> TechnicalSignal {
        TechnicalSignal {
            trend: Trend::Flat,
            momentum: 0.0,
            support_levels: vec![
                PriceLevel { price: 90.0, touches: 2 },
                PriceLevel { price: 95.0, touches: 3 },
            ],
            resistance_levels: vec![
                PriceLevel { price: 105.0, touches: 1 },
                PriceLevel { price: 110.0, touches: 4 },
            ],
            volume_trend: VolumeTrend::Stable,
            volatility: 1.0,
            short_ma: 100.0,
            long_ma: 100.0,
        }
    }

    #[test]
    fn test_nearest_levels() {
        let s = signal();
        assert_eq!(s.nearest_support_below(100.0), Some(95.0));
        assert_eq!(s.nearest_resistance_above(100.0), Some(105.0));
        assert_eq!(s.nearest_support_below(90.0), None);
        assert_eq!(s.nearest_resistance_above(110.0), None);
    }

    #[test]
    fn test_level_distances() {
        let s = signal();
        assert_eq!(s.support_distance(100.0), Some(5.0));
        assert_eq!(s.resistance_distance(100.0), Some(5.0));
        assert_eq!(s.resistance_distance(111.0), None);
    }
}
