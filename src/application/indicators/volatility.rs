use crate::domain::market::Candle;
use statrs::statistics::{Data, Distribution};
use ta::Next;
use ta::indicators::TrueRange;

/// Average true range over the whole window.
///
/// The first candle has no previous close, so its true range is `high - low`.
/// Returns 0.0 for an empty slice.
pub fn average_true_range(candles: &[Candle]) -> f64 {
    let mut tr = TrueRange::new();
    let ranges: Vec<f64> = candles.iter().map(|c| tr.next(c)).collect();

    if ranges.is_empty() {
        return 0.0;
    }

    Data::new(ranges).mean().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candle(i: i64, high: f64, low: f64, close: f64) -> Candle {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
        Candle::new(ts, close, high, low, close, None)
    }

    #[test]
    fn test_first_range_is_high_minus_low() {
        let candles = vec![candle(0, 110.0, 100.0, 105.0)];
        assert!((average_true_range(&candles) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_extends_true_range() {
        // Second candle gaps up: |high - prev_close| = 20 dominates high - low = 5
        let candles = vec![
            candle(0, 110.0, 100.0, 105.0),
            candle(1, 125.0, 120.0, 122.0),
        ];
        assert!((average_true_range(&candles) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i, 100.0, 100.0, 100.0)).collect();
        assert_eq!(average_true_range(&candles), 0.0);
        assert_eq!(average_true_range(&[]), 0.0);
    }
}
