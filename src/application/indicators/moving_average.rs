use crate::domain::signal::Trend;
use ta::Next;
use ta::indicators::SimpleMovingAverage;

/// Window length as a floored fraction of the series, raised to `min_window`
/// and capped at the series length.
pub fn window_length(series_len: usize, fraction: f64, min_window: usize) -> usize {
    // Nudge so fractions like 1/3 of 60 do not floor to 19
    let raw = (series_len as f64 * fraction + 1e-9).floor() as usize;
    raw.max(min_window).min(series_len.max(1))
}

/// Simple moving average of the last `window` closes.
pub fn trailing_sma(closes: &[f64], window: usize) -> Option<f64> {
    if closes.is_empty() || window == 0 {
        return None;
    }
    let mut sma = SimpleMovingAverage::new(window).ok()?;
    let mut last = None;
    for close in closes {
        last = Some(sma.next(*close));
    }
    last
}

/// Classifies the short/long moving average spread against a noise band.
pub fn classify_trend(short_ma: f64, long_ma: f64, noise: f64) -> Trend {
    let spread = short_ma - long_ma;
    if spread > noise {
        Trend::Up
    } else if spread < -noise {
        Trend::Down
    } else {
        Trend::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_length_scaling() {
        assert_eq!(window_length(60, 0.1, 2), 6);
        assert_eq!(window_length(60, 1.0 / 3.0, 2), 20);
        assert_eq!(window_length(30, 0.1, 2), 3);
        // Floors below the minimum get raised
        assert_eq!(window_length(12, 0.1, 2), 2);
    }

    #[test]
    fn test_trailing_sma_uses_last_window() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((trailing_sma(&closes, 2).unwrap() - 4.5).abs() < 1e-9);
        assert!((trailing_sma(&closes, 5).unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(trailing_sma(&[], 3), None);
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(classify_trend(105.0, 100.0, 1.0), Trend::Up);
        assert_eq!(classify_trend(95.0, 100.0, 1.0), Trend::Down);
        assert_eq!(classify_trend(100.5, 100.0, 1.0), Trend::Flat);
        assert_eq!(classify_trend(101.0, 100.0, 1.0), Trend::Flat);
        assert_eq!(classify_trend(100.0, 100.0, 0.0), Trend::Flat);
    }
}
