/// Volatility-normalized rate of change over the trailing `fraction` of the closes.
///
/// The raw move is divided by `atr * sqrt(bars)`, the expected random-walk
/// excursion over that many bars, then squashed into [-1, 1] with `tanh`.
pub fn momentum(closes: &[f64], fraction: f64, atr: f64) -> f64 {
    if closes.len() < 2 || atr <= 0.0 {
        return 0.0;
    }

    let n = closes.len();
    let bars = ((n as f64 * fraction).floor() as usize).clamp(1, n - 1);
    let delta = closes[n - 1] - closes[n - 1 - bars];

    (delta / (atr * (bars as f64).sqrt())).tanh()
}
