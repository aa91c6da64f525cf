use crate::domain::sentiment::{NewsItemScore, SentimentSignal};
use tracing::debug;

/// Reduces per-article scores to one relevance-weighted sentiment signal.
///
/// Items are sorted into a canonical order before summation so the result is
/// bit-for-bit independent of input order.
pub fn aggregate(scores: &[NewsItemScore]) -> SentimentSignal {
    if scores.is_empty() {
        return SentimentSignal::neutral();
    }

    let mut items: Vec<&NewsItemScore> = scores.iter().collect();
    items.sort_by(|a, b| {
        a.polarity()
            .total_cmp(&b.polarity())
            .then(a.relevance().total_cmp(&b.relevance()))
            .then_with(|| a.article_id().cmp(b.article_id()))
    });

    let count = items.len();
    let total_relevance: f64 = items.iter().map(|s| s.relevance()).sum();
    if total_relevance <= 0.0 {
        debug!(
            "SentimentAggregator: {} articles, none relevant; neutral signal",
            count
        );
        return SentimentSignal {
            article_count: count,
            ..SentimentSignal::neutral()
        };
    }

    let weighted_sum: f64 = items.iter().map(|s| s.relevance() * s.polarity()).sum();
    let mean = (weighted_sum / total_relevance).clamp(-1.0, 1.0);

    let weighted_variance: f64 = items
        .iter()
        .map(|s| s.relevance() * (s.polarity() - mean).powi(2))
        .sum::<f64>()
        / total_relevance;

    let signal = SentimentSignal {
        aggregate_polarity: mean,
        strength: (total_relevance / count as f64).clamp(0.0, 1.0),
        dispersion: weighted_variance.max(0.0).sqrt(),
        article_count: count,
    };

    debug!(
        "SentimentAggregator: {} articles -> polarity={:.3} strength={:.3} dispersion={:.3}",
        count, signal.aggregate_polarity, signal.strength, signal.dispersion
    );

    signal
}
