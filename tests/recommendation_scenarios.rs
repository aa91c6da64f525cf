use crypto_advisor::application::synthesizer::RecommendationSynthesizer;
use crypto_advisor::domain::config::FusionConfig;
use crypto_advisor::domain::recommendation::Action;
use crypto_advisor::domain::sentiment::SentimentSignal;
use crypto_advisor::domain::signal::{PriceLevel, TechnicalSignal, Trend, VolumeTrend};

fn technical(trend: Trend, momentum: f64, volatility: f64) -> TechnicalSignal {
    TechnicalSignal {
        trend,
        momentum,
        support_levels: vec![],
        resistance_levels: vec![],
        volume_trend: VolumeTrend::Stable,
        volatility,
        short_ma: 100.0,
        long_ma: 100.0,
    }
}

fn sentiment(polarity: f64, strength: f64, dispersion: f64) -> SentimentSignal {
    SentimentSignal {
        aggregate_polarity: polarity,
        strength,
        dispersion,
        article_count: 5,
    }
}

#[test]
fn test_flat_market_with_neutral_news_holds() {
    let signal = TechnicalSignal {
        support_levels: vec![PriceLevel {
            price: 90.0,
            touches: 2,
        }],
        resistance_levels: vec![PriceLevel {
            price: 110.0,
            touches: 2,
        }],
        ..technical(Trend::Flat, 0.0, 1.0)
    };

    let rec = RecommendationSynthesizer::default().synthesize(
        &signal,
        &SentimentSignal::neutral(),
        100.0,
    );

    assert_eq!(rec.action, Action::Hold);
    assert!(rec.confidence.abs() < 1e-9);
    assert_eq!(rec.entry_price, 100.0);
    assert_eq!(rec.target_price, 100.0);
    assert_eq!(rec.stop_loss_price, 100.0);
    assert_eq!(rec.risk_reward(), None);
}

fn uptrend_below_resistance(volatility: f64) -> TechnicalSignal {
    TechnicalSignal {
        resistance_levels: vec![PriceLevel {
            price: 101_000.0,
            touches: 3,
        }],
        short_ma: 99_750.0,
        long_ma: 95_000.0,
        ..technical(Trend::Up, 0.6, volatility)
    }
}

#[test]
fn test_uptrend_below_resistance_with_bullish_news_buys() {
    let synthesizer = RecommendationSynthesizer::default();
    let news = sentiment(0.5, 0.8, 0.1);

    // Resistance 1% above entry; ATR from well out of range to far wider than the gap
    for atr in [100.0, 500.0, 800.0, 1_000.0, 1_500.0, 5_000.0, 1_000_000.0] {
        let rec = synthesizer.synthesize(&uptrend_below_resistance(atr), &news, 100_000.0);

        let closeness = (1.0 - (1_000.0 / atr) / 2.0).max(0.0);
        // 0.55 trend + 0.35 * 0.6 momentum - 0.1 * closeness
        let expected_technical = 0.76 - 0.1 * closeness;
        assert!((rec.scores.technical - expected_technical).abs() < 1e-9, "atr {}", atr);
        assert!(
            (rec.scores.combined - (0.7 * expected_technical + 0.12)).abs() < 1e-9,
            "atr {}",
            atr
        );

        assert_eq!(rec.action, Action::Buy, "atr {}", atr);
        assert!(rec.confidence > 0.5, "atr {}: confidence {}", atr, rec.confidence);
        assert_eq!(rec.target_price, 101_000.0);
        // No support: two ATRs below entry, floored at 1% of entry
        assert_eq!(rec.stop_loss_price, (100_000.0 - 2.0 * atr).max(1_000.0));
        assert!(rec.rationale[0].starts_with("Uptrend"));
    }
}

#[test]
fn test_buy_near_resistance_is_discounted() {
    let synthesizer = RecommendationSynthesizer::default();
    let news = sentiment(0.5, 0.8, 0.1);
    let open_sky = synthesizer.synthesize(&technical(Trend::Up, 0.6, 500.0), &news, 100_000.0);

    let signal = TechnicalSignal {
        resistance_levels: vec![PriceLevel {
            price: 100_500.0,
            touches: 2,
        }],
        ..technical(Trend::Up, 0.6, 500.0)
    };
    let rec = synthesizer.synthesize(&signal, &news, 100_000.0);

    // One ATR away: closeness 0.5
    assert!((rec.scores.technical - 0.71).abs() < 1e-9);
    assert!((rec.scores.combined - 0.617).abs() < 1e-9);
    assert_eq!(rec.action, Action::Buy);
    assert!((rec.confidence - 0.5553).abs() < 1e-9);
    assert!(rec.confidence < open_sky.confidence);
    assert_eq!(rec.target_price, 100_500.0);
    assert!(
        rec.rationale
            .iter()
            .any(|r| r.starts_with("Price near resistance 100500.00"))
    );
}

#[test]
fn test_buy_near_support_is_reinforced() {
    let synthesizer = RecommendationSynthesizer::default();
    let news = sentiment(0.5, 0.8, 0.1);
    let open_floor = synthesizer.synthesize(&technical(Trend::Up, 0.6, 500.0), &news, 100_000.0);

    let signal = TechnicalSignal {
        support_levels: vec![PriceLevel {
            price: 99_500.0,
            touches: 2,
        }],
        ..technical(Trend::Up, 0.6, 500.0)
    };
    let rec = synthesizer.synthesize(&signal, &news, 100_000.0);

    assert!((rec.scores.technical - 0.81).abs() < 1e-9);
    assert!((rec.scores.combined - 0.687).abs() < 1e-9);
    assert_eq!(rec.action, Action::Buy);
    assert!(rec.confidence > open_floor.confidence);
    assert_eq!(rec.stop_loss_price, 99_500.0);
    // No resistance: two ATRs above entry
    assert_eq!(rec.target_price, 101_000.0);
    assert!(
        rec.rationale
            .iter()
            .any(|r| r.starts_with("Price near support 99500.00"))
    );
}

#[test]
fn test_uptrend_buy_stops_at_nearest_support() {
    let signal = TechnicalSignal {
        support_levels: vec![
            PriceLevel {
                price: 97_000.0,
                touches: 2,
            },
            PriceLevel {
                price: 98_500.0,
                touches: 4,
            },
        ],
        resistance_levels: vec![PriceLevel {
            price: 101_000.0,
            touches: 3,
        }],
        ..technical(Trend::Up, 0.6, 500.0)
    };

    let rec = RecommendationSynthesizer::default().synthesize(
        &signal,
        &sentiment(0.5, 0.8, 0.1),
        100_000.0,
    );

    assert_eq!(rec.action, Action::Buy);
    assert_eq!(rec.stop_loss_price, 98_500.0);
    assert!(rec.stop_loss_price < rec.entry_price);
}

#[test]
fn test_score_exactly_at_threshold_holds() {
    let signal = technical(Trend::Up, 0.2, 1.0);
    let news = sentiment(0.3, 0.5, 0.0);

    let probe = RecommendationSynthesizer::default().synthesize(&signal, &news, 100.0);
    assert!(probe.scores.combined > 0.0);

    let at_threshold = RecommendationSynthesizer::new(FusionConfig {
        action_threshold: probe.scores.combined,
        ..FusionConfig::default()
    });
    let rec = at_threshold.synthesize(&signal, &news, 100.0);
    assert_eq!(rec.action, Action::Hold);

    let mirrored = technical(Trend::Down, -0.2, 1.0);
    let rec = at_threshold.synthesize(&mirrored, &sentiment(-0.3, 0.5, 0.0), 100.0);
    assert!((rec.scores.combined + probe.scores.combined).abs() < 1e-12);
    assert_eq!(rec.action, Action::Hold);
}

#[test]
fn test_action_follows_threshold_over_input_grid() {
    let synthesizer = RecommendationSynthesizer::default();
    let threshold = synthesizer.config().action_threshold;

    for trend in [Trend::Up, Trend::Down, Trend::Flat] {
        for momentum in [-1.0, -0.5, -0.1, 0.0, 0.1, 0.5, 1.0] {
            for polarity in [-1.0, -0.4, 0.0, 0.4, 1.0] {
                for strength in [0.0, 0.5, 1.0] {
                    let rec = synthesizer.synthesize(
                        &technical(trend, momentum, 2.0),
                        &sentiment(polarity, strength, 0.2),
                        50.0,
                    );
                    let combined = rec.scores.combined;
                    if combined.abs() <= threshold {
                        assert_eq!(rec.action, Action::Hold, "combined {}", combined);
                    } else if combined > 0.0 {
                        assert_eq!(rec.action, Action::Buy, "combined {}", combined);
                    } else {
                        assert_eq!(rec.action, Action::Sell, "combined {}", combined);
                    }
                    assert!((0.0..=1.0).contains(&rec.confidence));
                }
            }
        }
    }
}

#[test]
fn test_confidence_never_rises_with_dispersion() {
    let synthesizer = RecommendationSynthesizer::default();
    let signal = technical(Trend::Up, 0.4, 1.0);

    let confidences: Vec<f64> = (0..=10)
        .map(|step| {
            let dispersion = step as f64 / 10.0;
            synthesizer
                .synthesize(&signal, &sentiment(0.5, 0.8, dispersion), 100.0)
                .confidence
        })
        .collect();

    for pair in confidences.windows(2) {
        assert!(pair[1] <= pair[0], "{:?}", confidences);
    }
    assert!(confidences[0] > confidences[10]);
}

#[test]
fn test_downtrend_with_bearish_news_sells() {
    let signal = TechnicalSignal {
        support_levels: vec![PriceLevel {
            price: 95.0,
            touches: 2,
        }],
        ..technical(Trend::Down, -0.7, 1.0)
    };

    let rec = RecommendationSynthesizer::default().synthesize(
        &signal,
        &sentiment(-0.6, 0.9, 0.2),
        100.0,
    );

    assert_eq!(rec.action, Action::Sell);
    assert_eq!(rec.target_price, 95.0);
    assert_eq!(rec.stop_loss_price, 102.0);
    assert!(rec.risk_reward().unwrap() > 2.0);
}
