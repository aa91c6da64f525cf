use crate::domain::signal::PriceLevel;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Minimum,
    Maximum,
}

/// Closes that dominate their `k` neighbours on each side.
///
/// A point must be at least as extreme as every neighbour and strictly more
/// extreme than one of them, so flat plateaus do not count.
pub fn local_extrema(closes: &[f64], k: usize, kind: ExtremumKind) -> Vec<f64> {
    if k == 0 || closes.len() < 2 * k + 1 {
        return Vec::new();
    }

    let mut extrema = Vec::new();
    for i in k..closes.len() - k {
        let center = closes[i];
        let neighbours = closes[i - k..i].iter().chain(&closes[i + 1..=i + k]);

        let mut dominates_all = true;
        let mut strictly_beats_one = false;
        for &other in neighbours {
            let (holds, strict) = match kind {
                ExtremumKind::Minimum => (center <= other, center < other),
                ExtremumKind::Maximum => (center >= other, center > other),
            };
            dominates_all &= holds;
            strictly_beats_one |= strict;
        }

        if dominates_all && strictly_beats_one {
            extrema.push(center);
        }
    }
    extrema
}

#[derive(Debug, Clone, Copy)]
struct Cluster {
    sum: f64,
    touches: usize,
}

impl Cluster {
    fn center(&self) -> f64 {
        self.sum / self.touches as f64
    }

    fn absorb(&mut self, other: Cluster) {
        self.sum += other.sum;
        self.touches += other.touches;
    }
}

/// Groups extrema into price levels.
///
/// Adjacent clusters whose centres are within `tolerance` are merged until
/// every gap exceeds it. The `max_levels` most-touched clusters are kept and
/// returned in ascending price order.
pub fn cluster_levels(extrema: &[f64], tolerance: f64, max_levels: usize) -> Vec<PriceLevel> {
    let mut prices: Vec<f64> = extrema.iter().copied().filter(|p| p.is_finite()).collect();
    prices.sort_by(|a, b| a.total_cmp(b));

    let mut clusters: Vec<Cluster> = prices
        .into_iter()
        .map(|p| Cluster { sum: p, touches: 1 })
        .collect();

    loop {
        let closest = clusters
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i, w[1].center() - w[0].center()))
            .filter(|(_, gap)| *gap <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match closest {
            Some((i, _)) => {
                let right = clusters.remove(i + 1);
                clusters[i].absorb(right);
            }
            None => break,
        }
    }

    let mut levels: Vec<PriceLevel> = clusters
        .iter()
        .map(|c| PriceLevel {
            price: c.center(),
            touches: c.touches,
        })
        .collect();

    // Most touched first, lower price wins ties
    levels.sort_by(|a, b| match b.touches.cmp(&a.touches) {
        Ordering::Equal => a.price.total_cmp(&b.price),
        other => other,
    });
    levels.truncate(max_levels);
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));
    levels
}
