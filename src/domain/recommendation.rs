use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Intermediate scores the decision was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// In [-1, 1]
    pub technical: f64,
    /// Polarity × strength, in [-1, 1]
    pub sentiment: f64,
    /// Weighted fusion of the two
    pub combined: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    /// In [0, 1]
    pub confidence: f64,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss_price: f64,
    /// Contributing factors, largest contribution first
    pub rationale: Vec<String>,
    pub scores: ScoreBreakdown,
}

impl Recommendation {
    /// Percentage move from entry to target.
    pub fn target_pct(&self) -> f64 {
        pct_from(self.entry_price, self.target_price)
    }

    /// Percentage move from entry to stop-loss.
    pub fn stop_pct(&self) -> f64 {
        pct_from(self.entry_price, self.stop_loss_price)
    }

    /// Reward per unit of risk. `None` for hold or when the stop sits on the entry.
    pub fn risk_reward(&self) -> Option<f64> {
        let (reward, risk) = match self.action {
            Action::Hold => return None,
            Action::Buy => (
                self.target_price - self.entry_price,
                self.entry_price - self.stop_loss_price,
            ),
            Action::Sell => (
                self.entry_price - self.target_price,
                self.stop_loss_price - self.entry_price,
            ),
        };

        if risk <= 0.0 {
            return None;
        }
        Some(reward / risk)
    }
}

fn pct_from(entry: f64, price: f64) -> f64 {
    if entry == 0.0 {
        return 0.0;
    }
    (price - entry) / entry * 100.0
}
