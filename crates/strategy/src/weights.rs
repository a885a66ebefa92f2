use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use common::{TradeHistory, TradeOutcome, TradeResult};

use crate::config::{BoostRule, LearningConfig};

/// Multipliers applied to each indicator's score contribution. Always >= 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub trend: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl WeightVector {
    pub const fn identity() -> Self {
        Self {
            trend: 1.0,
            rsi: 1.0,
            macd: 1.0,
        }
    }

    /// Every component raised to at least 1.0. NaN becomes 1.0.
    pub fn amplifying(&self) -> Self {
        Self {
            trend: self.trend.max(1.0),
            rsi: self.rsi.max(1.0),
            macd: self.macd.max(1.0),
        }
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::identity()
    }
}

impl BoostRule {
    fn weight(&self, ratio: f64) -> f64 {
        if ratio > self.threshold {
            self.boost.max(1.0)
        } else {
            1.0
        }
    }
}

/// Derive indicator weights from the win/loss ratio of resolved trades.
///
/// Open trades are ignored. With fewer than `min_history` resolved trades the
/// result is the identity vector.
pub fn derive_weights(history: &[TradeOutcome], config: &LearningConfig) -> WeightVector {
    let resolved: Vec<TradeResult> = history.iter().filter_map(|o| o.result).collect();
    if resolved.len() < config.min_history {
        debug!(
            resolved = resolved.len(),
            required = config.min_history,
            "Trade history too thin, using identity weights"
        );
        return WeightVector::identity();
    }

    let wins = resolved.iter().filter(|r| **r == TradeResult::Win).count();
    let losses = resolved.len() - wins;
    let ratio = wins as f64 / losses.max(1) as f64;

    let weights = WeightVector {
        trend: config.trend.weight(ratio),
        rsi: config.rsi.weight(ratio),
        macd: config.macd.weight(ratio),
    };
    debug!(wins, losses, ratio, ?weights, "Weights derived from trade history");
    weights
}

/// Read a history snapshot and derive weights from it.
///
/// A failed read degrades to identity weights so scoring stays available.
pub async fn load_weights(history: &dyn TradeHistory, config: &LearningConfig) -> WeightVector {
    match history.load().await {
        Ok(outcomes) => derive_weights(&outcomes, config),
        Err(e) => {
            warn!(error = %e, "Trade history unreadable, using identity weights");
            WeightVector::identity()
        }
    }
}
