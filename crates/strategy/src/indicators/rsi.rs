use common::CandleSeries;

/// RSI (Relative Strength Index) indicator.
///
/// Averages the gains and losses of the last `period` close-to-close
/// transitions. Returns `None` until at least `period + 1` candles are
/// available.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiIndicator {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period, overbought, oversold }
    }

    /// Compute RSI over the latest `period` transitions.
    pub fn compute(&self, series: &CandleSeries) -> Option<f64> {
        let window = series.latest_n(self.period + 1)?;

        let (gains, losses) = window
            .windows(2)
            .map(|w| w[1].close - w[0].close)
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change > 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses - change)
                }
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }

    /// Strictly below the oversold band.
    pub fn is_oversold(&self, value: f64) -> bool {
        value < self.oversold
    }

    /// Strictly above the overbought band.
    pub fn is_overbought(&self, value: f64) -> bool {
        value > self.overbought
    }
}
