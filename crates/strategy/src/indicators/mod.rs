//! Indicator library.
//!
//! Every indicator reads a [`CandleSeries`] (oldest first) and returns `None`
//! when the series is too short. No rounding happens here.

pub mod atr;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::AtrIndicator;
pub use macd::MacdIndicator;
pub use rsi::RsiIndicator;
pub use sma::SmaIndicator;

use common::{CandleSeries, IndicatorSet};

use crate::config::IndicatorParams;

/// Absolute gap between the short and long moving averages.
pub fn trend_strength(sma_short: Option<f64>, sma_long: Option<f64>) -> Option<f64> {
    Some((sma_short? - sma_long?).abs())
}

impl IndicatorParams {
    pub fn rsi(&self) -> RsiIndicator {
        RsiIndicator::new(self.rsi_period, self.rsi_overbought, self.rsi_oversold)
    }

    pub fn macd(&self) -> MacdIndicator {
        MacdIndicator::new(self.macd_fast, self.macd_slow, self.macd_signal)
    }

    /// Compute the full snapshot for one series.
    pub fn compute(&self, series: &CandleSeries) -> IndicatorSet {
        let sma_short = SmaIndicator::new(self.sma_short).compute(series);
        let sma_long = SmaIndicator::new(self.sma_long).compute(series);
        IndicatorSet {
            sma_short,
            sma_long,
            rsi: self.rsi().compute(series),
            macd: self.macd().compute(series),
            atr: AtrIndicator::new(self.atr_period).compute(series),
            trend_strength: trend_strength(sma_short, sma_long),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::series_from_closes;
    use super::*;

    #[test]
    fn trend_strength_needs_both_inputs() {
        assert_eq!(trend_strength(Some(10.0), Some(12.5)), Some(2.5));
        assert_eq!(trend_strength(None, Some(12.5)), None);
        assert_eq!(trend_strength(Some(10.0), None), None);
    }

    #[test]
    fn snapshot_marks_short_lookbacks_indeterminate() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorParams::default().compute(&series_from_closes(&closes, 0.1));
        assert!(set.sma_short.is_some());
        assert!(set.sma_long.is_some());
        assert!(set.rsi.is_some());
        assert!(set.atr.is_some());
        assert!(set.trend_strength.is_some());
        // 20 candles < macd_slow (26)
        assert!(set.macd.is_none());
    }

    #[test]
    fn empty_series_is_fully_indeterminate() {
        let set = IndicatorParams::default().compute(&CandleSeries::default());
        assert_eq!(set, IndicatorSet::default());
    }
}
