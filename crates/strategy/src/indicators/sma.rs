use common::CandleSeries;

/// Simple moving average of the most recent closes.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub length: usize,
}

impl SmaIndicator {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "SMA length must be >= 1");
        Self { length }
    }

    /// Mean close of the last `length` candles, or `None` if fewer exist.
    pub fn compute(&self, series: &CandleSeries) -> Option<f64> {
        let window = series.latest_n(self.length)?;
        Some(window.iter().map(|c| c.close).sum::<f64>() / self.length as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;

    #[test]
    fn sma_is_mean_of_last_closes() {
        let series = series_from_closes(&[10.0, 20.0, 30.0], 0.0);
        assert_eq!(SmaIndicator::new(3).compute(&series), Some(20.0));
    }

    #[test]
    fn sma_uses_only_the_latest_window() {
        let series = series_from_closes(&[1000.0, 10.0, 20.0, 30.0], 0.0);
        assert_eq!(SmaIndicator::new(3).compute(&series), Some(20.0));
    }

    #[test]
    fn sma_returns_none_when_insufficient_data() {
        let series = series_from_closes(&[10.0, 20.0], 0.0);
        assert!(SmaIndicator::new(3).compute(&series).is_none());
    }
}
