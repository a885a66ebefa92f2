use common::{Candle, CandleSeries};

/// ATR (Average True Range) indicator.
///
/// Plain mean of the true ranges of the last `period` candles:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
#[derive(Debug, Clone)]
pub struct AtrIndicator {
    pub period: usize,
}

impl AtrIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }

    /// Returns `None` if there are fewer than `period + 1` candles.
    pub fn compute(&self, series: &CandleSeries) -> Option<f64> {
        let window = series.latest_n(self.period + 1)?;
        let total: f64 = window.windows(2).map(|w| true_range(&w[1], &w[0])).sum();
        Some(total / self.period as f64)
    }
}

fn true_range(current: &Candle, previous: &Candle) -> f64 {
    let hl = current.high - current.low;
    let hc = (current.high - previous.close).abs();
    let lc = (current.low - previous.close).abs();
    hl.max(hc).max(lc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;
    use chrono::{Duration, TimeZone, Utc};
    use common::Orientation;

    #[test]
    fn atr_insufficient_data() {
        let series = series_from_closes(&[100.0; 14], 1.0);
        assert!(AtrIndicator::new(14).compute(&series).is_none());
    }

    #[test]
    fn atr_flat_bars_equal_their_range() {
        // no gaps: every TR is high - low = 2 * spread
        let series = series_from_closes(&[100.0; 15], 0.5);
        let atr = AtrIndicator::new(14).compute(&series).unwrap();
        assert!((atr - 1.0).abs() < 1e-12, "ATR {atr}");
    }

    #[test]
    fn atr_counts_gap_from_previous_close() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let bar = |i: i64, low: f64, high: f64, close: f64| Candle {
            time: start + Duration::minutes(i),
            open: close,
            high,
            low,
            close,
        };
        // second bar gaps up: TR = |12 - 9| = 3, third: high-low = 1
        let series = CandleSeries::new(
            vec![bar(0, 8.0, 10.0, 9.0), bar(1, 11.0, 12.0, 11.5), bar(2, 11.0, 12.0, 11.5)],
            Orientation::OldestFirst,
        )
        .unwrap();
        let atr = AtrIndicator::new(2).compute(&series).unwrap();
        assert!((atr - 2.0).abs() < 1e-12, "ATR {atr}");
    }

    #[test]
    fn atr_positive_on_trend() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 1.5).collect();
        let atr = AtrIndicator::new(14).compute(&series_from_closes(&closes, 1.0)).unwrap();
        assert!(atr > 0.0, "ATR should be positive, got {atr}");
    }
}
