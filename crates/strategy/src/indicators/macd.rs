use common::{CandleSeries, MacdReading};

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// MACD line = EMA(fast) − EMA(slow) for every bar where the slow EMA exists.
/// Signal line = EMA(signal) of that trailing MACD line. Histogram = MACD − signal.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(
            fast < slow,
            "MACD fast period must be less than slow period"
        );
        Self { fast, slow, signal }
    }

    /// Compute the latest MACD reading.
    /// Returns `None` if the series is shorter than `slow`.
    ///
    /// With fewer than `signal` MACD values available, the signal line is
    /// the mean of the ones there are.
    pub fn compute(&self, series: &CandleSeries) -> Option<MacdReading> {
        let closes = series.closes();
        if closes.len() < self.slow {
            return None;
        }

        let fast = ema_series(&closes, self.fast);
        let slow = ema_series(&closes, self.slow);

        // fast[j] belongs to bar `fast - 1 + j`, slow[j] to bar `slow - 1 + j`
        let offset = self.slow - self.fast;
        let macd_line: Vec<f64> = slow
            .iter()
            .enumerate()
            .map(|(j, slow_ema)| fast[j + offset] - slow_ema)
            .collect();

        let value = *macd_line.last()?;
        let signal_line = ema(&macd_line, self.signal)?;

        Some(MacdReading {
            value,
            signal_line,
            histogram: value - signal_line,
        })
    }
}

/// EMA of `data` at every bar from `period - 1` onwards.
///
/// Seeded with the SMA of the first `period` values, then
/// `ema = (price - ema) * k + ema` with `k = 2 / (period + 1)`.
/// Empty if `data` is shorter than `period`.
fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = data[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(data.len() - period + 1);
    out.push(seed);
    let mut ema_val = seed;
    for &price in &data[period..] {
        ema_val = (price - ema_val) * k + ema_val;
        out.push(ema_val);
    }
    out
}

/// Latest EMA of `data`, seeding with the mean of up to `period` leading values.
fn ema(data: &[f64], period: usize) -> Option<f64> {
    if data.is_empty() || period == 0 {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed_len = period.min(data.len());
    let mut ema_val = data[..seed_len].iter().sum::<f64>() / seed_len as f64;

    for &value in &data[seed_len..] {
        ema_val = (value - ema_val) * k + ema_val;
    }
    Some(ema_val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    fn accelerating_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i * i) as f64 * 0.01).collect()
    }

    #[test]
    fn macd_returns_none_with_insufficient_data() {
        let macd = MacdIndicator::new(12, 26, 9);
        let series = series_from_closes(&trending_up(25), 0.1);
        assert!(macd.compute(&series).is_none());
    }

    #[test]
    fn macd_returns_some_at_exactly_slow_candles() {
        let macd = MacdIndicator::new(12, 26, 9);
        let reading = macd.compute(&series_from_closes(&trending_up(26), 0.1)).unwrap();
        // one MACD value, so the signal line is that value
        assert_eq!(reading.signal_line, reading.value);
        assert_eq!(reading.histogram, 0.0);
    }

    #[test]
    fn macd_known_value() {
        // EMA2: 1.5, 2.5, 3.5, 5.1667 / EMA3: 2, 3, 4.5
        // MACD line: 0.5, 0.5, 0.6667 → signal EMA2: 0.5 then 0.6111
        let macd = MacdIndicator::new(2, 3, 2);
        let reading = macd
            .compute(&series_from_closes(&[1.0, 2.0, 3.0, 4.0, 6.0], 0.0))
            .unwrap();
        assert!((reading.value - 2.0 / 3.0).abs() < 1e-9, "value {}", reading.value);
        assert!((reading.signal_line - 0.611_111_111).abs() < 1e-6);
        assert!((reading.histogram - 0.055_555_555).abs() < 1e-6);
    }

    #[test]
    fn macd_histogram_flat_on_linear_trend() {
        // SMA-seeded EMAs track a straight line with constant lag
        let macd = MacdIndicator::new(12, 26, 9);
        let reading = macd.compute(&series_from_closes(&trending_up(60), 0.1)).unwrap();
        assert!(reading.value > 0.0);
        assert!(reading.histogram.abs() < 1e-9, "histogram {}", reading.histogram);
    }

    #[test]
    fn macd_histogram_positive_on_accelerating_rise() {
        let macd = MacdIndicator::new(12, 26, 9);
        let reading = macd.compute(&series_from_closes(&accelerating_up(60), 0.1)).unwrap();
        assert!(reading.value > 0.0);
        assert!(reading.histogram > 0.0, "histogram {}", reading.histogram);
    }

    #[test]
    fn macd_histogram_negative_on_accelerating_fall() {
        let macd = MacdIndicator::new(12, 26, 9);
        let closes: Vec<f64> = accelerating_up(60).iter().map(|c| 200.0 - c).collect();
        let reading = macd.compute(&series_from_closes(&closes, 0.1)).unwrap();
        assert!(reading.value < 0.0);
        assert!(reading.histogram < 0.0, "histogram {}", reading.histogram);
    }
}
