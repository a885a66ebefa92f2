use std::collections::BTreeMap;

use tracing::{info, warn};

use common::{Candle, CandleSeries, Result, SignalReport};

use crate::config::ScoringConfig;
use crate::scorer::SignalScorer;
use crate::weights::WeightVector;

/// Rolling per-pair candle windows and a batch scan over all of them.
pub struct CandleRegistry {
    /// Per-pair window of closed candles, oldest first.
    series: BTreeMap<String, CandleSeries>,
    max_history: usize,
}

impl CandleRegistry {
    pub const DEFAULT_MAX_HISTORY: usize = 200;

    pub fn new(max_history: usize) -> Self {
        Self {
            series: BTreeMap::new(),
            max_history: max_history.max(1),
        }
    }

    /// Registry with an empty window for every configured pair, so pairs with
    /// no data yet still show up (as insufficient) in `scan`.
    pub fn from_config(config: &ScoringConfig) -> Self {
        let mut registry = Self::new(Self::DEFAULT_MAX_HISTORY);
        for pair in config.pairs() {
            registry.series.entry(pair.to_string()).or_default();
            info!(pair = %pair, "Registered pair");
        }
        registry
    }

    /// Append one closed candle to `pair`'s window, dropping the oldest beyond
    /// `max_history`.
    pub fn push(&mut self, pair: &str, candle: Candle) -> Result<()> {
        let series = self.series.entry(pair.to_string()).or_default();
        series.push(candle)?;
        series.retain_latest(self.max_history);
        Ok(())
    }

    /// Swap in a freshly fetched series for `pair`.
    pub fn replace(&mut self, pair: &str, mut series: CandleSeries) {
        series.retain_latest(self.max_history);
        self.series.insert(pair.to_string(), series);
    }

    pub fn series(&self, pair: &str) -> Option<&CandleSeries> {
        self.series.get(pair)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Score every pair in name order. A failing pair yields an invalid report
    /// and the scan moves on.
    pub fn scan(&self, scorer: &SignalScorer, weights: &WeightVector) -> Vec<SignalReport> {
        self.series
            .iter()
            .map(|(pair, series)| {
                let report = scorer.report(pair, series, weights);
                if let SignalReport::Invalid { reason, detail, .. } = &report {
                    warn!(pair = %pair, reason = %reason, detail = %detail, "Pair not scored");
                }
                report
            })
            .collect()
    }
}

impl Default for CandleRegistry {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;
    use common::FailureReason;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 2400.0 + i as f64).collect()
    }

    #[test]
    fn push_caps_history() {
        let mut registry = CandleRegistry::new(5);
        for candle in series_from_closes(&rising(8), 0.1).candles() {
            registry.push("XAU/USD", *candle).unwrap();
        }
        let series = registry.series("XAU/USD").unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.latest().unwrap().close, 2407.0);
    }

    #[test]
    fn push_rejects_out_of_order_candle() {
        let mut registry = CandleRegistry::default();
        let candles = series_from_closes(&rising(2), 0.1);
        registry.push("XAU/USD", candles.candles()[1]).unwrap();
        assert!(registry.push("XAU/USD", candles.candles()[0]).is_err());
    }

    #[test]
    fn from_config_registers_every_pair() {
        let config = ScoringConfig::default();
        let registry = CandleRegistry::from_config(&config);
        assert_eq!(registry.pairs().count(), config.pairs().count());
        assert!(registry.series("USD/JPY").unwrap().is_empty());
    }

    #[test]
    fn scan_continues_past_failures() {
        let config = ScoringConfig::default();
        let scorer = SignalScorer::new(config.clone()).unwrap();
        let mut registry = CandleRegistry::from_config(&config);
        registry.replace("XAU/USD", series_from_closes(&rising(30), 0.5));
        registry.replace("DOGE/USD", series_from_closes(&rising(30), 0.5));

        let reports = registry.scan(&scorer, &WeightVector::identity());
        let gold = reports.iter().find(|r| r.pair() == "XAU/USD").unwrap();
        assert!(gold.is_valid());
        let doge = reports.iter().find(|r| r.pair() == "DOGE/USD").unwrap();
        assert_eq!(doge.reason(), Some(FailureReason::Unconfigured));
        let yen = reports.iter().find(|r| r.pair() == "USD/JPY").unwrap();
        assert_eq!(yen.reason(), Some(FailureReason::Insufficient));
        assert_eq!(reports.len(), registry.pairs().count());
    }
}
