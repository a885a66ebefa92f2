use serde::{Deserialize, Serialize};

use common::CandleSeries;

/// How often the close finished above the SMA known one bar earlier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub wins: usize,
    pub losses: usize,
    /// Bars scored, `wins + losses`. The first `period + 1` candles only seed
    /// the average, so this is less than the series length.
    pub evaluated: usize,
    /// `wins / evaluated * 100`.
    pub win_rate_pct: f64,
}

/// Walk the series and count bars closing above the prior bar's SMA.
///
/// For bar `i` the SMA covers the `period` closes ending at `i - 2`, i.e. the
/// average that was available when bar `i - 1` closed. A close above it is a
/// win, anything else a loss. `None` if no bar qualifies.
pub fn sma_hit_rate(series: &CandleSeries, period: usize) -> Option<BacktestSummary> {
    if period == 0 {
        return None;
    }
    let closes = series.closes();

    let (wins, losses) = (period + 1..closes.len()).fold((0, 0), |(wins, losses), i| {
        let window = &closes[i - 1 - period..i - 1];
        let sma = window.iter().sum::<f64>() / period as f64;
        if closes[i] > sma {
            (wins + 1, losses)
        } else {
            (wins, losses + 1)
        }
    });

    let evaluated = wins + losses;
    if evaluated == 0 {
        return None;
    }
    Some(BacktestSummary {
        wins,
        losses,
        evaluated,
        win_rate_pct: wins as f64 / evaluated as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;

    #[test]
    fn too_short_series_has_no_summary() {
        let series = series_from_closes(&[100.0; 15], 0.1);
        assert!(sma_hit_rate(&series, 14).is_none());
    }

    #[test]
    fn rising_series_wins_every_bar() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let series = series_from_closes(&closes, 0.1);
        let summary = sma_hit_rate(&series, 14).unwrap();
        // the first period + 1 candles only seed the average
        assert_eq!(summary.evaluated, series.len() - 15);
        assert_eq!(summary.losses, 0);
        assert_eq!(summary.win_rate_pct, 100.0);
    }

    #[test]
    fn flat_series_loses_every_bar() {
        let summary = sma_hit_rate(&series_from_closes(&[100.0; 20], 0.1), 14).unwrap();
        assert_eq!(summary.wins, 0);
        assert_eq!(summary.losses, 5);
        assert_eq!(summary.win_rate_pct, 0.0);
    }

    #[test]
    fn uses_the_sma_from_one_bar_earlier() {
        // period 2: bar 3 compares against mean(closes[0..2]) = 15
        let series = series_from_closes(&[10.0, 20.0, 100.0, 16.0], 0.0);
        let summary = sma_hit_rate(&series, 2).unwrap();
        assert_eq!(summary.evaluated, 1);
        assert_eq!(summary.wins, 1);
    }
}
