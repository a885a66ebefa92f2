use tracing::debug;

use common::{CandleSeries, Direction, Error, IndicatorSet, Result, Signal, SignalReport};

use crate::config::{InstrumentProfile, ScoringConfig};
use crate::levels::price_levels;
use crate::weights::WeightVector;

/// MACD histograms within this fraction of price are rounding residue, not a
/// reading. A perfectly linear trend lands here.
const MACD_NOISE: f64 = f64::EPSILON * 1e3;

/// Turns a candle series plus indicator weights into a [`Signal`].
///
/// Holds only validated configuration; `score` is a pure function of its
/// arguments, so one scorer can be shared across threads and pairs.
#[derive(Debug, Clone)]
pub struct SignalScorer {
    config: ScoringConfig,
}

impl SignalScorer {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `series` for `pair`.
    ///
    /// Fails with `InsufficientData` below `min_candles` and with
    /// `ConfigurationMissing` when `pair` has no instrument profile.
    pub fn score(&self, pair: &str, series: &CandleSeries, weights: &WeightVector) -> Result<Signal> {
        let required = self.config.scoring.min_candles;
        let insufficient = || Error::InsufficientData {
            required,
            available: series.len(),
        };
        if series.len() < required {
            return Err(insufficient());
        }
        let latest = series.latest().ok_or_else(insufficient)?;
        let profile = self.config.instrument(pair)?;

        let indicators = self.config.indicators.compute(series);
        let direction = trend_direction(&indicators);
        let raw_score = self.raw_score(direction, latest.close, &indicators, profile, weights);
        let confidence = raw_score
            .round()
            .clamp(0.0, f64::from(self.config.scoring.confidence_ceiling)) as u8;

        let levels = price_levels(
            latest.close,
            direction,
            indicators.atr,
            profile,
            &self.config.levels.reward_risk_ratios,
        );

        debug!(
            pair = %pair,
            direction = %direction,
            raw_score,
            confidence,
            sma_short = ?indicators.sma_short,
            sma_long = ?indicators.sma_long,
            rsi = ?indicators.rsi,
            macd = ?indicators.macd.map(|m| m.histogram),
            atr = ?indicators.atr,
            "Signal scored"
        );

        Ok(Signal {
            pair: pair.to_string(),
            direction,
            confidence,
            entry: latest.close,
            stop_loss: levels.as_ref().map(|l| l.stop_loss),
            take_profit: levels.map(|l| l.take_profit).unwrap_or_default(),
            as_of: latest.time,
            indicators,
        })
    }

    /// `score`, folded into the tagged form handed to presentation code.
    pub fn report(&self, pair: &str, series: &CandleSeries, weights: &WeightVector) -> SignalReport {
        SignalReport::from_result(pair, self.score(pair, series, weights))
    }

    /// Unclamped score. Every step whose indicator is indeterminate is skipped.
    fn raw_score(
        &self,
        direction: Direction,
        price: f64,
        indicators: &IndicatorSet,
        profile: &InstrumentProfile,
        weights: &WeightVector,
    ) -> f64 {
        let params = &self.config.scoring;
        let mut score = params.base_score;

        // NONE ends scoring at the neutral base
        if direction == Direction::Neutral {
            return score;
        }
        let weights = weights.amplifying();
        score += params.trend_points * weights.trend;

        // RSI only confirms the trend, it never starts a call on its own
        if let Some(rsi) = indicators.rsi {
            let bands = self.config.indicators.rsi();
            let confirms = match direction {
                Direction::Buy => bands.is_oversold(rsi),
                Direction::Sell => bands.is_overbought(rsi),
                Direction::Neutral => false,
            };
            if confirms {
                score += params.rsi_points * weights.rsi;
            }
        }

        if let Some(macd) = indicators.macd {
            if macd.histogram * direction.sign() > MACD_NOISE * price.abs() {
                score += params.macd_points * weights.macd;
            }
        }

        if let Some(atr) = indicators.atr {
            if atr < profile.volatility_floor {
                score -= params.low_volatility_penalty;
            }
            if atr > profile.volatility_ceiling {
                score -= params.high_volatility_penalty;
            }
        }

        score
    }
}

/// BUY when the short SMA is above the long one, SELL when below, NONE when
/// they are equal or either is indeterminate.
fn trend_direction(indicators: &IndicatorSet) -> Direction {
    match (indicators.sma_short, indicators.sma_long) {
        (Some(short), Some(long)) if short > long => Direction::Buy,
        (Some(short), Some(long)) if short < long => Direction::Sell,
        _ => Direction::Neutral,
    }
}
