use chrono::{DateTime, Utc};
use serde::Serializer;
use serde::{Deserialize, Serialize};

use crate::{Error, FailureReason, Result};

/// One OHLC price bar for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Reject bars that must never reach an indicator recurrence.
    pub fn validate(&self) -> Result<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        if let Some((field, value)) = prices.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "candle at {} has non-finite {field}: {value}",
                self.time
            )));
        }
        if self.high < self.low {
            return Err(Error::InvalidInput(format!(
                "candle at {} has high {} below low {}",
                self.time, self.high, self.low
            )));
        }
        let in_range = |v: f64| v >= self.low && v <= self.high;
        if !in_range(self.open) || !in_range(self.close) {
            return Err(Error::InvalidInput(format!(
                "candle at {} has open/close outside its high-low range",
                self.time
            )));
        }
        Ok(())
    }
}

/// How a caller's candle slice is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    OldestFirst,
    NewestFirst,
}

/// A validated candle sequence, always held oldest-first.
///
/// The orientation is declared once at construction. Indicators only ever see
/// this type, so nothing downstream has to guess which end is "latest".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Normalise `candles` to oldest-first and validate every bar.
    ///
    /// Fails with `InvalidInput` on a malformed bar or when timestamps are not
    /// strictly increasing after normalisation (a wrongly declared orientation
    /// shows up here).
    pub fn new(mut candles: Vec<Candle>, orientation: Orientation) -> Result<Self> {
        if orientation == Orientation::NewestFirst {
            candles.reverse();
        }
        for candle in &candles {
            candle.validate()?;
        }
        if let Some(w) = candles.windows(2).find(|w| w[1].time <= w[0].time) {
            return Err(Error::InvalidInput(format!(
                "candle times not strictly increasing oldest-first: {} then {}",
                w[0].time, w[1].time
            )));
        }
        Ok(Self { candles })
    }

    /// Append a newer candle, keeping the oldest-first invariant.
    pub fn push(&mut self, candle: Candle) -> Result<()> {
        candle.validate()?;
        if let Some(last) = self.candles.last() {
            if candle.time <= last.time {
                return Err(Error::InvalidInput(format!(
                    "candle at {} is not newer than latest {}",
                    candle.time, last.time
                )));
            }
        }
        self.candles.push(candle);
        Ok(())
    }

    /// Drop the oldest candles until at most `max_len` remain.
    pub fn retain_latest(&mut self, max_len: usize) {
        if self.candles.len() > max_len {
            let excess = self.candles.len() - max_len;
            self.candles.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// All candles, oldest first.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// The most recent `n` candles (oldest first), or `None` if fewer exist.
    pub fn latest_n(&self, n: usize) -> Option<&[Candle]> {
        let len = self.candles.len();
        (n <= len).then(|| &self.candles[len - n..])
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Directional call of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[default]
    #[serde(rename = "NONE")]
    Neutral,
}

impl Direction {
    /// +1 for BUY, -1 for SELL, 0 for NONE.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
            Direction::Neutral => 0.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::Neutral => write!(f, "NONE"),
        }
    }
}

/// MACD line, its signal line and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub value: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Indicator snapshot used to score one signal. `None` = indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdReading>,
    pub atr: Option<f64>,
    pub trend_strength: Option<f64>,
}

/// A scored trading signal. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub pair: String,
    pub direction: Direction,
    /// Bounded score in `[0, confidence_ceiling]`, not a probability.
    pub confidence: u8,
    /// Close of the latest candle.
    pub entry: f64,
    pub stop_loss: Option<f64>,
    /// Take-profit ladder, nearest first. Empty when direction is NONE.
    pub take_profit: Vec<f64>,
    /// Time of the latest candle the signal was computed from.
    pub as_of: DateTime<Utc>,
    pub indicators: IndicatorSet,
}

/// Outcome of one scoring call as handed to the presentation layer.
///
/// Serialises flat: `{"valid": true, ...signal}` or
/// `{"valid": false, "pair": .., "reason": "insufficient", "detail": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalReport {
    Valid(Signal),
    Invalid {
        pair: String,
        reason: FailureReason,
        detail: String,
    },
}

impl SignalReport {
    pub fn from_result(pair: &str, result: Result<Signal>) -> Self {
        match result {
            Ok(signal) => SignalReport::Valid(signal),
            Err(e) => SignalReport::Invalid {
                pair: pair.to_string(),
                reason: e.reason(),
                detail: e.to_string(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SignalReport::Valid(_))
    }

    pub fn pair(&self) -> &str {
        match self {
            SignalReport::Valid(signal) => &signal.pair,
            SignalReport::Invalid { pair, .. } => pair,
        }
    }

    pub fn signal(&self) -> Option<&Signal> {
        match self {
            SignalReport::Valid(signal) => Some(signal),
            SignalReport::Invalid { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            SignalReport::Valid(_) => None,
            SignalReport::Invalid { reason, .. } => Some(*reason),
        }
    }
}

impl Serialize for SignalReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct ValidOut<'a> {
            valid: bool,
            #[serde(flatten)]
            signal: &'a Signal,
        }

        #[derive(Serialize)]
        struct InvalidOut<'a> {
            valid: bool,
            pair: &'a str,
            reason: FailureReason,
            detail: &'a str,
        }

        match self {
            SignalReport::Valid(signal) => ValidOut { valid: true, signal }.serialize(serializer),
            SignalReport::Invalid { pair, reason, detail } => InvalidOut {
                valid: false,
                pair,
                reason: *reason,
                detail,
            }
            .serialize(serializer),
        }
    }
}

/// Realised result of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

/// One trade record in the outcome history. `result == None` while open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub id: String,
    pub pair: String,
    pub direction: Direction,
    pub entry: f64,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub result: Option<TradeResult>,
}

impl TradeOutcome {
    pub fn open(
        pair: impl Into<String>,
        direction: Direction,
        entry: f64,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pair: pair.into(),
            direction,
            entry,
            opened_at,
            result: None,
        }
    }

    /// Open a record for a tradeable signal. NONE signals are not trades.
    pub fn from_signal(signal: &Signal) -> Result<Self> {
        if signal.direction == Direction::Neutral {
            return Err(Error::InvalidInput(format!(
                "signal for {} has no direction to record",
                signal.pair
            )));
        }
        Ok(Self::open(
            signal.pair.clone(),
            signal.direction,
            signal.entry,
            signal.as_of,
        ))
    }

    pub fn with_result(mut self, result: TradeResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }
}
