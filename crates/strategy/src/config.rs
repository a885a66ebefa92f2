use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Config, Error, Result};

/// Scoring config file (TOML).
///
/// Every section is optional and falls back to the defaults below.
///
/// Example `config/scoring.toml`:
/// ```toml
/// [indicators]
/// sma_short = 5
/// sma_long = 20
///
/// [scoring]
/// confidence_ceiling = 95
///
/// [instruments.jpy]
/// pairs = ["USD/JPY", "GBP/JPY"]
/// point_size = 0.01
/// volatility_floor = 0.02
/// volatility_ceiling = 0.5
/// min_stop_points = 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub indicators: IndicatorParams,
    pub scoring: ScoringParams,
    pub learning: LearningConfig,
    pub levels: LevelParams,
    /// Instrument classes keyed by class name ("forex", "jpy", ...).
    pub instruments: BTreeMap<String, InstrumentProfile>,
}

/// Lookback lengths and RSI bands.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 5,
            sma_long: 20,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
        }
    }
}

/// Points added or removed by each scoring step, before weighting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Neutral midpoint every score starts from.
    pub base_score: f64,
    pub trend_points: f64,
    pub rsi_points: f64,
    pub macd_points: f64,
    /// Subtracted when ATR is below the instrument's volatility floor.
    pub low_volatility_penalty: f64,
    /// Subtracted when ATR is above the instrument's volatility ceiling.
    pub high_volatility_penalty: f64,
    /// Series shorter than this are refused outright.
    pub min_candles: usize,
    /// Upper clamp of the confidence score. Never 100% certainty by default.
    pub confidence_ceiling: u8,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            trend_points: 10.0,
            rsi_points: 12.0,
            macd_points: 15.0,
            low_volatility_penalty: 5.0,
            high_volatility_penalty: 10.0,
            min_candles: 20,
            confidence_ceiling: 95,
        }
    }
}

/// Win/loss-ratio rule for one indicator weight.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoostRule {
    /// Ratio must be strictly above this for the boost to apply.
    pub threshold: f64,
    /// Weight used when the rule fires. Must be >= 1.0.
    pub boost: f64,
}

impl BoostRule {
    pub const fn new(threshold: f64, boost: f64) -> Self {
        Self { threshold, boost }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Below this many resolved trades the weights stay at identity.
    pub min_history: usize,
    pub trend: BoostRule,
    pub rsi: BoostRule,
    pub macd: BoostRule,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_history: 10,
            trend: BoostRule::new(1.2, 1.5),
            rsi: BoostRule::new(1.0, 1.2),
            macd: BoostRule::new(1.1, 1.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelParams {
    /// Reward:risk multiple of the stop distance for each take-profit rung,
    /// nearest first. One to three rungs.
    pub reward_risk_ratios: Vec<f64>,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            reward_risk_ratios: vec![2.0],
        }
    }
}

/// Price-scale parameters shared by a class of instruments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstrumentProfile {
    /// Pairs in this class, e.g. "EUR/USD". Matched ignoring case and separators.
    pub pairs: Vec<String>,
    /// Smallest quoted price increment.
    pub point_size: f64,
    /// ATR below this is treated as a flat, unreliable market.
    pub volatility_floor: f64,
    /// ATR above this is treated as whipsaw risk.
    pub volatility_ceiling: f64,
    /// Stop distance never goes below this many points.
    pub min_stop_points: u32,
}

impl InstrumentProfile {
    fn new(
        pairs: &[&str],
        point_size: f64,
        volatility_floor: f64,
        volatility_ceiling: f64,
        min_stop_points: u32,
    ) -> Self {
        Self {
            pairs: pairs.iter().map(|p| p.to_string()).collect(),
            point_size,
            volatility_floor,
            volatility_ceiling,
            min_stop_points,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut instruments = BTreeMap::new();
        instruments.insert(
            "forex".to_string(),
            InstrumentProfile::new(
                &["EUR/USD", "GBP/USD", "EUR/GBP", "GBP/AUD"],
                0.0001,
                0.0002,
                0.005,
                10,
            ),
        );
        instruments.insert(
            "jpy".to_string(),
            InstrumentProfile::new(&["USD/JPY", "GBP/JPY", "EUR/JPY"], 0.01, 0.02, 0.5, 10),
        );
        instruments.insert(
            "metal".to_string(),
            InstrumentProfile::new(&["XAU/USD"], 0.01, 0.05, 1.0, 100),
        );
        instruments.insert(
            "crypto".to_string(),
            InstrumentProfile::new(&["BTC/USD", "ETH/USD"], 0.01, 0.5, 200.0, 100),
        );

        Self {
            indicators: IndicatorParams::default(),
            scoring: ScoringParams::default(),
            learning: LearningConfig::default(),
            levels: LevelParams::default(),
            instruments,
        }
    }
}

impl ScoringConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read scoring config at '{path}': {e}"))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path,
            instruments = config.instruments.len(),
            ceiling = config.scoring.confidence_ceiling,
            "Scoring config loaded"
        );
        Ok(config)
    }

    /// Load from the path named by `SCORING_CONFIG_PATH`.
    pub fn load_from_env() -> Result<Self> {
        Self::load(&Config::from_env().scoring_config_path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the scorer cannot honour.
    pub fn validate(&self) -> Result<()> {
        let ind = &self.indicators;
        let periods = [
            ("sma_short", ind.sma_short),
            ("sma_long", ind.sma_long),
            ("rsi_period", ind.rsi_period),
            ("macd_fast", ind.macd_fast),
            ("macd_slow", ind.macd_slow),
            ("macd_signal", ind.macd_signal),
            ("atr_period", ind.atr_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(Error::Config(format!("indicators.{name} must be > 0")));
        }
        if ind.sma_short >= ind.sma_long {
            return Err(Error::Config("indicators.sma_short must be < sma_long".into()));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(Error::Config("indicators.macd_fast must be < macd_slow".into()));
        }
        if !(0.0..=100.0).contains(&ind.rsi_oversold)
            || !(0.0..=100.0).contains(&ind.rsi_overbought)
            || ind.rsi_oversold >= ind.rsi_overbought
        {
            return Err(Error::Config(
                "indicators.rsi_oversold must be below rsi_overbought, both within 0..=100".into(),
            ));
        }

        if self.scoring.confidence_ceiling > 100 {
            return Err(Error::Config("scoring.confidence_ceiling must be <= 100".into()));
        }
        if self.scoring.min_candles == 0 {
            return Err(Error::Config("scoring.min_candles must be > 0".into()));
        }

        for (name, rule) in [
            ("trend", self.learning.trend),
            ("rsi", self.learning.rsi),
            ("macd", self.learning.macd),
        ] {
            if !(rule.boost >= 1.0) || !rule.threshold.is_finite() {
                return Err(Error::Config(format!(
                    "learning.{name}: boost must be >= 1.0 and threshold finite"
                )));
            }
        }

        let ratios = &self.levels.reward_risk_ratios;
        if ratios.is_empty() || ratios.len() > 3 {
            return Err(Error::Config(
                "levels.reward_risk_ratios needs one to three entries".into(),
            ));
        }
        if ratios.iter().any(|r| !(*r > 0.0)) || ratios.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::Config(
                "levels.reward_risk_ratios must be positive and strictly ascending".into(),
            ));
        }

        let mut owners: HashMap<String, &str> = HashMap::new();
        for (class, profile) in &self.instruments {
            if !(profile.point_size > 0.0) {
                return Err(Error::Config(format!(
                    "instruments.{class}.point_size must be > 0"
                )));
            }
            if !(profile.volatility_floor <= profile.volatility_ceiling) {
                return Err(Error::Config(format!(
                    "instruments.{class}: volatility_floor must not exceed volatility_ceiling"
                )));
            }
            for pair in &profile.pairs {
                if let Some(other) = owners.insert(normalize_pair(pair), class.as_str()) {
                    return Err(Error::Config(format!(
                        "pair '{pair}' is mapped to both '{other}' and '{class}'"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Instrument profile for `pair`, or `ConfigurationMissing`.
    pub fn instrument(&self, pair: &str) -> Result<&InstrumentProfile> {
        let wanted = normalize_pair(pair);
        self.instruments
            .values()
            .find(|profile| profile.pairs.iter().any(|p| normalize_pair(p) == wanted))
            .ok_or_else(|| Error::ConfigurationMissing(pair.to_string()))
    }

    /// Every configured pair, grouped by class name.
    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.instruments
            .values()
            .flat_map(|profile| profile.pairs.iter().map(String::as_str))
    }
}

/// "eur/usd", "EUR_USD" and "EURUSD" all name the same pair.
fn normalize_pair(pair: &str) -> String {
    pair.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
