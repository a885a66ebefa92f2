pub mod backtest;
pub mod config;
pub mod indicators;
pub mod levels;
pub mod registry;
pub mod scorer;
pub mod weights;

pub use backtest::{sma_hit_rate, BacktestSummary};
pub use config::{
    BoostRule, IndicatorParams, InstrumentProfile, LearningConfig, LevelParams, ScoringConfig,
    ScoringParams,
};
pub use indicators::trend_strength;
pub use levels::{price_levels, PriceLevels};
pub use registry::CandleRegistry;
pub use scorer::SignalScorer;
pub use weights::{derive_weights, load_weights, WeightVector};
