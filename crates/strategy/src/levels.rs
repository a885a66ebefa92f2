use common::Direction;

use crate::config::InstrumentProfile;

/// Stop and take-profit prices for one directional signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLevels {
    /// Stop distance in price units (a whole number of points).
    pub stop_distance: f64,
    pub stop_loss: f64,
    /// Nearest first.
    pub take_profit: Vec<f64>,
}

/// ATR-sized stop, at least `min_stop_points` wide, with take-profits at
/// `ratio × stop distance` in the signal's direction.
///
/// Returns `None` for NONE. Without an ATR reading the stop falls back to the
/// instrument minimum.
pub fn price_levels(
    entry: f64,
    direction: Direction,
    atr: Option<f64>,
    profile: &InstrumentProfile,
    reward_risk_ratios: &[f64],
) -> Option<PriceLevels> {
    if direction == Direction::Neutral {
        return None;
    }

    let min_points = f64::from(profile.min_stop_points);
    let stop_points = atr
        .map(|atr| (atr / profile.point_size).round().max(min_points))
        .unwrap_or(min_points);
    let stop_distance = stop_points * profile.point_size;
    let sign = direction.sign();

    Some(PriceLevels {
        stop_distance,
        stop_loss: entry - sign * stop_distance,
        take_profit: reward_risk_ratios
            .iter()
            .map(|ratio| entry + sign * ratio * stop_distance)
            .collect(),
    })
}
