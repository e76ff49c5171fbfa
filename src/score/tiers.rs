// src/score/tiers.rs
use crate::config::consts::{CP_HIGH_TIER_POINTS, CP_LOW_TIER_POINTS, CP_TIER_THRESHOLD};

use super::Points;

/// Cumulative points for `cp` raw conservation: 2 each up to the threshold, 3 each after.
pub fn points(cp: u32) -> Points {
    let cp = Points::from(cp);
    let threshold = Points::from(CP_TIER_THRESHOLD);
    if cp <= threshold {
        cp * CP_LOW_TIER_POINTS
    } else {
        threshold * CP_LOW_TIER_POINTS + (cp - threshold) * CP_HIGH_TIER_POINTS
    }
}

/// Points earned by going from `before` to `before + gained`.
/// Always the difference of the cumulative function, so a gain straddling the
/// threshold is split across both tiers.
pub fn points_for_gain(before: u32, gained: u32) -> Points {
    points(before.saturating_add(gained)) - points(before)
}
