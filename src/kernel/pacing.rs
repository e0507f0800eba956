/*!
 * Tick Pacing
 * Clock rate arithmetic and the wall-clock spacing between ticks
 */

use crate::core::limits::{FALLBACK_TICK_INTERVAL, MAX_SPEED_HZ, MIN_SPEED_HZ};
use std::time::Duration;

/// How the engine task spaces ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    /// Sleep `1 / speed_hz` seconds between ticks
    #[default]
    RealTime,
    /// Only yield to the runtime between ticks
    Immediate,
}

/// Wall-clock gap between two ticks at `speed_hz`
pub fn pacing_interval(speed_hz: f64) -> Duration {
    if speed_hz.is_finite() && speed_hz > 0.0 {
        Duration::from_secs_f64(1.0 / speed_hz)
    } else {
        FALLBACK_TICK_INTERVAL
    }
}

/// Apply a rate multiplier and clamp to the supported range.
///
/// A NaN factor leaves the rate unchanged; non-positive factors bottom out
/// at the minimum rate.
pub fn scale_speed(current_hz: f64, factor: f64) -> f64 {
    if factor.is_nan() {
        return current_hz;
    }
    let scaled = current_hz * factor;
    if scaled.is_nan() {
        return current_hz;
    }
    scaled.clamp(MIN_SPEED_HZ, MAX_SPEED_HZ)
}

/// Whether a factor is one the rate change accepts without clamping it away
pub fn is_valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}
