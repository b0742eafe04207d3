//! Animation settings and their accepted ranges.
//!
//! Everything has a compiled-in default; the CLI may override the tick
//! delay and the white point. Values are validated here before any HID
//! communication happens.

use crate::error::{Error, Result};
use crate::report::WhitePoint;
use std::time::Duration;

/// Default pause between two color reports.
///
/// The device drops frames it cannot keep up with, so the delay only has to
/// keep the host from spinning.
pub const DEFAULT_TICK_DELAY_MS: u64 = 2;

/// Tick delay bounds, in milliseconds.
pub const TICK_DELAY_MIN_MS: u64 = 1;
pub const TICK_DELAY_MAX_MS: u64 = 250;

/// Settings for one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Sleep after each color report.
    pub tick_delay: Duration,
    /// Channel scaling used by the report encoder.
    pub white_point: WhitePoint,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_delay: Duration::from_millis(DEFAULT_TICK_DELAY_MS),
            white_point: WhitePoint::Normalized,
        }
    }
}

impl AnimationConfig {
    /// Build a config from user-supplied values.
    pub fn new(tick_delay_ms: u64, full_brightness: bool) -> Result<Self> {
        let white_point = if full_brightness {
            WhitePoint::FullBrightness
        } else {
            WhitePoint::Normalized
        };
        Ok(Self {
            tick_delay: validate_tick_delay(tick_delay_ms)?,
            white_point,
        })
    }
}

/// Validate a tick delay given in milliseconds.
pub fn validate_tick_delay(ms: u64) -> Result<Duration> {
    if !(TICK_DELAY_MIN_MS..=TICK_DELAY_MAX_MS).contains(&ms) {
        return Err(Error::OutOfRange {
            field: "tick_delay_ms",
            value: ms,
            min: TICK_DELAY_MIN_MS,
            max: TICK_DELAY_MAX_MS,
        });
    }
    Ok(Duration::from_millis(ms))
}
