//! Conversion between raw wiper settings and resistance.
//!
//! Resistance is always scaled over 1023 steps, whatever the resolution,
//! while the inverse multiplies by 1024. The asymmetry is carried over from
//! the datasheet formula so existing calibrations keep their values. All
//! rounding is half-up in integer arithmetic.

use crate::config::{FullScale, Resolution};

/// Lowest raw wiper setting.
pub const MIN_VALUE: u16 = 0;

/// Divisor used when turning a setting into ohms.
pub const RESISTANCE_STEPS: u64 = 1023;

/// Multiplier used when turning ohms into a setting.
pub const SETTING_SCALE: u64 = 1024;

/// Clamps and converts wiper values for one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueMapper {
    max_value: u16,
    full_scale_ohms: u32,
}

impl ValueMapper {
    pub const fn new(resolution: Resolution, full_scale: FullScale) -> Self {
        Self {
            max_value: resolution.max_value(),
            full_scale_ohms: full_scale.ohms(),
        }
    }

    /// Highest raw setting (255 or 1023).
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn full_scale_ohms(&self) -> u32 {
        self.full_scale_ohms
    }

    /// Saturate `raw` into `[MIN_VALUE, max_value]`.
    pub fn clamp(&self, raw: i32) -> u16 {
        if raw <= MIN_VALUE as i32 {
            MIN_VALUE
        } else if raw >= self.max_value as i32 {
            self.max_value
        } else {
            raw as u16
        }
    }

    /// `round(raw / 1023 * full_scale)`.
    pub fn to_resistance(&self, raw: u16) -> u32 {
        let scaled = raw as u64 * self.full_scale_ohms as u64;
        ((scaled + RESISTANCE_STEPS / 2) / RESISTANCE_STEPS) as u32
    }

    /// `clamp(round(ohms / full_scale * 1024))`.
    pub fn from_resistance(&self, ohms: u32) -> u16 {
        let fs = self.full_scale_ohms as u64;
        let raw = (ohms as u64 * SETTING_SCALE + fs / 2) / fs;
        self.clamp(raw.min(i32::MAX as u64) as i32)
    }
}
