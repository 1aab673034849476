//! Part selection and bus placement.

use crate::error::DigipotError;
use crate::registers::Address;

/// Wiper resolution of the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// AD5274: 256 positions.
    Bits8,
    /// AD5272: 1024 positions.
    #[default]
    Bits10,
}

impl Resolution {
    /// Highest raw wiper setting.
    pub const fn max_value(self) -> u16 {
        match self {
            Resolution::Bits8 => 255,
            Resolution::Bits10 => 1023,
        }
    }
}

impl TryFrom<u8> for Resolution {
    type Error = DigipotError;

    /// Convert a bit count (8 or 10).
    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Resolution::Bits8),
            10 => Ok(Resolution::Bits10),
            other => Err(DigipotError::InvalidResolution(other)),
        }
    }
}

/// End-to-end resistance of the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    /// 20 kΩ grade.
    #[default]
    R20k,
    /// 50 kΩ grade.
    R50k,
    /// 100 kΩ grade.
    R100k,
}

impl FullScale {
    /// Full-scale resistance in ohms.
    pub const fn ohms(self) -> u32 {
        match self {
            FullScale::R20k => 20_000,
            FullScale::R50k => 50_000,
            FullScale::R100k => 100_000,
        }
    }
}

impl TryFrom<u32> for FullScale {
    type Error = DigipotError;

    /// Convert a resistance in ohms. Only the three grades the part ships
    /// in are accepted.
    fn try_from(ohms: u32) -> Result<Self, Self::Error> {
        match ohms {
            20_000 => Ok(FullScale::R20k),
            50_000 => Ok(FullScale::R50k),
            100_000 => Ok(FullScale::R100k),
            other => Err(DigipotError::InvalidFullScale(other)),
        }
    }
}

/// Configuration for one potentiometer.
///
/// [`DigipotConfig::default()`] describes a 10-bit, 20 kΩ AD5272 with
/// ADDR grounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigipotConfig {
    /// Bus address set by the ADDR strap.
    pub address: Address,
    /// Wiper resolution.
    pub resolution: Resolution,
    /// Element resistance grade.
    pub full_scale: FullScale,
}
