//! Error types for the potentiometer driver.

use core::fmt;

use crate::control::ControlVerification;
use crate::registers::Command;

/// Legacy error magnitude for a command rejected before any bus activity.
pub const REJECTED_COMMAND_CODE: i16 = -100;

/// Errors that can occur when talking to an AD527x.
///
/// Transport failures are counted rather than carried, so the enum is
/// non-generic over the bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigipotError {
    /// Opcode not valid for the requested direction. No bus activity.
    InvalidCommand(Command),

    /// Payload wider than its field. `masked` is the payload clipped to
    /// the field width, kept for diagnostics only. No bus activity.
    DataOverflow { masked: u16 },

    /// 50-TP location outside 0x01..=0x32. No bus activity.
    InvalidLocation(u8),

    /// Bytes not acknowledged, non-zero end status or short reads.
    Transport { errors: u8 },

    /// Control register write could not be verified.
    Verification(ControlVerification),

    /// Resolution bit count other than 8 or 10.
    InvalidResolution(u8),

    /// Full-scale resistance other than 20k, 50k or 100k ohms.
    InvalidFullScale(u32),

    /// The part did not report a successful 50-TP program.
    TpProgramFailed { control: u8 },
}

impl DigipotError {
    /// Number of errors this failure stands for.
    ///
    /// Matches the magnitude the signed-integer API used to report, with a
    /// rejected command counting as 100.
    pub fn error_count(&self) -> u8 {
        match self {
            DigipotError::InvalidCommand(_) => REJECTED_COMMAND_CODE.unsigned_abs() as u8,
            DigipotError::Transport { errors } => *errors,
            DigipotError::Verification(report) => report.error_count(),
            DigipotError::DataOverflow { .. }
            | DigipotError::InvalidLocation(_)
            | DigipotError::InvalidResolution(_)
            | DigipotError::InvalidFullScale(_)
            | DigipotError::TpProgramFailed { .. } => 1,
        }
    }

    /// `true` when the failure was caught before the bus was touched.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            DigipotError::InvalidCommand(_)
                | DigipotError::DataOverflow { .. }
                | DigipotError::InvalidLocation(_)
                | DigipotError::InvalidResolution(_)
                | DigipotError::InvalidFullScale(_)
        )
    }
}

impl fmt::Display for DigipotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DigipotError::InvalidCommand(c) => {
                write!(f, "Command {:?} not valid in this direction", c)
            }
            DigipotError::DataOverflow { masked } => {
                write!(f, "Data overflows its field (masked 0x{:03X})", masked)
            }
            DigipotError::InvalidLocation(l) => {
                write!(f, "50-TP location 0x{:02X} out of range (0x01-0x32)", l)
            }
            DigipotError::Transport { errors } => {
                write!(f, "I2C transaction failed ({} errors)", errors)
            }
            DigipotError::Verification(report) => write!(
                f,
                "Control register not verified ({} errors)",
                report.error_count()
            ),
            DigipotError::InvalidResolution(bits) => {
                write!(f, "Unsupported resolution {} bits (must be 8 or 10)", bits)
            }
            DigipotError::InvalidFullScale(ohms) => write!(
                f,
                "Unsupported full-scale resistance {} ohms (must be 20000, 50000 or 100000)",
                ohms
            ),
            DigipotError::TpProgramFailed { control } => {
                write!(f, "50-TP program failed (control 0x{:X})", control)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DigipotError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DigipotError::InvalidCommand(c) => defmt::write!(f, "Invalid command {}", c),
            DigipotError::DataOverflow { masked } => {
                defmt::write!(f, "Data overflow (masked {=u16:#x})", masked)
            }
            DigipotError::InvalidLocation(l) => defmt::write!(f, "Invalid 50-TP location {=u8:#x}", l),
            DigipotError::Transport { errors } => defmt::write!(f, "I2C errors: {}", errors),
            DigipotError::Verification(report) => {
                defmt::write!(f, "Control verification failed: {}", report)
            }
            DigipotError::InvalidResolution(bits) => defmt::write!(f, "Invalid resolution {}", bits),
            DigipotError::InvalidFullScale(ohms) => defmt::write!(f, "Invalid full scale {}", ohms),
            DigipotError::TpProgramFailed { control } => {
                defmt::write!(f, "50-TP program failed (control {=u8:#x})", control)
            }
        }
    }
}
