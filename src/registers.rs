//! Command opcodes, control bits and bus constants for the AD5272/AD5274.
//!
//! Every transfer is a 16-bit frame sent MSB first:
//! - Bits 15:14: always zero
//! - Bits 13:10: command opcode
//! - Bits 9:0: command data (not every command uses it)

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Which way a command moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Write phase carries a data payload.
    Write,
    /// Write phase carries the opcode only; data bits are don't-care.
    WriteNoPayload,
    /// Write phase selects what to read, then two bytes are read back.
    Read,
}

/// Command opcodes (datasheet Table 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Valid bus operation that does nothing. Never transmitted by this driver.
    Nop = 0x00,
    /// Write data bits to the RDAC wiper register (must be unlocked first).
    RdacWrite = 0x01,
    /// Read the RDAC wiper register.
    RdacRead = 0x02,
    /// Store the current RDAC setting to the next 50-TP location.
    TpWrite = 0x03,
    /// Software reset: reload the RDAC from the last programmed 50-TP value.
    RdacRefresh = 0x04,
    /// Read the 50-TP location given in data bits 5:0.
    TpWiperRead = 0x05,
    /// Read the address of the last programmed 50-TP location.
    TpLastUsed = 0x06,
    /// Write data bits 2:0 to the control register.
    ControlWrite = 0x07,
    /// Read the control register.
    ControlRead = 0x08,
    /// Data bit 0 set = shutdown, cleared = normal mode.
    Shutdown = 0x09,
}

impl Command {
    /// Numeric opcode placed in frame bits 13:10.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Direction of the command, or `None` for [`Command::Nop`].
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Command::Nop => None,
            Command::RdacWrite | Command::ControlWrite | Command::Shutdown => {
                Some(Direction::Write)
            }
            Command::TpWrite | Command::RdacRefresh => Some(Direction::WriteNoPayload),
            Command::RdacRead
            | Command::TpWiperRead
            | Command::TpLastUsed
            | Command::ControlRead => Some(Direction::Read),
        }
    }

    /// Commands accepted by the write path.
    pub const fn is_writable(self) -> bool {
        matches!(
            self.direction(),
            Some(Direction::Write) | Some(Direction::WriteNoPayload)
        )
    }

    /// Commands accepted by the read path.
    pub const fn is_readable(self) -> bool {
        matches!(self.direction(), Some(Direction::Read))
    }
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0x00 => Command::Nop,
            0x01 => Command::RdacWrite,
            0x02 => Command::RdacRead,
            0x03 => Command::TpWrite,
            0x04 => Command::RdacRefresh,
            0x05 => Command::TpWiperRead,
            0x06 => Command::TpLastUsed,
            0x07 => Command::ControlWrite,
            0x08 => Command::ControlRead,
            0x09 => Command::Shutdown,
            other => return Err(other),
        })
    }
}

// ---------------------------------------------------------------------------
// Control register bits (command 7 writes bits 2:0, command 8 reads 3:0)
// ---------------------------------------------------------------------------

/// C0: allow programming the 50-TP memory. Cleared at power-on.
/// Only 50 writes are possible over the life of the part.
pub const TP_WRITE_ENABLE: u8 = 0x01;

/// C1: allow writes to the volatile RDAC wiper. Cleared at power-on, which
/// freezes the wiper at the 50-TP value.
pub const RDAC_WIPER_WRITE_ENABLE: u8 = 0x02;

/// C2: set to disable the resistor performance (calibration) mode.
pub const RDAC_CALIB_DISABLE: u8 = 0x04;

/// C3 (read-only): set when the last 50-TP program succeeded.
pub const TP_WRITE_SUCCESS: u8 = 0x08;

/// Bits of the control register that command 7 can write.
pub const CONTROL_WRITABLE_MASK: u8 = 0x07;

// ---------------------------------------------------------------------------
// 50-TP memory
// ---------------------------------------------------------------------------

/// First programmable 50-TP location (0x00 is reserved).
pub const TP_FIRST_LOCATION: u8 = 0x01;

/// Last programmable 50-TP location.
pub const TP_LAST_LOCATION: u8 = 0x32;

/// Maximum time the part needs to program one 50-TP location.
pub const TP_PROGRAM_TIME_MS: u32 = 350;

// ---------------------------------------------------------------------------
// Frame layout
// ---------------------------------------------------------------------------

/// Mask for the 10 data bits of a frame.
pub const DATA_MASK: u16 = 0x03FF;

/// Mask for the 6-bit 50-TP location carried by [`Command::TpWiperRead`].
pub const LOCATION_MASK: u16 = 0x003F;

/// Position of the opcode within a frame.
pub const COMMAND_SHIFT: u16 = 10;

/// Bytes per frame, in both directions.
pub const FRAME_BYTES: usize = 2;

// ---------------------------------------------------------------------------
// Bus addresses
// ---------------------------------------------------------------------------

/// 7-bit I2C address selected by the ADDR strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// ADDR tied to GND.
    #[default]
    Gnd = 0x2F,
    /// ADDR tied to VDD.
    Vdd = 0x2C,
    /// ADDR left floating (unipolar supply only).
    Float = 0x2E,
}

impl Address {
    /// Raw 7-bit address.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Address of a part with ADDR grounded.
pub const DEFAULT_ADDRESS: u8 = Address::Gnd.bits();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_try_from() {
        for code in 0x00..=0x09u8 {
            let command = Command::try_from(code).unwrap();
            assert_eq!(command.code(), code);
        }
        assert_eq!(Command::try_from(0x0A), Err(0x0A));
        assert_eq!(Command::try_from(0x0F), Err(0x0F));
    }

    #[test]
    fn writable_and_readable_sets_are_disjoint() {
        let writable = [
            Command::RdacWrite,
            Command::TpWrite,
            Command::RdacRefresh,
            Command::ControlWrite,
            Command::Shutdown,
        ];
        let readable = [
            Command::RdacRead,
            Command::TpWiperRead,
            Command::TpLastUsed,
            Command::ControlRead,
        ];
        for c in writable {
            assert!(c.is_writable(), "{:?} should be writable", c);
            assert!(!c.is_readable(), "{:?} should not be readable", c);
        }
        for c in readable {
            assert!(c.is_readable(), "{:?} should be readable", c);
            assert!(!c.is_writable(), "{:?} should not be writable", c);
        }
        assert!(!Command::Nop.is_writable());
        assert!(!Command::Nop.is_readable());
    }

    #[test]
    fn strap_addresses() {
        assert_eq!(Address::Gnd.bits(), 0x2F);
        assert_eq!(Address::Vdd.bits(), 0x2C);
        assert_eq!(Address::Float.bits(), 0x2E);
        assert_eq!(DEFAULT_ADDRESS, 0x2F);
    }
}
