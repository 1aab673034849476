//! 16-bit command frame codec.
//!
//! Pure bit packing between a `(command, data)` pair and the frame the
//! part expects on the wire. No bus traffic happens here.

use crate::error::DigipotError;
use crate::registers::{Command, COMMAND_SHIFT, DATA_MASK, FRAME_BYTES};

/// One command frame: `00 CCCC DDDDDDDDDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(u16);

impl Frame {
    /// Pack `command` and `data` into a frame.
    ///
    /// # Errors
    /// [`DigipotError::DataOverflow`] if `data` does not fit in 10 bits.
    /// A rejected frame must never reach the bus, so none is returned.
    pub fn encode(command: Command, data: u16) -> Result<Self, DigipotError> {
        if data > DATA_MASK {
            return Err(DigipotError::DataOverflow {
                masked: data & DATA_MASK,
            });
        }
        Ok(Self::pack(command, data))
    }

    /// Pack without the width check; data above bit 9 is dropped.
    pub(crate) fn pack(command: Command, data: u16) -> Self {
        Self(((command.code() as u16) << COMMAND_SHIFT) | (data & DATA_MASK))
    }

    /// Frame carrying `command` with all data bits clear.
    pub fn command_only(command: Command) -> Self {
        Self::pack(command, 0)
    }

    /// Split a frame back into its raw opcode and data bits.
    pub fn decode(self) -> (u8, u16) {
        (((self.0 >> COMMAND_SHIFT) & 0x0F) as u8, self.0 & DATA_MASK)
    }

    /// Rebuild a frame from the two bytes read off the bus.
    pub fn from_be_bytes(bytes: [u8; FRAME_BYTES]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Wire bytes, most significant first.
    pub fn to_be_bytes(self) -> [u8; FRAME_BYTES] {
        self.0.to_be_bytes()
    }

    /// The raw 16-bit value.
    pub fn bits(self) -> u16 {
        self.0
    }
}
