//! Low-level command transaction executor.
//!
//! Turns validated commands into the two-phase bus transactions the part
//! requires and counts every transport anomaly along the way. Nothing is
//! retried: a failed transaction reports its error count and stops.
//!
//! This module is crate-private. Consumers go through
//! [`Ad527x`](crate::Ad527x) instead.

use crate::error::{DigipotError, REJECTED_COMMAND_CODE};
use crate::frame::Frame;
use crate::registers::{
    Command, Direction, DATA_MASK, FRAME_BYTES, TP_FIRST_LOCATION, TP_LAST_LOCATION,
};
use crate::transport::{BusTransport, STATUS_OK};

/// Result of a read command.
///
/// Replaces the signed-integer convention where non-negative meant data,
/// negative meant an error count and -100 meant a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadOutcome {
    /// The two bytes read back, `(MSB << 8) | LSB`.
    Data(u16),
    /// Number of transport errors in the write and read phases.
    TransportError(u8),
    /// Not a readable command; the bus was never touched.
    RejectedCommand(Command),
    /// TP_WIPER_READ location outside 0x01..=0x32; the bus was never touched.
    InvalidLocation(u8),
}

impl ReadOutcome {
    /// Convert into a `Result`, keeping the raw 16-bit datum.
    pub fn into_result(self) -> Result<u16, DigipotError> {
        match self {
            ReadOutcome::Data(datum) => Ok(datum),
            ReadOutcome::TransportError(errors) => Err(DigipotError::Transport { errors }),
            ReadOutcome::RejectedCommand(command) => Err(DigipotError::InvalidCommand(command)),
            ReadOutcome::InvalidLocation(location) => Err(DigipotError::InvalidLocation(location)),
        }
    }

    /// The datum, if the read succeeded.
    pub fn data(self) -> Option<u16> {
        match self {
            ReadOutcome::Data(datum) => Some(datum),
            _ => None,
        }
    }

    /// Signed encoding used by the Arduino-era API.
    ///
    /// Data is returned as-is (at most 10 meaningful bits), transport
    /// errors as their negated count, anything rejected before the bus was
    /// touched as -100.
    pub fn to_legacy_code(self) -> i16 {
        match self {
            ReadOutcome::Data(datum) => (datum & DATA_MASK) as i16,
            ReadOutcome::TransportError(errors) => -(errors as i16),
            ReadOutcome::RejectedCommand(_) | ReadOutcome::InvalidLocation(_) => {
                REJECTED_COMMAND_CODE
            }
        }
    }
}

/// Command executor bound to one bus address.
pub(crate) struct CommandDriver<T> {
    bus: T,
    address: u8,
}

impl<T> CommandDriver<T>
where
    T: BusTransport,
{
    /// Create a new executor.
    ///
    /// # Arguments
    /// * `bus` — transport (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address
    pub fn new(bus: T, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> T {
        self.bus
    }

    // -----------------------------------------------------------------------
    // Bus phases
    // -----------------------------------------------------------------------

    /// Send one frame, MSB first. Returns the number of errors seen.
    ///
    /// Every byte that is not acknowledged counts once, and so does a
    /// non-zero status when the transmission ends.
    pub async fn write_frame(&mut self, frame: Frame) -> u8 {
        let mut errors = 0u8;

        self.bus.begin_transmission(self.address);
        for byte in frame.to_be_bytes() {
            if self.bus.write_byte(byte) != 1 {
                errors = errors.saturating_add(1);
            }
        }
        if self.bus.end_transmission(true).await != STATUS_OK {
            errors = errors.saturating_add(1);
        }

        errors
    }

    /// Read one frame back. Returns the error count and the frame.
    ///
    /// Each missing byte counts once. Missing bytes read as `0xFF`.
    pub async fn read_frame(&mut self) -> (u8, Frame) {
        let available = self
            .bus
            .request_from(self.address, FRAME_BYTES, true)
            .await
            .min(FRAME_BYTES);

        let mut bytes = [0xFFu8; FRAME_BYTES];
        for byte in bytes.iter_mut().take(available) {
            *byte = self.bus.read_byte().unwrap_or(0xFF);
        }

        let shortfall = (FRAME_BYTES - available) as u8;
        if shortfall > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Read returned {} of {} bytes", available, FRAME_BYTES);
        }

        (shortfall, Frame::from_be_bytes(bytes))
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Execute a write command.
    ///
    /// # Errors
    /// * [`DigipotError::InvalidCommand`] if `command` is not writable
    /// * [`DigipotError::DataOverflow`] if `data` exceeds 10 bits
    /// * [`DigipotError::Transport`] on any bus anomaly
    ///
    /// The first two are raised before any bus activity.
    pub async fn write(&mut self, command: Command, data: u16) -> Result<(), DigipotError> {
        let frame = match command.direction() {
            Some(Direction::Write) => Frame::encode(command, data)?,
            // Data bits are don't-care, but the width check still applies.
            Some(Direction::WriteNoPayload) => {
                Frame::encode(command, data).map(|_| Frame::command_only(command))?
            }
            _ => return Err(DigipotError::InvalidCommand(command)),
        };

        match self.write_frame(frame).await {
            0 => Ok(()),
            errors => Err(DigipotError::Transport { errors }),
        }
    }

    /// Execute a read command.
    ///
    /// `location` is only sent with [`Command::TpWiperRead`] and must lie in
    /// 0x01..=0x32. Every other read command sends no data.
    pub async fn read(&mut self, command: Command, location: u8) -> ReadOutcome {
        let frame = match command {
            Command::TpWiperRead => {
                if !(TP_FIRST_LOCATION..=TP_LAST_LOCATION).contains(&location) {
                    return ReadOutcome::InvalidLocation(location);
                }
                Frame::pack(command, location as u16)
            }
            Command::RdacRead | Command::TpLastUsed | Command::ControlRead => {
                Frame::command_only(command)
            }
            _ => return ReadOutcome::RejectedCommand(command),
        };

        let write_errors = self.write_frame(frame).await;
        let (read_errors, reply) = self.read_frame().await;

        match write_errors.saturating_add(read_errors) {
            0 => ReadOutcome::Data(reply.bits()),
            errors => ReadOutcome::TransportError(errors),
        }
    }

    /// Write the RDAC, then read it back.
    ///
    /// Returns the value the part actually committed, which is the one to
    /// trust over the requested value.
    pub async fn write_wiper(&mut self, value: u16) -> Result<u16, DigipotError> {
        self.write(Command::RdacWrite, value).await?;
        let datum = self.read(Command::RdacRead, 0).await.into_result()?;
        Ok(datum & DATA_MASK)
    }
}
