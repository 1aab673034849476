//! Verified writes to the control register.
//!
//! The sequence runs write, then read-back, then compare:
//!
//! ```text
//! Idle ──CONTROL_WRITE──▶ WriteIssued ──CONTROL_READ──▶ ReadBack ──compare──▶ Done / Error
//! ```
//!
//! Every phase runs even if an earlier one reported errors, and all errors
//! are summed into one [`ControlVerification`].

use crate::driver::CommandDriver;
use crate::error::DigipotError;
use crate::frame::Frame;
use crate::registers::{Command, CONTROL_WRITABLE_MASK};
use crate::transport::BusTransport;

/// Outcome of a verified control register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlVerification {
    /// Control value as requested by the caller.
    pub requested: u8,
    /// Low byte read back, or `None` if the read phase came up short.
    pub read_back: Option<u8>,
    /// Transport errors across both transactions.
    pub transport_errors: u8,
    /// `requested` had bits above 2:0 set. They are never transmitted.
    pub out_of_range: bool,
    /// Bits 2:0 read back differ from the ones written.
    pub mismatch: bool,
}

impl ControlVerification {
    /// Total error count; 0 means the write is fully verified.
    pub fn error_count(&self) -> u8 {
        self.transport_errors
            .saturating_add(self.out_of_range as u8)
            .saturating_add(self.mismatch as u8)
    }

    pub fn is_verified(&self) -> bool {
        self.error_count() == 0
    }

    /// The control bits read back, or the whole report as an error.
    pub fn into_result(self) -> Result<u8, DigipotError> {
        match (self.is_verified(), self.read_back) {
            (true, Some(bits)) => Ok(bits & CONTROL_WRITABLE_MASK),
            _ => Err(DigipotError::Verification(self)),
        }
    }
}

impl<T> CommandDriver<T>
where
    T: BusTransport,
{
    /// Write `control` bits 2:0, read the register back and compare.
    pub async fn write_control_verified(&mut self, control: u8) -> ControlVerification {
        let bits = control & CONTROL_WRITABLE_MASK;
        let out_of_range = control > CONTROL_WRITABLE_MASK;
        if out_of_range {
            #[cfg(feature = "defmt")]
            defmt::warn!("Control value {=u8:#x} has bits above 2:0", control);
        }

        // Idle -> WriteIssued
        let mut transport_errors = self
            .write_frame(Frame::pack(Command::ControlWrite, bits as u16))
            .await;

        // WriteIssued -> ReadBack
        transport_errors = transport_errors.saturating_add(
            self.write_frame(Frame::command_only(Command::ControlRead)).await,
        );
        let (read_errors, reply) = self.read_frame().await;
        transport_errors = transport_errors.saturating_add(read_errors);

        // ReadBack -> Done / Error. A short read leaves nothing to compare.
        let read_back = (read_errors == 0).then(|| reply.to_be_bytes()[1]);
        let mismatch = match read_back {
            Some(lsb) => lsb & CONTROL_WRITABLE_MASK != bits,
            None => false,
        };

        #[cfg(feature = "defmt")]
        {
            if let Some(lsb) = read_back {
                if mismatch {
                    defmt::warn!("Control write/read mismatch: {=u8:#x}/{=u8:#x}", bits, lsb);
                }
                defmt::debug!("Control register now {=u8:#x}", lsb);
            }
        }

        ControlVerification {
            requested: control,
            read_back,
            transport_errors,
            out_of_range,
            mismatch,
        }
    }
}
