//! Byte-level bus transport.
//!
//! The transaction executor only needs the five primitives of a Wire-style
//! two-wire master, expressed by [`BusTransport`]. [`WireBus`] provides them
//! on top of any `embedded-hal-async` I2C implementation.

use embedded_hal_async::i2c::{Error, ErrorKind, I2c, NoAcknowledgeSource};
use heapless::Vec;

use crate::registers::FRAME_BYTES;

/// End-of-transmission status: success.
pub const STATUS_OK: u8 = 0;

/// End-of-transmission status: address not acknowledged.
pub const STATUS_ADDRESS_NACK: u8 = 2;

/// End-of-transmission status: data byte not acknowledged.
pub const STATUS_DATA_NACK: u8 = 3;

/// End-of-transmission status: any other bus failure.
pub const STATUS_OTHER: u8 = 4;

/// Byte-level master operations against a 7-bit addressed peripheral.
///
/// Calls for one transaction always come in the order
/// `begin_transmission`, `write_byte`..., `end_transmission`, then for
/// reads `request_from`, `read_byte`.... Timeouts belong to the
/// implementation.
#[allow(async_fn_in_trait)]
pub trait BusTransport {
    /// Start staging a write to `address`.
    fn begin_transmission(&mut self, address: u8);

    /// Stage one byte. Returns 1 if accepted, 0 otherwise.
    fn write_byte(&mut self, value: u8) -> usize;

    /// Send the staged bytes. Returns 0 on success, a non-zero status otherwise.
    async fn end_transmission(&mut self, send_stop: bool) -> u8;

    /// Read `count` bytes from `address`. Returns how many are available.
    async fn request_from(&mut self, address: u8, count: usize, send_stop: bool) -> usize;

    /// Next received byte, or `None` once the received bytes are used up.
    fn read_byte(&mut self) -> Option<u8>;
}

/// [`BusTransport`] over an `embedded-hal-async` I2C bus.
///
/// Staged bytes go out in a single `I2c::write` when the transmission ends;
/// reads are a single `I2c::read`. Only one frame fits in either buffer.
pub struct WireBus<I2C> {
    i2c: I2C,
    address: u8,
    tx: Vec<u8, FRAME_BYTES>,
    rx: Vec<u8, FRAME_BYTES>,
    rx_pos: usize,
}

impl<I2C> WireBus<I2C>
where
    I2C: I2c,
{
    /// Wrap an I2C peripheral (takes ownership for exclusive access).
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: 0,
            tx: Vec::new(),
            rx: Vec::new(),
            rx_pos: 0,
        }
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> BusTransport for WireBus<I2C>
where
    I2C: I2c,
{
    fn begin_transmission(&mut self, address: u8) {
        self.address = address;
        self.tx.clear();
    }

    fn write_byte(&mut self, value: u8) -> usize {
        match self.tx.push(value) {
            Ok(()) => 1,
            Err(_) => 0,
        }
    }

    // embedded-hal always terminates a write with STOP, so `send_stop` has
    // no effect here.
    async fn end_transmission(&mut self, _send_stop: bool) -> u8 {
        let result = self.i2c.write(self.address, &self.tx).await;
        self.tx.clear();
        match result {
            Ok(()) => STATUS_OK,
            Err(e) => status_for(e.kind()),
        }
    }

    async fn request_from(&mut self, address: u8, count: usize, _send_stop: bool) -> usize {
        let count = count.min(FRAME_BYTES);
        let mut buf = [0u8; FRAME_BYTES];

        self.rx.clear();
        self.rx_pos = 0;

        match self.i2c.read(address, &mut buf[..count]).await {
            Ok(()) => {
                // `count` never exceeds the capacity, so this cannot fail.
                let _ = self.rx.extend_from_slice(&buf[..count]);
                count
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("I2C read from {=u8:#x} failed", address);
                0
            }
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.rx.get(self.rx_pos).copied()?;
        self.rx_pos += 1;
        Some(byte)
    }
}

/// Map an I2C failure onto a Wire-style end-of-transmission status.
fn status_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => STATUS_ADDRESS_NACK,
        ErrorKind::NoAcknowledge(_) => STATUS_DATA_NACK,
        _ => STATUS_OTHER,
    }
}
