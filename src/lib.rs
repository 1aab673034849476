//! Async driver for the AD5272/AD5274 I2C digital potentiometers.
//!
//! This crate provides an Embassy-compatible async driver for the Analog
//! Devices AD5272 (10-bit) and AD5274 (8-bit) single-channel rheostats with
//! 50-times-programmable wiper memory.
//!
//! # Architecture
//!
//! The crate is split into layers, leaves first:
//!
//! - **`transport`** — the byte-level [`BusTransport`] contract, and
//!   [`WireBus`], which implements it over any `embedded-hal-async` I2C bus.
//! - **`frame`** — packing `(command, data)` into the 16-bit wire [`Frame`].
//! - **`driver`** (crate-private) — two-phase write/read transactions with
//!   per-byte error counting.
//! - **`control`** — verified control register writes.
//! - **`mapper`** — wiper clamping and resistance conversion.
//! - **[`Ad527x`]** (public) — the device API with its cached state.
//!
//! No layer retries. Every failure is reported with the number of bus
//! errors behind it, and what to do about it is left to the caller.
//!
//! # Quick start
//!
//! ```no_run
//! # use embedded_hal_async::i2c::I2c;
//! use ad527x_driver::{Ad527x, DigipotConfig, DigipotError};
//!
//! # async fn run<I2C: I2c>(i2c: I2C) -> Result<(), DigipotError> {
//! // Construct with any `embedded-hal-async` I2C implementation
//! let mut pot = Ad527x::new(i2c, DigipotConfig::default());
//!
//! pot.begin().await?;
//! pot.set_resistance(4_700).await?;
//! pot.increment().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types
//!   and log bus anomalies through `defmt`.

#![no_std]

pub use config::{DigipotConfig, FullScale, Resolution};
pub use control::ControlVerification;
pub use driver::ReadOutcome;
pub use error::{DigipotError, REJECTED_COMMAND_CODE};
pub use frame::Frame;
pub use mapper::ValueMapper;
pub use potentiometer::Ad527x;
pub use registers::{
    Address, Command, Direction, CONTROL_WRITABLE_MASK, DEFAULT_ADDRESS, RDAC_CALIB_DISABLE,
    RDAC_WIPER_WRITE_ENABLE, TP_WRITE_ENABLE, TP_WRITE_SUCCESS,
};
pub use transport::{
    BusTransport, WireBus, STATUS_ADDRESS_NACK, STATUS_DATA_NACK, STATUS_OK, STATUS_OTHER,
};

mod config;
mod control;
mod driver;
mod error;
mod frame;
mod mapper;
mod potentiometer;
mod registers;
mod transport;
