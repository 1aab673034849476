//! High-level interface for the AD5272/AD5274 digital potentiometers.
//!
//! [`Ad527x`] wraps the command executor with wiper clamping, resistance
//! conversion, a cached view of the device state and the control register
//! sequences the part needs before its wiper will move.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::DigipotConfig;
use crate::control::ControlVerification;
use crate::driver::{CommandDriver, ReadOutcome};
use crate::error::DigipotError;
use crate::mapper::ValueMapper;
use crate::registers::{
    Command, CONTROL_WRITABLE_MASK, DATA_MASK, LOCATION_MASK, RDAC_CALIB_DISABLE, RDAC_WIPER_WRITE_ENABLE,
    TP_PROGRAM_TIME_MS, TP_WRITE_ENABLE, TP_WRITE_SUCCESS,
};
use crate::transport::{BusTransport, WireBus};

/// High-level interface for one AD5272 (10-bit) or AD5274 (8-bit).
///
/// Owns its bus transport. When several devices share one physical bus,
/// hand each one its own shared-bus device so whole operations (such as a
/// verified control write) are never interleaved.
///
/// # Example
///
/// ```no_run
/// # use embedded_hal_async::i2c::I2c;
/// use ad527x_driver::{Ad527x, DigipotConfig, DigipotError};
///
/// # async fn run<I2C: I2c>(i2c: I2C) -> Result<(), DigipotError> {
/// // `i2c` is any `embedded-hal-async` I2C implementation
/// let mut pot = Ad527x::new(i2c, DigipotConfig::default());
///
/// // Unlock the wiper and park it at full scale
/// pot.begin().await?;
///
/// // Aim for 10 kΩ
/// pot.set_resistance(10_000).await?;
/// # Ok(())
/// # }
/// ```
pub struct Ad527x<T> {
    driver: CommandDriver<T>,
    mapper: ValueMapper,
    /// Last known raw wiper setting, always within the mapper's range.
    value: u16,
    /// Control bits 2:0 as last written.
    control: u8,
}

impl<I2C> Ad527x<WireBus<I2C>>
where
    I2C: I2c,
{
    /// Create a driver on an `embedded-hal-async` I2C bus.
    ///
    /// No I2C traffic is generated until [`begin()`](Self::begin).
    pub fn new(i2c: I2C, config: DigipotConfig) -> Self {
        Self::with_transport(WireBus::new(i2c), config)
    }
}

impl<T> Ad527x<T>
where
    T: BusTransport,
{
    /// Create a driver on any [`BusTransport`].
    pub fn with_transport(bus: T, config: DigipotConfig) -> Self {
        let mapper = ValueMapper::new(config.resolution, config.full_scale);
        Self {
            driver: CommandDriver::new(bus, config.address.bits()),
            mapper,
            value: mapper.max_value(),
            control: 0,
        }
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.driver.release()
    }

    /// 7-bit bus address in use.
    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Unlock the wiper and move it to the top of its range.
    ///
    /// # Errors
    /// Returns the first failure; the wiper write is skipped if the unlock
    /// did not go through.
    pub async fn begin(&mut self) -> Result<(), DigipotError> {
        self.value = self.mapper.max_value();

        let control = self.control | RDAC_WIPER_WRITE_ENABLE;
        self.driver.write(Command::ControlWrite, control as u16).await?;
        self.control = control;

        self.set_setting_value(self.mapper.max_value()).await?;

        #[cfg(feature = "defmt")]
        defmt::info!("AD527x at {=u8:#x} ready", self.address());

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Raw command access
    // -----------------------------------------------------------------------

    /// Issue any write command. See [`Command`] for which ones qualify.
    ///
    /// [`Command::RdacWrite`] is followed by a read-back, and the value the
    /// part reports becomes the cached setting.
    pub async fn command_write(&mut self, command: Command, data: u16) -> Result<(), DigipotError> {
        match command {
            Command::RdacWrite => self.commit_wiper(data).await.map(|_| ()),
            _ => self.driver.write(command, data).await,
        }
    }

    /// Issue any read command. `location` is only used by
    /// [`Command::TpWiperRead`].
    pub async fn command_read(&mut self, command: Command, location: u8) -> ReadOutcome {
        self.driver.read(command, location).await
    }

    // -----------------------------------------------------------------------
    // Wiper
    // -----------------------------------------------------------------------

    /// Move the wiper. `value` is clamped to the part's range first.
    ///
    /// Returns the setting the part reports after the write, which also
    /// becomes the cached setting.
    ///
    /// # Errors
    /// [`DigipotError::Transport`] if the write or its read-back failed.
    /// The cache then holds the clamped requested value.
    pub async fn set_setting_value(&mut self, value: u16) -> Result<u16, DigipotError> {
        self.commit_wiper(self.mapper.clamp(value as i32)).await
    }

    /// RDAC write plus read-back. Caller errors leave the cache alone; a
    /// transport failure leaves the requested value in it.
    async fn commit_wiper(&mut self, value: u16) -> Result<u16, DigipotError> {
        match self.driver.write_wiper(value).await {
            Ok(committed) => {
                self.value = self.mapper.clamp(committed as i32);
                Ok(self.value)
            }
            Err(e) => {
                if !e.is_caller_error() {
                    self.value = self.mapper.clamp(value as i32);
                }
                Err(e)
            }
        }
    }

    /// Read the wiper setting from the part and refresh the cache.
    pub async fn read_setting(&mut self) -> Result<u16, DigipotError> {
        let datum = self.driver.read(Command::RdacRead, 0).await.into_result()?;
        self.value = self.mapper.clamp((datum & DATA_MASK) as i32);
        Ok(self.value)
    }

    /// Cached wiper setting. No I2C traffic.
    pub fn setting(&self) -> u16 {
        self.value
    }

    /// Highest wiper setting (255 or 1023).
    pub fn maximum_setting(&self) -> u16 {
        self.mapper.max_value()
    }

    /// Step the wiper up by one, saturating at the top.
    pub async fn increment(&mut self) -> Result<u16, DigipotError> {
        let value = self.mapper.clamp(self.value as i32 + 1);
        self.set_setting_value(value).await
    }

    /// Step the wiper down by one, saturating at zero.
    pub async fn decrement(&mut self) -> Result<u16, DigipotError> {
        let value = self.mapper.clamp(self.value as i32 - 1);
        self.set_setting_value(value).await
    }

    // -----------------------------------------------------------------------
    // Resistance
    // -----------------------------------------------------------------------

    /// Move the wiper to the setting closest to `ohms`.
    ///
    /// Returns the resistance the new setting corresponds to, which is
    /// generally not exactly `ohms`.
    pub async fn set_resistance(&mut self, ohms: u32) -> Result<u32, DigipotError> {
        let value = self.mapper.from_resistance(ohms);
        self.set_setting_value(value).await?;
        Ok(self.resistance())
    }

    /// Resistance of the cached setting. No I2C traffic.
    pub fn resistance(&self) -> u32 {
        self.mapper.to_resistance(self.value)
    }

    // -----------------------------------------------------------------------
    // Control register
    // -----------------------------------------------------------------------

    /// Write control bits 2:0 and verify them by reading back.
    ///
    /// Never fails; inspect the report instead.
    pub async fn control_write_verified(&mut self, control: u8) -> ControlVerification {
        let report = self.driver.write_control_verified(control).await;
        if let Some(bits) = report.read_back {
            self.control = bits & CONTROL_WRITABLE_MASK;
        }
        report
    }

    async fn set_control(&mut self, control: u8) -> Result<(), DigipotError> {
        self.control_write_verified(control).await.into_result().map(|_| ())
    }

    /// Unlock the RDAC so the wiper can be moved.
    pub async fn enable_wiper_position(&mut self) -> Result<(), DigipotError> {
        self.set_control(self.control | RDAC_WIPER_WRITE_ENABLE).await
    }

    /// Lock (`true`) or unlock (`false`) the RDAC against wiper writes.
    pub async fn set_write_protect(&mut self, protect: bool) -> Result<(), DigipotError> {
        let control = if protect {
            self.control & !RDAC_WIPER_WRITE_ENABLE
        } else {
            self.control | RDAC_WIPER_WRITE_ENABLE
        };
        self.set_control(control).await
    }

    /// Unlock the 50-TP memory for one program cycle, keeping the wiper
    /// unlocked too.
    pub async fn enable_tp_write(&mut self) -> Result<(), DigipotError> {
        self.set_control(self.control | TP_WRITE_ENABLE | RDAC_WIPER_WRITE_ENABLE)
            .await
    }

    /// Turn resistor performance (calibration) mode on or off.
    pub async fn set_calibration(&mut self, enabled: bool) -> Result<(), DigipotError> {
        let control = if enabled {
            self.control & !RDAC_CALIB_DISABLE
        } else {
            self.control | RDAC_CALIB_DISABLE
        };
        self.set_control(control).await
    }

    /// Read the 4-bit control register, including the 50-TP success flag.
    pub async fn read_control(&mut self) -> Result<u8, DigipotError> {
        let datum = self.driver.read(Command::ControlRead, 0).await.into_result()?;
        Ok((datum as u8) & (CONTROL_WRITABLE_MASK | TP_WRITE_SUCCESS))
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Enter (`true`) or leave (`false`) shutdown mode.
    pub async fn set_shutdown(&mut self, shutdown: bool) -> Result<(), DigipotError> {
        self.driver.write(Command::Shutdown, shutdown as u16).await
    }

    /// Open the resistor terminal A and park the wiper at terminal B.
    pub async fn shutdown(&mut self) -> Result<(), DigipotError> {
        self.set_shutdown(true).await
    }

    /// Return to normal operation.
    pub async fn wake(&mut self) -> Result<(), DigipotError> {
        self.set_shutdown(false).await
    }

    // -----------------------------------------------------------------------
    // 50-TP memory
    // -----------------------------------------------------------------------

    /// Burn the current wiper setting into the next 50-TP location.
    ///
    /// Only 50 locations exist and they cannot be erased. Waits out the
    /// program time on `delay`, checks the success flag, then locks the
    /// 50-TP memory again. The relock runs whenever the unlock went
    /// through, even if programming failed.
    ///
    /// # Errors
    /// * [`DigipotError::Verification`] if the memory could not be unlocked
    /// * [`DigipotError::TpProgramFailed`] if the part did not flag success
    /// * [`DigipotError::Transport`] on bus failure
    pub async fn store_to_tp<D>(&mut self, delay: &mut D) -> Result<(), DigipotError>
    where
        D: DelayNs,
    {
        self.enable_tp_write().await?;

        let programmed = self.program_tp(delay).await;
        let relock = self.set_control(self.control & !TP_WRITE_ENABLE).await;

        let status = programmed?;
        if status & TP_WRITE_SUCCESS == 0 {
            #[cfg(feature = "defmt")]
            defmt::error!("50-TP program failed, control {=u8:#x}", status);
            return Err(DigipotError::TpProgramFailed { control: status });
        }
        relock
    }

    /// TP_WRITE, wait out the program time, return the control register.
    async fn program_tp<D>(&mut self, delay: &mut D) -> Result<u8, DigipotError>
    where
        D: DelayNs,
    {
        self.driver.write(Command::TpWrite, 0).await?;
        delay.delay_ms(TP_PROGRAM_TIME_MS).await;
        self.read_control().await
    }

    /// Read the wiper value stored at a 50-TP location (0x01..=0x32).
    pub async fn read_tp_location(&mut self, location: u8) -> Result<u16, DigipotError> {
        let datum = self
            .driver
            .read(Command::TpWiperRead, location)
            .await
            .into_result()?;
        Ok(datum & DATA_MASK)
    }

    /// Address of the most recently programmed 50-TP location.
    ///
    /// 0 means nothing has been programmed yet.
    pub async fn read_last_tp_location(&mut self) -> Result<u8, DigipotError> {
        let datum = self.driver.read(Command::TpLastUsed, 0).await.into_result()?;
        Ok((datum & LOCATION_MASK) as u8)
    }

    /// Software reset: reload the wiper from 50-TP memory and re-read it.
    pub async fn refresh_from_tp(&mut self) -> Result<u16, DigipotError> {
        self.driver.write(Command::RdacRefresh, 0).await?;
        self.read_setting().await
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;
    use crate::config::{FullScale, Resolution};
    use crate::registers::Address;
    use crate::transport::fake::FakeBus;

    /// Adds up every requested delay.
    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
    }

    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn pot(bus: FakeBus) -> Ad527x<FakeBus> {
        Ad527x::with_transport(bus, DigipotConfig::default())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn begin_unlocks_then_parks_at_full_scale() {
        let mut p = pot(FakeBus::new().respond(0x03, 0xFF));
        assert_eq!(block_on(p.begin()), Ok(()));
        assert_eq!(p.setting(), 1023);
        assert_eq!(p.resistance(), 20_000);
        assert_eq!(
            p.release().sent(),
            vec![vec![0x1C, 0x02], vec![0x07, 0xFF], vec![0x08, 0x00]]
        );
    }

    #[test]
    fn begin_stops_when_unlock_fails() {
        let bus = FakeBus {
            end_statuses: [2].into_iter().collect(),
            ..FakeBus::new()
        };
        let mut p = pot(bus);
        assert_eq!(
            block_on(p.begin()),
            Err(DigipotError::Transport { errors: 1 })
        );
        assert_eq!(p.release().transmissions.len(), 1);
    }

    #[test]
    fn begin_over_i2c() {
        let expectations = [
            I2cTransaction::write(0x2C, vec![0x1C, 0x02]),
            I2cTransaction::write(0x2C, vec![0x04, 0xFF]),
            I2cTransaction::write(0x2C, vec![0x08, 0x00]),
            I2cTransaction::read(0x2C, vec![0x00, 0xFF]),
        ];
        let i2c = I2cMock::new(&expectations);
        let config = DigipotConfig {
            address: Address::Vdd,
            resolution: Resolution::Bits8,
            full_scale: FullScale::R100k,
        };
        let mut p = Ad527x::new(i2c, config);

        assert_eq!(block_on(p.begin()), Ok(()));
        assert_eq!(p.setting(), 255);
        assert_eq!(p.maximum_setting(), 255);

        p.release().release().done();
    }

    // ── Wiper ────────────────────────────────────────────────────────

    #[test]
    fn set_setting_clamps_to_resolution() {
        let config = DigipotConfig {
            resolution: Resolution::Bits8,
            ..DigipotConfig::default()
        };
        let mut p = Ad527x::with_transport(FakeBus::new().respond(0x00, 0xFF), config);
        assert_eq!(block_on(p.set_setting_value(1000)), Ok(255));
        assert_eq!(p.release().sent()[0], vec![0x04, 0xFF]);
    }

    #[test]
    fn read_back_value_wins_over_requested() {
        let mut p = pot(FakeBus::new().respond(0x02, 0x57));
        assert_eq!(block_on(p.set_setting_value(600)), Ok(599));
        assert_eq!(p.setting(), 599);
    }

    #[test]
    fn failed_read_back_keeps_requested_value() {
        let mut p = pot(FakeBus::new());
        assert_eq!(
            block_on(p.set_setting_value(600)),
            Err(DigipotError::Transport { errors: 2 })
        );
        assert_eq!(p.setting(), 600);
    }

    #[test]
    fn read_setting_refreshes_cache() {
        let mut p = pot(FakeBus::new().respond(0x01, 0x2C));
        assert_eq!(block_on(p.read_setting()), Ok(300));
        assert_eq!(p.setting(), 300);
    }

    #[test]
    fn increment_saturates_at_max() {
        let mut p = pot(FakeBus::new().respond(0x03, 0xFF));
        assert_eq!(p.setting(), 1023);
        assert_eq!(block_on(p.increment()), Ok(1023));
        assert_eq!(p.release().sent()[0], vec![0x07, 0xFF]);
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x00).respond(0x00, 0x00));
        assert_eq!(block_on(p.set_setting_value(0)), Ok(0));
        assert_eq!(block_on(p.decrement()), Ok(0));
        assert_eq!(p.release().sent()[2], vec![0x04, 0x00]);
    }

    #[test]
    fn increment_and_decrement_step_by_one() {
        let mut p = pot(
            FakeBus::new()
                .respond(0x01, 0x00)
                .respond(0x01, 0x01)
                .respond(0x01, 0x00),
        );
        assert_eq!(block_on(p.set_setting_value(256)), Ok(256));
        assert_eq!(block_on(p.increment()), Ok(257));
        assert_eq!(block_on(p.decrement()), Ok(256));
    }

    // ── Resistance ───────────────────────────────────────────────────

    #[test]
    fn set_resistance_half_scale() {
        let mut p = pot(FakeBus::new().respond(0x02, 0x00));
        assert_eq!(block_on(p.set_resistance(10_000)), Ok(10_010));
        assert_eq!(p.setting(), 512);
        assert_eq!(p.resistance(), 10_010);
        assert_eq!(p.release().sent()[0], vec![0x06, 0x00]);
    }

    // ── Raw commands ─────────────────────────────────────────────────

    #[test]
    fn command_read_rejects_write_commands() {
        let mut p = pot(FakeBus::new());
        let outcome = block_on(p.command_read(Command::RdacWrite, 0));
        assert_eq!(outcome.to_legacy_code(), -100);
        assert_eq!(p.release().calls, 0);
    }

    #[test]
    fn command_write_rdac_reads_back_into_cache() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x64));
        assert_eq!(block_on(p.command_write(Command::RdacWrite, 100)), Ok(()));
        assert_eq!(p.setting(), 100);
        assert_eq!(p.resistance(), 1955);

        let bus = p.release();
        assert_eq!(bus.sent(), vec![vec![0x04, 0x64], vec![0x08, 0x00]]);
        assert_eq!(bus.requests.len(), 1);
    }

    #[test]
    fn command_write_rdac_overflow_keeps_cache() {
        let mut p = pot(FakeBus::new());
        assert_eq!(
            block_on(p.command_write(Command::RdacWrite, 0x400)),
            Err(DigipotError::DataOverflow { masked: 0x000 })
        );
        assert_eq!(p.setting(), 1023);
        assert_eq!(p.release().calls, 0);
    }

    #[test]
    fn command_read_rejects_oversized_tp_location() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x80));
        let outcome = block_on(p.command_read(Command::TpWiperRead, 0x41));
        assert_eq!(outcome, ReadOutcome::InvalidLocation(0x41));
        assert_eq!(p.release().calls, 0);
    }

    #[test]
    fn command_write_passes_through() {
        let mut p = pot(FakeBus::new());
        assert_eq!(block_on(p.command_write(Command::RdacRefresh, 0)), Ok(()));
        assert_eq!(p.release().sent(), vec![vec![0x10, 0x00]]);
    }

    // ── Control register ─────────────────────────────────────────────

    #[test]
    fn enable_wiper_position_verifies() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x02));
        assert_eq!(block_on(p.enable_wiper_position()), Ok(()));
    }

    #[test]
    fn enable_wiper_position_reports_mismatch() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x00));
        match block_on(p.enable_wiper_position()) {
            Err(DigipotError::Verification(report)) => {
                assert!(report.mismatch);
                assert_eq!(report.error_count(), 1);
            }
            other => panic!("expected verification error, got {:?}", other),
        }
    }

    #[test]
    fn write_protect_clears_only_the_wiper_bit() {
        let mut p = pot(
            FakeBus::new()
                .respond(0x00, 0x06)
                .respond(0x00, 0x04),
        );
        assert_eq!(block_on(p.control_write_verified(0x06)).error_count(), 0);
        assert_eq!(block_on(p.set_write_protect(true)), Ok(()));
        assert_eq!(p.release().sent()[2], vec![0x1C, 0x04]);
    }

    #[test]
    fn calibration_toggles_bit_two() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x04));
        assert_eq!(block_on(p.set_calibration(false)), Ok(()));
        assert_eq!(p.release().sent()[0], vec![0x1C, 0x04]);
    }

    #[test]
    fn read_control_keeps_success_flag() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x0A));
        assert_eq!(block_on(p.read_control()), Ok(0x0A));
    }

    // ── Shutdown ─────────────────────────────────────────────────────

    #[test]
    fn shutdown_and_wake() {
        let mut p = pot(FakeBus::new());
        assert_eq!(block_on(p.shutdown()), Ok(()));
        assert_eq!(block_on(p.wake()), Ok(()));
        assert_eq!(p.release().sent(), vec![vec![0x24, 0x01], vec![0x24, 0x00]]);
    }

    // ── 50-TP memory ─────────────────────────────────────────────────

    #[test]
    fn tp_location_out_of_range_never_reaches_bus() {
        let mut p = pot(FakeBus::new());
        assert_eq!(
            block_on(p.read_tp_location(0x00)),
            Err(DigipotError::InvalidLocation(0x00))
        );
        assert_eq!(
            block_on(p.read_tp_location(0x33)),
            Err(DigipotError::InvalidLocation(0x33))
        );
        assert_eq!(p.release().calls, 0);
    }

    #[test]
    fn read_tp_location_sends_location() {
        let mut p = pot(FakeBus::new().respond(0x01, 0x80));
        assert_eq!(block_on(p.read_tp_location(0x01)), Ok(0x180));
        assert_eq!(p.release().sent(), vec![vec![0x14, 0x01]]);
    }

    #[test]
    fn read_last_tp_location() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x05));
        assert_eq!(block_on(p.read_last_tp_location()), Ok(5));
        assert_eq!(p.release().sent(), vec![vec![0x18, 0x00]]);
    }

    #[test]
    fn store_to_tp_programs_and_relocks() {
        let mut p = pot(
            FakeBus::new()
                .respond(0x00, 0x03)
                .respond(0x00, 0x0B)
                .respond(0x00, 0x02),
        );
        let mut delay = RecordingDelay::default();

        assert_eq!(block_on(p.store_to_tp(&mut delay)), Ok(()));
        assert_eq!(delay.total_ns, 350_000_000);
        assert_eq!(
            p.release().sent(),
            vec![
                vec![0x1C, 0x03],
                vec![0x20, 0x00],
                vec![0x0C, 0x00],
                vec![0x20, 0x00],
                vec![0x1C, 0x02],
                vec![0x20, 0x00],
            ]
        );
    }

    #[test]
    fn store_to_tp_reports_missing_success_flag() {
        let mut p = pot(
            FakeBus::new()
                .respond(0x00, 0x03)
                .respond(0x00, 0x03)
                .respond(0x00, 0x02),
        );
        let mut delay = RecordingDelay::default();

        assert_eq!(
            block_on(p.store_to_tp(&mut delay)),
            Err(DigipotError::TpProgramFailed { control: 0x03 })
        );
        // Memory is locked again even though programming failed.
        assert_eq!(p.release().sent()[4], vec![0x1C, 0x02]);
    }

    #[test]
    fn store_to_tp_relocks_after_failed_tp_write() {
        // Unlock write, unlock read-back, then the TP_WRITE is refused.
        let bus = FakeBus {
            end_statuses: [0, 0, 2].into_iter().collect(),
            ..FakeBus::new().respond(0x00, 0x03).respond(0x00, 0x02)
        };
        let mut p = pot(bus);
        let mut delay = RecordingDelay::default();

        assert_eq!(
            block_on(p.store_to_tp(&mut delay)),
            Err(DigipotError::Transport { errors: 1 })
        );
        assert_eq!(delay.total_ns, 0);
        assert_eq!(p.control, RDAC_WIPER_WRITE_ENABLE);
        assert_eq!(
            p.release().sent(),
            vec![
                vec![0x1C, 0x03],
                vec![0x20, 0x00],
                vec![0x0C, 0x00],
                vec![0x1C, 0x02],
                vec![0x20, 0x00],
            ]
        );
    }

    #[test]
    fn enable_tp_write_keeps_wiper_unlocked() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x03));
        assert_eq!(block_on(p.enable_tp_write()), Ok(()));
        assert_eq!(p.release().sent()[0], vec![0x1C, 0x03]);
    }

    #[test]
    fn store_to_tp_needs_unlock() {
        let mut p = pot(FakeBus::new().respond(0x00, 0x00));
        let mut delay = RecordingDelay::default();

        assert!(matches!(
            block_on(p.store_to_tp(&mut delay)),
            Err(DigipotError::Verification(_))
        ));
        assert_eq!(delay.total_ns, 0);
        assert_eq!(p.release().transmissions.len(), 2);
    }

    #[test]
    fn refresh_reloads_from_tp() {
        let mut p = pot(FakeBus::new().respond(0x01, 0x00));
        assert_eq!(block_on(p.refresh_from_tp()), Ok(256));
        assert_eq!(p.setting(), 256);
        assert_eq!(p.release().sent(), vec![vec![0x10, 0x00], vec![0x08, 0x00]]);
    }
}
