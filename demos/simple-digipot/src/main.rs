//! Simple digital potentiometer demo
//!
//! Demonstrates basic usage of the ad527x-driver crate on the Raspberry Pi
//! Pico 2. Unlocks an AD5272, dials in a target resistance, then sweeps the
//! wiper up and down one step at a time and logs each position via defmt.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                        |
//! |-----------|------------|------------------------------|
//! | I2C0 SDA  | GP20       |                              |
//! | I2C0 SCL  | GP21       |                              |
//! | ADDR      | GND        | Selects address 0x2F         |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use ad527x_driver::{Ad527x, Address, DigipotConfig, FullScale, Resolution};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Resistance to dial in after start-up, in ohms.
const TARGET_OHMS: u32 = 10_000;

/// Wiper steps either side of the target to sweep through.
const SWEEP_STEPS: u16 = 16;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    // --- Potentiometer ---
    let config = DigipotConfig {
        address: Address::Gnd,
        resolution: Resolution::Bits10,
        full_scale: FullScale::R20k,
    };
    let mut pot = Ad527x::new(i2c, config);

    if let Err(e) = pot.begin().await {
        error!("Begin failed ({} errors): {}", e.error_count(), e);
    }

    // The unlock in begin() is not read back; confirm it before moving on.
    if let Err(e) = pot.enable_wiper_position().await {
        error!("Wiper unlock not verified: {}", e);
    }

    match pot.set_resistance(TARGET_OHMS).await {
        Ok(ohms) => info!(
            "Target {} ohms -> setting {} = {} ohms",
            TARGET_OHMS,
            pot.setting(),
            ohms
        ),
        Err(e) => error!("Set resistance failed: {}", e),
    }

    Timer::after(Duration::from_millis(1000)).await;

    info!("Sweeping wiper +/- {} steps", SWEEP_STEPS);

    // Main loop: step up, then back down, logging every position.
    loop {
        for _ in 0..SWEEP_STEPS {
            match pot.increment().await {
                Ok(setting) => info!("Setting {} = {} ohms", setting, pot.resistance()),
                Err(e) => error!("Increment failed: {}", e),
            }
            Timer::after(Duration::from_millis(100)).await;
        }

        for _ in 0..SWEEP_STEPS {
            match pot.decrement().await {
                Ok(setting) => info!("Setting {} = {} ohms", setting, pot.resistance()),
                Err(e) => error!("Decrement failed: {}", e),
            }
            Timer::after(Duration::from_millis(100)).await;
        }

        match pot.read_setting().await {
            Ok(setting) => info!("Device reports setting {}", setting),
            Err(e) => error!("Read failed: {}", e),
        }
    }
}
