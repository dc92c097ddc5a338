//! Tilt - MPU-6050 firmware on a bit-banged I2C bus
//!
//! Boot sequence:
//!
//! 1. Claim the two bus GPIOs as open-drain lines
//! 2. Free the bus in case a slave was left mid-byte by a reset
//! 3. Scan and log every responding address
//! 4. Confirm the sensor's identity (halts on failure)
//! 5. Wake and configure the sensor
//! 6. Hand the sensor to the sampling task

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use tilt_bus::scan::scan;
use tilt_bus::{BitBangI2c, BusLines, I2cEngine};
use tilt_hal_rp2040::FlexLine;
use tilt_mpu6050::Mpu6050;

use crate::config::bus_pins;

mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tilt firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let (scl, sda) = bus_pins!(p);
    let lines = BusLines::new(FlexLine::new(scl), FlexLine::new(sda));
    let mut engine = I2cEngine::new(lines, Delay, config::BUS);
    info!(
        "Bus on SCL=GPIO{} SDA=GPIO{} at {} Hz",
        config::SCL_PIN,
        config::SDA_PIN,
        config::BUS.frequency_hz()
    );

    if !engine.recover() {
        warn!("SDA still low after bus recovery");
    }

    let mut master = BitBangI2c::new(engine);
    let found = scan::<_, { config::SCAN_CAPACITY }>(&mut master);
    if found.is_empty() {
        warn!("No devices answered the scan");
    }
    for &address in &found {
        info!("Device at {=u8:#04x}", address);
    }

    let mut sensor = Mpu6050::with_address(master.release(), config::SENSOR_ADDRESS);

    if let Err(e) = sensor.check_presence() {
        error!("MPU-6050 not found at {=u8:#04x}: {}", sensor.address(), e);
        halt().await;
    }
    info!("MPU-6050 identified");

    if let Err(e) = sensor.wake().acknowledged() {
        error!("Wake failed: {}", e);
        halt().await;
    }

    if let Err(e) = sensor.configure(&config::SENSOR) {
        error!("Configuration failed: {}", e);
        halt().await;
    }
    info!(
        "Configured: accel {} g/LSB, gyro {} dps/LSB",
        sensor.accel_scale(),
        sensor.gyro_scale()
    );

    spawner.spawn(tasks::sampler_task(sensor)).unwrap();
}

/// Park the boot task forever
async fn halt() -> ! {
    error!("Halted");
    loop {
        core::future::pending::<()>().await;
    }
}
