//! Periodic sensor sampling
//!
//! Reads acceleration, angular rate and temperature every
//! [`SAMPLE_PERIOD_MS`] and logs them. A transfer that saw a NACK is
//! reported and its value dropped; the next tick tries again.

use defmt::*;
use embassy_time::{Delay, Duration, Ticker};
use tilt_bus::Transfer;
use tilt_hal_rp2040::FlexLine;
use tilt_mpu6050::Mpu6050;

use crate::config::SAMPLE_PERIOD_MS;

/// The sensor as wired on this board
pub type Sensor = Mpu6050<FlexLine<'static>, FlexLine<'static>, Delay>;

/// Value of an acknowledged transfer, or `None` after logging the NACK
fn checked<T>(what: &str, transfer: Transfer<T>) -> Option<T> {
    match transfer.acknowledged() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} read failed: {}", what, e);
            None
        }
    }
}

/// Sampling task; sole owner of the sensor
#[embassy_executor::task]
pub async fn sampler_task(mut sensor: Sensor) {
    info!("Sampler started ({} ms period)", SAMPLE_PERIOD_MS);

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));

    loop {
        ticker.next().await;

        if let Some(a) = checked("accel", sensor.read_accel_g()) {
            info!("accel g: x={} y={} z={}", a.x, a.y, a.z);
        }
        if let Some(g) = checked("gyro", sensor.read_gyro_dps()) {
            info!("gyro dps: x={} y={} z={}", g.x, g.y, g.z);
        }
        if let Some(t) = checked("temperature", sensor.read_temperature_c()) {
            info!("temp C: {}", t);
        }
    }
}
