//! Board configuration
//!
//! Compiled in. Change and rebuild to retarget another board or sensor
//! setup.

use tilt_hal::I2cConfig;
use tilt_mpu6050::{AccelRange, GyroRange, SensorConfig, DEVICE_ADDRESS};

/// GPIO carrying SCL
pub const SCL_PIN: u8 = 5;

/// GPIO carrying SDA
pub const SDA_PIN: u8 = 4;

/// Take the bus pins out of the peripherals
///
/// Must name the same GPIOs as [`SCL_PIN`] and [`SDA_PIN`].
macro_rules! bus_pins {
    ($p:expr) => {
        ($p.PIN_5, $p.PIN_4)
    };
}
pub(crate) use bus_pins;

/// Bus timing
pub const BUS: I2cConfig = I2cConfig::STANDARD;

/// Sensor address (AD0 tied low)
pub const SENSOR_ADDRESS: u8 = DEVICE_ADDRESS;

/// Most devices reported by the boot scan
pub const SCAN_CAPACITY: usize = 8;

/// Time between samples
pub const SAMPLE_PERIOD_MS: u64 = 100;

/// Applied once at boot
pub const SENSOR: SensorConfig = SensorConfig {
    accel_range: AccelRange::G2,
    gyro_range: GyroRange::Dps250,
    // 1 kHz / (1 + 9) = 100 Hz, matching the sample period
    sample_rate_divider: 9,
    // 44 Hz accel / 42 Hz gyro bandwidth
    dlpf: 3,
};
