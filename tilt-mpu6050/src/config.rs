//! Sensor configuration
//!
//! The raw-to-unit scale depends on the full-scale range programmed into
//! GYRO_CONFIG and ACCEL_CONFIG. The power-on default is ±2 g and
//! ±250 °/s, which [`SensorConfig::default`] mirrors.

use crate::registers::{DLPF_CFG_MASK, FS_SEL_MASK, FS_SEL_SHIFT};

/// Full scale in LSB terms: a 16-bit signed sample spans ±32768
const FULL_SCALE_LSB: f32 = 32768.0;

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2 g (power-on default)
    #[default]
    G2 = 0,
    /// ±4 g
    G4 = 1,
    /// ±8 g
    G8 = 2,
    /// ±16 g
    G16 = 3,
}

impl AccelRange {
    /// Full-scale magnitude in g
    pub fn full_scale(self) -> f32 {
        match self {
            AccelRange::G2 => 2.0,
            AccelRange::G4 => 4.0,
            AccelRange::G8 => 8.0,
            AccelRange::G16 => 16.0,
        }
    }

    /// g per LSB
    pub fn scale(self) -> f32 {
        self.full_scale() / FULL_SCALE_LSB
    }

    /// ACCEL_CONFIG value selecting this range (self-test off)
    pub fn bits(self) -> u8 {
        (self as u8) << FS_SEL_SHIFT
    }

    /// Decode the AFS_SEL field of an ACCEL_CONFIG value
    pub fn from_bits(value: u8) -> Self {
        match (value & FS_SEL_MASK) >> FS_SEL_SHIFT {
            0 => AccelRange::G2,
            1 => AccelRange::G4,
            2 => AccelRange::G8,
            _ => AccelRange::G16,
        }
    }
}

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 °/s (power-on default)
    #[default]
    Dps250 = 0,
    /// ±500 °/s
    Dps500 = 1,
    /// ±1000 °/s
    Dps1000 = 2,
    /// ±2000 °/s
    Dps2000 = 3,
}

impl GyroRange {
    /// Full-scale magnitude in °/s
    pub fn full_scale(self) -> f32 {
        match self {
            GyroRange::Dps250 => 250.0,
            GyroRange::Dps500 => 500.0,
            GyroRange::Dps1000 => 1000.0,
            GyroRange::Dps2000 => 2000.0,
        }
    }

    /// °/s per LSB
    pub fn scale(self) -> f32 {
        self.full_scale() / FULL_SCALE_LSB
    }

    /// GYRO_CONFIG value selecting this range (self-test off)
    pub fn bits(self) -> u8 {
        (self as u8) << FS_SEL_SHIFT
    }

    /// Decode the FS_SEL field of a GYRO_CONFIG value
    pub fn from_bits(value: u8) -> Self {
        match (value & FS_SEL_MASK) >> FS_SEL_SHIFT {
            0 => GyroRange::Dps250,
            1 => GyroRange::Dps500,
            2 => GyroRange::Dps1000,
            _ => GyroRange::Dps2000,
        }
    }
}

/// Settings applied by [`Mpu6050::configure`](crate::Mpu6050::configure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Accelerometer full-scale range
    pub accel_range: AccelRange,
    /// Gyroscope full-scale range
    pub gyro_range: GyroRange,
    /// Sample rate = gyro output rate / (1 + divider)
    pub sample_rate_divider: u8,
    /// Digital low-pass filter setting (0-6, 0 = widest bandwidth)
    pub dlpf: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
            sample_rate_divider: 0,
            dlpf: 0,
        }
    }
}

impl SensorConfig {
    /// CONFIG register value (frame sync disabled)
    pub fn config_bits(&self) -> u8 {
        self.dlpf.min(6) & DLPF_CFG_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let config = SensorConfig::default();
        assert_eq!(config.accel_range, AccelRange::G2);
        assert_eq!(config.gyro_range, GyroRange::Dps250);
        assert_eq!(config.accel_range.scale(), 2.0 / 32768.0);
        assert_eq!(config.gyro_range.scale(), 250.0 / 32768.0);
    }

    #[test]
    fn test_range_bits() {
        assert_eq!(AccelRange::G2.bits(), 0x00);
        assert_eq!(AccelRange::G16.bits(), 0x18);
        assert_eq!(GyroRange::Dps500.bits(), 0x08);
        assert_eq!(GyroRange::Dps2000.bits(), 0x18);
    }

    #[test]
    fn test_from_bits_ignores_other_fields() {
        // Self-test bits (7:5) set, AFS_SEL = 2
        assert_eq!(AccelRange::from_bits(0xE0 | 0x10), AccelRange::G8);
        assert_eq!(GyroRange::from_bits(0xE0 | 0x08), GyroRange::Dps500);

        for range in [
            AccelRange::G2,
            AccelRange::G4,
            AccelRange::G8,
            AccelRange::G16,
        ] {
            assert_eq!(AccelRange::from_bits(range.bits()), range);
        }
    }

    #[test]
    fn test_dlpf_clamped() {
        let config = SensorConfig {
            dlpf: 7, // reserved
            ..SensorConfig::default()
        };
        assert_eq!(config.config_bits(), 6);
    }
}
