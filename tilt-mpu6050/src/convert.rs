//! Raw sample decoding and unit conversion
//!
//! Samples are 16-bit two's complement, high byte first. Scaling is
//! linear for acceleration and angular rate, affine for temperature.

/// g per LSB at ±2 g
pub const ACCEL_SCALE_2G: f32 = 2.0 / 32768.0;

/// °/s per LSB at ±250 °/s
pub const GYRO_SCALE_250DPS: f32 = 250.0 / 32768.0;

/// LSB per °C (datasheet)
pub const TEMP_SENSITIVITY: f32 = 340.0;

/// °C at raw 0 (datasheet)
pub const TEMP_OFFSET_C: f32 = 36.53;

/// Raw X/Y/Z sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawVector3 {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// X/Y/Z in engineering units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Combine a big-endian byte pair
pub fn be_i16(high: u8, low: u8) -> i16 {
    i16::from_be_bytes([high, low])
}

/// Decode a 6-byte X/Y/Z burst
pub fn raw_triple(bytes: &[u8; 6]) -> RawVector3 {
    RawVector3 {
        x: be_i16(bytes[0], bytes[1]),
        y: be_i16(bytes[2], bytes[3]),
        z: be_i16(bytes[4], bytes[5]),
    }
}

/// Multiply each axis by `scale`
pub fn scale_triple(raw: RawVector3, scale: f32) -> Vector3 {
    Vector3 {
        x: raw.x as f32 * scale,
        y: raw.y as f32 * scale,
        z: raw.z as f32 * scale,
    }
}

/// Temperature in °C from TEMP_OUT
pub fn temperature_celsius(raw: i16) -> f32 {
    raw as f32 / TEMP_SENSITIVITY + TEMP_OFFSET_C
}
