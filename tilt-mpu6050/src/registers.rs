//! MPU-6050 register map
//!
//! Addresses and bit fields from the MPU-6000/6050 register map,
//! revision 4.2. Multi-byte samples are big-endian two's complement,
//! high byte at the lower address.

/// 7-bit bus address with AD0 tied low
pub const DEVICE_ADDRESS: u8 = 0x68;

/// 7-bit bus address with AD0 tied high
pub const DEVICE_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Value of WHO_AM_I; the upper six address bits, independent of AD0
pub const WHO_AM_I_VALUE: u8 = DEVICE_ADDRESS;

/// Register addresses
pub mod reg {
    /// Sample rate divider
    pub const SMPLRT_DIV: u8 = 0x19;
    /// Frame sync and digital low-pass filter
    pub const CONFIG: u8 = 0x1A;
    /// Gyroscope self-test and full-scale select
    pub const GYRO_CONFIG: u8 = 0x1B;
    /// Accelerometer self-test and full-scale select
    pub const ACCEL_CONFIG: u8 = 0x1C;
    /// First of six accelerometer bytes (X high)
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    /// First of two temperature bytes (high)
    pub const TEMP_OUT_H: u8 = 0x41;
    /// First of six gyroscope bytes (X high)
    pub const GYRO_XOUT_H: u8 = 0x43;
    /// Power management 1
    pub const PWR_MGMT_1: u8 = 0x6B;
    /// Device identity
    pub const WHO_AM_I: u8 = 0x75;
}

/// Bytes in an accelerometer or gyroscope burst
pub const TRIPLE_LEN: usize = 6;

/// Bytes in a temperature burst
pub const TEMP_LEN: usize = 2;

/// Full-scale select field (FS_SEL / AFS_SEL), bits 4:3
pub const FS_SEL_SHIFT: u8 = 3;
pub const FS_SEL_MASK: u8 = 0b11 << FS_SEL_SHIFT;

/// DLPF_CFG field of CONFIG, bits 2:0
pub const DLPF_CFG_MASK: u8 = 0b111;

/// PWR_MGMT_1 bits
pub mod pwr_mgmt_1 {
    /// Reset all registers to defaults
    pub const DEVICE_RESET: u8 = 1 << 7;
    /// Low-power sleep; set at power-on
    pub const SLEEP: u8 = 1 << 6;
    /// Value written by a wake: internal oscillator, sleep cleared
    pub const AWAKE: u8 = 0x00;
}
