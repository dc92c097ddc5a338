//! MPU-6050 driver
//!
//! Register access is built from protocol-engine transactions:
//!
//! ```text
//! write_register:  S  addr+W  reg  value  P
//! read_register:   S  addr+W  reg  P   S  addr+R  data(NACK)  P
//! read_bytes:      S  addr+W  reg  P   S  addr+R  data(ACK) ... data(NACK)  P
//! ```
//!
//! The read pointer is set in its own transaction followed by a fresh
//! START, rather than a repeated START; the device accepts both.
//!
//! # Scale coupling
//!
//! [`read_accel_g`](Mpu6050::read_accel_g) and
//! [`read_gyro_dps`](Mpu6050::read_gyro_dps) multiply by the scales the
//! driver holds. Those start at the ±2 g / ±250 °/s constants, which are
//! only correct while the device is in its power-on range. Anything that
//! writes GYRO_CONFIG or ACCEL_CONFIG behind the driver's back (a raw
//! [`write_register`](Mpu6050::write_register), a device reset) silently
//! invalidates them. [`configure`](Mpu6050::configure) is the only path
//! that keeps range and scale in lockstep.

use embedded_hal::delay::DelayNs;
use tilt_bus::{address_byte, AckStatus, Direction, I2cEngine, Phase, Transfer};
use tilt_hal::FlexPin;

use crate::config::{AccelRange, GyroRange, SensorConfig};
use crate::convert::{
    be_i16, raw_triple, scale_triple, temperature_celsius, RawVector3, Vector3, ACCEL_SCALE_2G,
    GYRO_SCALE_250DPS,
};
use crate::registers::{reg, pwr_mgmt_1, DEVICE_ADDRESS, TEMP_LEN, TRIPLE_LEN, WHO_AM_I_VALUE};

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A byte was not acknowledged
    Bus(tilt_bus::Error),
    /// WHO_AM_I did not read back the expected identity
    IdentityMismatch {
        /// Value actually read
        found: u8,
    },
    /// A configuration register did not read back what was written
    ConfigMismatch {
        /// Register address
        register: u8,
        /// Value written
        expected: u8,
        /// Value read back
        found: u8,
    },
}

impl From<tilt_bus::Error> for Error {
    fn from(e: tilt_bus::Error) -> Self {
        Error::Bus(e)
    }
}

/// MPU-6050 on a bit-banged bus
///
/// Owns the protocol engine, so every operation runs to completion
/// before another can start.
pub struct Mpu6050<SCL, SDA, D> {
    engine: I2cEngine<SCL, SDA, D>,
    address: u8,
    accel_scale: f32,
    gyro_scale: f32,
}

impl<SCL, SDA, D> Mpu6050<SCL, SDA, D>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    /// Driver for a device at [`DEVICE_ADDRESS`] (AD0 low)
    pub fn new(engine: I2cEngine<SCL, SDA, D>) -> Self {
        Self::with_address(engine, DEVICE_ADDRESS)
    }

    /// Driver for a device at a custom address
    pub fn with_address(engine: I2cEngine<SCL, SDA, D>, address: u8) -> Self {
        Self {
            engine,
            address,
            accel_scale: ACCEL_SCALE_2G,
            gyro_scale: GYRO_SCALE_250DPS,
        }
    }

    /// 7-bit bus address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// g per LSB currently applied by [`read_accel_g`](Self::read_accel_g)
    pub fn accel_scale(&self) -> f32 {
        self.accel_scale
    }

    /// °/s per LSB currently applied by [`read_gyro_dps`](Self::read_gyro_dps)
    pub fn gyro_scale(&self) -> f32 {
        self.gyro_scale
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Transfer<()> {
        let address = self.address;
        let status = self.engine.transaction(|e| {
            let mut status = AckStatus::new();
            status.record(
                Phase::Address,
                e.write_byte(address_byte(address, Direction::Write)),
            );
            status.record(Phase::Register, e.write_byte(register));
            status.record(Phase::Data, e.write_byte(value));
            status
        });
        Transfer::new((), status)
    }

    /// Load the device's register pointer
    fn set_pointer(&mut self, register: u8) -> AckStatus {
        let address = self.address;
        self.engine.transaction(|e| {
            let mut status = AckStatus::new();
            status.record(
                Phase::Address,
                e.write_byte(address_byte(address, Direction::Write)),
            );
            status.record(Phase::Register, e.write_byte(register));
            status
        })
    }

    /// Read one register
    pub fn read_register(&mut self, register: u8) -> Transfer<u8> {
        self.read_bytes::<1>(register).map(|[value]| value)
    }

    /// Burst-read `N` consecutive registers starting at `register`
    ///
    /// The device auto-increments its pointer, so bytes arrive in
    /// ascending address order. Every byte but the last is ACKed. `N = 0`
    /// does not touch the bus.
    pub fn read_bytes<const N: usize>(&mut self, register: u8) -> Transfer<[u8; N]> {
        let mut buf = [0u8; N];
        if N == 0 {
            return Transfer::new(buf, AckStatus::new());
        }

        let mut status = self.set_pointer(register);
        let address = self.address;
        let read_status = self.engine.transaction(|e| {
            let mut status = AckStatus::new();
            status.record(
                Phase::Address,
                e.write_byte(address_byte(address, Direction::Read)),
            );
            e.read_into(&mut buf);
            status
        });
        status.merge(read_status);
        Transfer::new(buf, status)
    }

    /// Raw accelerometer X/Y/Z
    pub fn read_accel_raw(&mut self) -> Transfer<RawVector3> {
        self.read_bytes::<TRIPLE_LEN>(reg::ACCEL_XOUT_H)
            .map(|bytes| raw_triple(&bytes))
    }

    /// Raw gyroscope X/Y/Z
    pub fn read_gyro_raw(&mut self) -> Transfer<RawVector3> {
        self.read_bytes::<TRIPLE_LEN>(reg::GYRO_XOUT_H)
            .map(|bytes| raw_triple(&bytes))
    }

    /// Raw temperature
    pub fn read_temperature_raw(&mut self) -> Transfer<i16> {
        self.read_bytes::<TEMP_LEN>(reg::TEMP_OUT_H)
            .map(|[high, low]| be_i16(high, low))
    }

    /// Acceleration in g
    pub fn read_accel_g(&mut self) -> Transfer<Vector3> {
        let scale = self.accel_scale;
        self.read_accel_raw().map(|raw| scale_triple(raw, scale))
    }

    /// Angular rate in °/s
    pub fn read_gyro_dps(&mut self) -> Transfer<Vector3> {
        let scale = self.gyro_scale;
        self.read_gyro_raw().map(|raw| scale_triple(raw, scale))
    }

    /// Die temperature in °C
    pub fn read_temperature_c(&mut self) -> Transfer<f32> {
        self.read_temperature_raw().map(temperature_celsius)
    }

    /// Convert a raw accelerometer sample with the current scale
    pub fn accel_g_from_raw(&self, raw: RawVector3) -> Vector3 {
        scale_triple(raw, self.accel_scale)
    }

    /// Convert a raw gyroscope sample with the current scale
    pub fn gyro_dps_from_raw(&self, raw: RawVector3) -> Vector3 {
        scale_triple(raw, self.gyro_scale)
    }

    /// Read WHO_AM_I
    pub fn identify(&mut self) -> Transfer<u8> {
        self.read_register(reg::WHO_AM_I)
    }

    /// Clear the sleep bit the device powers up with
    pub fn wake(&mut self) -> Transfer<()> {
        self.write_register(reg::PWR_MGMT_1, pwr_mgmt_1::AWAKE)
    }

    /// Confirm an MPU-6050 is answering
    ///
    /// Fails with [`Error::Bus`] if the identity read was not
    /// acknowledged and [`Error::IdentityMismatch`] if it returned
    /// something other than [`WHO_AM_I_VALUE`].
    pub fn check_presence(&mut self) -> Result<(), Error> {
        let found = self.identify().acknowledged()?;
        if found != WHO_AM_I_VALUE {
            return Err(Error::IdentityMismatch { found });
        }
        Ok(())
    }

    /// Program sample rate, filter and ranges, verifying each range
    ///
    /// Each full-scale register is read back right after it is written and
    /// the matching scale is taken from the value read, before any error
    /// is reported. A failure partway through therefore leaves every scale
    /// in step with what the device holds. The one exception is a range
    /// register whose read-back is itself NACKed: its content is unknown
    /// and the previous scale is kept.
    pub fn configure(&mut self, config: &SensorConfig) -> Result<(), Error> {
        self.write_register(reg::SMPLRT_DIV, config.sample_rate_divider)
            .acknowledged()?;
        self.write_register(reg::CONFIG, config.config_bits())
            .acknowledged()?;

        let gyro_bits = config.gyro_range.bits();
        let (written, found) = self.write_range(reg::GYRO_CONFIG, gyro_bits)?;
        self.gyro_scale = GyroRange::from_bits(found).scale();
        written?;
        check(reg::GYRO_CONFIG, gyro_bits, found)?;

        let accel_bits = config.accel_range.bits();
        let (written, found) = self.write_range(reg::ACCEL_CONFIG, accel_bits)?;
        self.accel_scale = AccelRange::from_bits(found).scale();
        written?;
        check(reg::ACCEL_CONFIG, accel_bits, found)
    }

    /// Write a full-scale register and read it back
    ///
    /// The read-back happens even if the write was NACKed. Returns the
    /// write outcome and the value now in the register.
    fn write_range(&mut self, register: u8, bits: u8) -> Result<(Result<(), Error>, u8), Error> {
        let written = self
            .write_register(register, bits)
            .status
            .into_result()
            .map_err(Error::from);
        let found = self.read_register(register).acknowledged()?;
        Ok((written, found))
    }

    /// Give the engine back
    pub fn release(self) -> I2cEngine<SCL, SDA, D> {
        self.engine
    }
}

/// Compare a read-back register with what was written
fn check(register: u8, expected: u8, found: u8) -> Result<(), Error> {
    if found != expected {
        return Err(Error::ConfigMismatch {
            register,
            expected,
            found,
        });
    }
    Ok(())
}
