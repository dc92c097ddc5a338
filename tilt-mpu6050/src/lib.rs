//! MPU-6050 register driver
//!
//! Drives the 3-axis accelerometer, 3-axis gyroscope and temperature
//! sensor of an MPU-6050 over the bit-banged engine from `tilt-bus`:
//!
//! - [`registers`] - Register map from the datasheet
//! - [`config`] - Full-scale ranges and sampling configuration
//! - [`convert`] - Raw sample decoding and unit conversion
//! - [`driver`] - Register access and sensor-level reads
//!
//! Every bus operation returns a [`tilt_bus::Transfer`]: the value plus
//! the ACK status observed while fetching it. Nothing here retries or
//! aborts on a NACK.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod convert;
pub mod driver;
pub mod registers;

pub use config::{AccelRange, GyroRange, SensorConfig};
pub use convert::{RawVector3, Vector3};
pub use driver::{Error, Mpu6050};
pub use registers::DEVICE_ADDRESS;
