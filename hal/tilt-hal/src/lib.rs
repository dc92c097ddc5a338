//! Tilt Hardware Abstraction Layer
//!
//! This crate defines the host GPIO boundary that the bit-banged I2C
//! stack is built on. Chip-specific HALs (RP2040, host simulation, etc.)
//! implement these traits so the protocol engine and sensor driver stay
//! board-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tilt-firmware)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tilt-mpu6050 → tilt-bus                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tilt-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tilt-hal-     │       │ tilt-bus::sim │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`], [`gpio::FlexPin`] - Direction-switchable digital I/O
//! - [`i2c::I2cBus`] - Byte-level I2C master operations
//! - [`DelayNs`] - Microsecond delay primitive (re-exported from `embedded-hal`)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use gpio::{FlexPin, InputPin};
pub use i2c::{I2cBus, I2cConfig};
