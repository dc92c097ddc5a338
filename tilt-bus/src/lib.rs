//! Software-timed I2C master
//!
//! This crate produces I2C signalling purely through GPIO direction and
//! level changes plus timed delays:
//!
//! - [`line`] - Open-drain emulation on two flex pins (bus line controller)
//! - [`engine`] - START/STOP, byte framing, ACK/NACK handshaking
//! - [`transfer`] - ACK bookkeeping carried alongside transferred values
//! - [`master`] - Byte-level master implementing [`tilt_hal::I2cBus`]
//! - [`scan`] - Address scanner for any [`tilt_hal::I2cBus`]
//! - `sim` - Host-side bus model for tests (feature `sim`)
//!
//! Control flows strictly downward: master → engine → lines. The only
//! state kept across calls is the engine's bus phase.
//!
//! There is no locking. The engine owns both pins, so Rust ownership is
//! the single-owner guarantee; sharing a bus between execution contexts
//! requires wrapping whole transactions in a lock at the call site.

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "sim"))]
#[macro_use]
extern crate std;

pub mod engine;
pub mod line;
pub mod master;
pub mod scan;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod transfer;

pub use engine::{address_byte, BusPhase, Direction, I2cEngine};
pub use line::{BusLines, Line};
pub use master::BitBangI2c;
pub use transfer::{AckStatus, Error, Phase, Transfer};
