//! RP2040 bindings for the bit-banged bus
//!
//! Implements the `tilt-hal` pin traits on top of `embassy-rp`:
//!
//! - [`gpio::FlexLine`] - A bidirectional GPIO used as one open-drain line
//!
//! Timing comes from `embassy_time::Delay`, which already implements
//! `embedded_hal::delay::DelayNs`, so no delay adapter lives here.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::FlexLine;
