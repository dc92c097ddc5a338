//! Bus scanner
//!
//! Probes every non-reserved 7-bit address with an empty write and
//! collects the ones that answer.

use core::ops::RangeInclusive;

use heapless::Vec;
use tilt_hal::I2cBus;

/// Addresses outside the reserved blocks (0x00-0x07, 0x78-0x7F)
pub const SCAN_RANGE: RangeInclusive<u8> = 0x08..=0x77;

/// Probe [`SCAN_RANGE`] and return responding addresses in ascending order
///
/// At most `N` addresses are kept; further hits are dropped.
pub fn scan<I: I2cBus, const N: usize>(bus: &mut I) -> Vec<u8, N> {
    let mut found = Vec::new();
    for address in SCAN_RANGE {
        if bus.write(address, &[]).is_ok() && found.push(address).is_err() {
            break;
        }
    }
    found
}
