//! I2C bus abstractions
//!
//! Provides the byte-level master trait and the timing configuration
//! shared by software I2C implementations.

/// Byte-level I2C master
///
/// Addresses are 7-bit; implementations add the direction bit. Each call
/// is one complete transaction that ends with a STOP, whether or not the
/// target acknowledged.
pub trait I2cBus {
    /// Transfer failure, typically a NACK
    type Error;

    /// Send `data` to `address`
    ///
    /// An empty `data` sends only the address byte, which is how a device
    /// is probed.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from `address`, NACKing the final byte
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then a repeated START, then fill `read_buf`
    ///
    /// The usual register read: `write_data` holds the register address.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Software I2C timing
///
/// Every line transition is followed by one half-period delay. The value
/// only has to be long enough for the slave and the pull-ups to settle;
/// protocol correctness depends on ordering alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Delay after each line transition, in microseconds
    pub half_period_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (~100 kHz)
    pub const STANDARD: Self = Self { half_period_us: 5 };

    /// Half of standard mode, for long wires or weak pull-ups
    pub const SLOW: Self = Self { half_period_us: 10 };

    /// Approximate SCL frequency in Hz
    ///
    /// A bit takes two phases, so the clock period is two delays. Zero
    /// for a zero delay or one too long to yield a whole hertz.
    pub fn frequency_hz(&self) -> u32 {
        if self.half_period_us == 0 {
            return 0;
        }
        1_000_000 / self.half_period_us.saturating_mul(2)
    }
}
