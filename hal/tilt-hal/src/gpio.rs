//! GPIO pin abstractions
//!
//! The I2C lines are open-drain, but most GPIO blocks only offer push-pull
//! outputs. Open-drain is emulated by switching direction: input lets the
//! external pull-up raise the line, output-low pulls it down. A line must
//! never be driven high, so there is no `set_high`.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can be switched at runtime
///
/// Implementations must not enable an internal pull-up when switching to
/// input; the bus relies on external pull-up resistors.
pub trait FlexPin: InputPin {
    /// Switch the pin to input (high impedance)
    fn set_as_input(&mut self);

    /// Switch the pin to output
    ///
    /// The output latch should already hold low when this is called, so
    /// that the pin never glitches high.
    fn set_as_output(&mut self);

    /// Set the output latch low
    fn set_low(&mut self);
}
