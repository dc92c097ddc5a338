//! Open-drain line on an RP2040 GPIO
//!
//! The RP2040 pads have no open-drain mode. A line is emulated with a
//! [`Flex`] pin: input (high impedance) to release, output with the latch
//! low to pull down. The latch is never set high.
//!
//! Internal pulls are disabled. The bus needs external pull-up resistors
//! on both lines; the ~50 kΩ pad pull-ups are too weak for clean edges.

use embassy_rp::gpio::{Flex, Pin, Pull};
use embassy_rp::Peri;
use tilt_hal::{FlexPin, InputPin};

/// One bus line backed by an RP2040 GPIO
pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Take a GPIO and leave it released
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::None);
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }

    /// Give the GPIO back as a plain [`Flex`]
    pub fn into_inner(self) -> Flex<'d> {
        self.pin
    }
}

impl InputPin for FlexLine<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    fn is_low(&self) -> bool {
        self.pin.is_low()
    }
}

impl FlexPin for FlexLine<'_> {
    fn set_as_input(&mut self) {
        self.pin.set_as_input();
    }

    fn set_as_output(&mut self) {
        self.pin.set_as_output();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}
