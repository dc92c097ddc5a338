//! Bus line controller
//!
//! Emulates open-drain behaviour on two push-pull capable pins. A line is
//! never driven high: "high" only ever comes from releasing the pin to the
//! external pull-up. Nothing else in the crate touches pin direction or
//! level.

use tilt_hal::FlexPin;

/// One of the two I2C signal lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// SCL
    Clock,
    /// SDA
    Data,
}

/// Owner of the clock and data pins
pub struct BusLines<SCL, SDA> {
    scl: SCL,
    sda: SDA,
}

impl<SCL, SDA> BusLines<SCL, SDA>
where
    SCL: FlexPin,
    SDA: FlexPin,
{
    /// Take ownership of both pins and release them
    ///
    /// The bus starts idle: both lines pulled high by the resistors.
    pub fn new(scl: SCL, sda: SDA) -> Self {
        let mut lines = Self { scl, sda };
        lines.release(Line::Data);
        lines.release(Line::Clock);
        lines
    }

    /// Float the line so the pull-up raises it
    pub fn release(&mut self, line: Line) {
        match line {
            Line::Clock => self.scl.set_as_input(),
            Line::Data => self.sda.set_as_input(),
        }
    }

    /// Pull the line low
    ///
    /// The latch is cleared before the direction switch so the pin never
    /// drives high, even for one cycle.
    pub fn drive_low(&mut self, line: Line) {
        match line {
            Line::Clock => {
                self.scl.set_low();
                self.scl.set_as_output();
            }
            Line::Data => {
                self.sda.set_low();
                self.sda.set_as_output();
            }
        }
    }

    /// Release the line and sample it
    ///
    /// Returns `true` when the line is high. Only the protocol engine's
    /// receive paths and bus recovery use this, always on the data line.
    pub fn read(&mut self, line: Line) -> bool {
        self.release(line);
        match line {
            Line::Clock => self.scl.is_high(),
            Line::Data => self.sda.is_high(),
        }
    }

    /// Give the pins back, leaving both lines released
    pub fn release_pins(mut self) -> (SCL, SDA) {
        self.release(Line::Data);
        self.release(Line::Clock);
        (self.scl, self.sda)
    }
}
