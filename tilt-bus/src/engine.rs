//! I2C protocol engine
//!
//! Composes the three line primitives into bus conditions and byte
//! transfers. Every line transition is followed by one half-period delay.
//!
//! # Waveforms
//!
//! ```text
//!          START                 bit (MSB first)          ACK slot        STOP
//! SCL  ‾‾‾‾‾‾‾‾‾‾\______     ____/‾‾‾‾\____  ...     ____/‾‾‾‾\____     __/‾‾‾‾‾‾‾
//! SDA  ‾‾‾‾‾\___________     X=====data====X ...     __released/ACK__   _____/‾‾‾‾
//! ```
//!
//! Clock stretching is not honoured and there is no timeout: the engine
//! only uses fixed delays, so a missing slave can never hang a call. The
//! failure shows up as a NACK or as `0xFF` data instead.

use embedded_hal::delay::DelayNs;
use tilt_hal::{FlexPin, I2cConfig};

use crate::line::{BusLines, Line};

/// Maximum clock pulses sent by [`I2cEngine::recover`]
pub const RECOVERY_PULSES: u8 = 9;

/// Transfer direction, encoded in bit 0 of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master to slave (bit 0 = 0)
    Write = 0,
    /// Slave to master (bit 0 = 1)
    Read = 1,
}

/// Frame a 7-bit address with the direction bit
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    (address << 1) | direction as u8
}

/// Whether a transaction is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusPhase {
    /// No START outstanding
    Idle,
    /// START sent, STOP not yet sent
    Active,
}

/// Bit-banged I2C protocol engine
pub struct I2cEngine<SCL, SDA, D> {
    lines: BusLines<SCL, SDA>,
    delay: D,
    config: I2cConfig,
    phase: BusPhase,
}

impl<SCL, SDA, D> I2cEngine<SCL, SDA, D>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    /// Create an engine over released lines
    pub fn new(lines: BusLines<SCL, SDA>, delay: D, config: I2cConfig) -> Self {
        Self {
            lines,
            delay,
            config,
            phase: BusPhase::Idle,
        }
    }

    /// Timing in use
    pub fn config(&self) -> I2cConfig {
        self.config
    }

    /// Current bus phase
    pub fn phase(&self) -> BusPhase {
        self.phase
    }

    fn wait(&mut self) {
        self.delay.delay_us(self.config.half_period_us);
    }

    /// Generate a START condition
    ///
    /// Data falls while clock is high. Works from idle and, as a repeated
    /// START, from the middle of a transaction (clock low).
    pub fn start(&mut self) {
        self.lines.release(Line::Data);
        self.lines.release(Line::Clock);
        self.wait();
        self.lines.drive_low(Line::Data);
        self.wait();
        self.lines.drive_low(Line::Clock);
        self.wait();
        self.phase = BusPhase::Active;
    }

    /// Generate a STOP condition
    ///
    /// Data rises while clock is high; both lines are left released.
    pub fn stop(&mut self) {
        self.lines.drive_low(Line::Data);
        self.lines.release(Line::Clock);
        self.wait();
        self.lines.release(Line::Data);
        self.wait();
        self.phase = BusPhase::Idle;
    }

    /// One clock pulse: high, then low
    fn pulse_clock(&mut self) {
        self.lines.release(Line::Clock);
        self.wait();
        self.lines.drive_low(Line::Clock);
        self.wait();
    }

    /// Shift out one byte, MSB first, and capture the slave's ACK
    ///
    /// Returns `true` if the slave pulled data low in the ninth clock.
    /// A NACK is only reported; what to do about it is up to the caller.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        for bit in (0..8).rev() {
            if byte & (1 << bit) != 0 {
                self.lines.release(Line::Data);
            } else {
                self.lines.drive_low(Line::Data);
            }
            self.wait();
            self.pulse_clock();
        }

        self.lines.release(Line::Data);
        self.wait();
        self.lines.release(Line::Clock);
        self.wait();
        let ack = !self.lines.read(Line::Data);
        self.lines.drive_low(Line::Clock);
        self.wait();
        self.lines.drive_low(Line::Data);
        ack
    }

    /// Shift in one byte, MSB first, then answer ACK or NACK
    ///
    /// `send_ack = false` tells the slave this was the last byte.
    pub fn read_byte(&mut self, send_ack: bool) -> u8 {
        self.lines.release(Line::Data);
        let mut byte = 0u8;
        for bit in (0..8).rev() {
            self.lines.release(Line::Clock);
            self.wait();
            if self.lines.read(Line::Data) {
                byte |= 1 << bit;
            }
            self.lines.drive_low(Line::Clock);
            self.wait();
        }

        if send_ack {
            self.lines.drive_low(Line::Data);
        } else {
            self.lines.release(Line::Data);
        }
        self.wait();
        self.pulse_clock();
        self.lines.drive_low(Line::Data);
        byte
    }

    /// Fill `buf` from consecutive reads
    ///
    /// Every byte but the last is ACKed; the last is NACKed to end the
    /// burst. An empty buffer clocks nothing.
    pub fn read_into(&mut self, buf: &mut [u8]) {
        let last = buf.len().saturating_sub(1);
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_byte(i != last);
        }
    }

    /// Run `f` between one START and one STOP
    ///
    /// The STOP is sent whatever `f` returns, so a NACK inside never
    /// leaves the bus claimed.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.start();
        let result = f(self);
        self.stop();
        result
    }

    /// Try to free a bus held low by a slave
    ///
    /// A slave interrupted mid-byte keeps driving data until it has
    /// clocked out the rest of it. Up to [`RECOVERY_PULSES`] clocks are
    /// sent until data reads high, followed by a STOP. Returns `true` if
    /// the data line is high afterwards.
    pub fn recover(&mut self) -> bool {
        self.lines.release(Line::Data);
        for _ in 0..RECOVERY_PULSES {
            if self.lines.read(Line::Data) {
                break;
            }
            self.lines.drive_low(Line::Clock);
            self.wait();
            self.lines.release(Line::Clock);
            self.wait();
        }
        self.lines.drive_low(Line::Clock);
        self.wait();
        self.stop();
        self.lines.read(Line::Data)
    }

    /// Tear down, returning the lines and delay
    pub fn release(self) -> (BusLines<SCL, SDA>, D) {
        (self.lines, self.delay)
    }
}
