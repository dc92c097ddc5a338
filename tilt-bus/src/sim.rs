//! Host-side open-drain bus model
//!
//! Two [`SimPin`]s share one [`SimBus`]. Line levels are the wired-AND of
//! the master pins and the simulated target: a line is low if anyone pulls
//! it low. The target follows the bus the way real silicon does:
//!
//! - data falling while clock is high: START (or repeated START)
//! - data rising while clock is high: STOP
//! - clock rising: sample the data line
//! - clock falling: change what the target drives on the data line
//!
//! Every level change and every decoded protocol event is recorded so
//! tests can assert on the exact waveform.

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use tilt_hal::{FlexPin, I2cConfig, InputPin};

use crate::engine::I2cEngine;
use crate::line::{BusLines, Line};

/// Behaviour of a simulated slave
pub trait SimTarget {
    /// 7-bit address the target answers to
    fn address(&self) -> u8;

    /// Address byte matched; return `true` to ACK it
    fn on_address(&mut self, read: bool) -> bool;

    /// Byte received from the master; return `true` to ACK it
    fn on_write(&mut self, byte: u8) -> bool;

    /// Next byte to send to the master
    fn on_read(&mut self) -> u8;

    /// STOP seen on the bus
    fn on_stop(&mut self) {}
}

/// Sampled level of both lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    /// SCL level
    pub clock: bool,
    /// SDA level
    pub data: bool,
}

/// Protocol event decoded by the bus model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// START or repeated START
    Start,
    /// STOP
    Stop,
    /// Address byte clocked in (`acked` is the target's answer)
    Address { byte: u8, acked: bool },
    /// Data byte clocked in from the master
    Written { byte: u8, acked: bool },
    /// Data byte clocked out to the master (`acked` is the master's answer)
    Read { byte: u8, acked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Receive,
    Transmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Waiting for START
    Idle,
    /// Shifting in a byte
    Receive { byte: u8, bits: u8, address: bool },
    /// Target holds ACK for one clock
    AckOut { next: Next },
    /// Shifting out a byte
    Transmit { byte: u8, bits: u8 },
    /// Master's ACK slot
    AckIn { byte: u8 },
    /// Master's ACK sampled, waiting for the clock to fall
    AckInDone { more: bool },
    /// Not addressed or NACKed, waiting for START or STOP
    Ignore,
}

#[derive(Debug, Clone, Copy, Default)]
struct PinState {
    output: bool,
    latch_low: bool,
}

impl PinState {
    fn pulls_low(&self) -> bool {
        self.output && self.latch_low
    }
}

struct Inner<T> {
    target: T,
    clock: PinState,
    data: PinState,
    target_data_low: bool,
    state: LineState,
    mode: Mode,
    trace: Vec<LineState>,
    events: Vec<BusEvent>,
    driven_high: bool,
}

impl<T: SimTarget> Inner<T> {
    fn pin(&mut self, line: Line) -> &mut PinState {
        match line {
            Line::Clock => &mut self.clock,
            Line::Data => &mut self.data,
        }
    }

    fn level(&self, line: Line) -> bool {
        match line {
            Line::Clock => self.state.clock,
            Line::Data => self.state.data,
        }
    }

    /// Recompute line levels and react to any edge
    fn settle(&mut self) {
        let new = LineState {
            clock: !self.clock.pulls_low(),
            data: !(self.data.pulls_low() || self.target_data_low),
        };
        let old = self.state;
        if new == old {
            return;
        }
        self.state = new;
        self.trace.push(new);

        if old.clock && new.clock {
            if old.data && !new.data {
                self.start_condition();
            } else if !old.data && new.data {
                self.stop_condition();
            }
        } else if !old.clock && new.clock {
            self.clock_rising(new.data);
        } else if old.clock && !new.clock {
            self.clock_falling();
            // The target may have changed the data line; clock is low so
            // this cannot be mistaken for START/STOP.
            self.settle();
        }
    }

    fn start_condition(&mut self) {
        self.events.push(BusEvent::Start);
        self.target_data_low = false;
        self.mode = Mode::Receive {
            byte: 0,
            bits: 0,
            address: true,
        };
    }

    fn stop_condition(&mut self) {
        self.events.push(BusEvent::Stop);
        self.target_data_low = false;
        if self.mode != Mode::Idle {
            self.target.on_stop();
        }
        self.mode = Mode::Idle;
    }

    fn clock_rising(&mut self, data: bool) {
        let mode = self.mode;
        self.mode = match mode {
            Mode::Receive {
                byte,
                bits,
                address,
            } => Mode::Receive {
                byte: (byte << 1) | data as u8,
                bits: bits + 1,
                address,
            },
            Mode::Transmit { byte, bits } => Mode::Transmit {
                byte,
                bits: bits + 1,
            },
            Mode::AckIn { byte } => {
                let acked = !data;
                self.events.push(BusEvent::Read { byte, acked });
                Mode::AckInDone { more: acked }
            }
            mode => mode,
        };
    }

    fn clock_falling(&mut self) {
        let mode = self.mode;
        self.mode = match mode {
            Mode::Receive {
                byte,
                bits: 8,
                address: true,
            } => {
                let read = byte & 1 == 1;
                let acked = byte >> 1 == self.target.address() && self.target.on_address(read);
                self.events.push(BusEvent::Address { byte, acked });
                if acked {
                    self.target_data_low = true;
                    let next = if read { Next::Transmit } else { Next::Receive };
                    Mode::AckOut { next }
                } else {
                    Mode::Ignore
                }
            }
            Mode::Receive {
                byte,
                bits: 8,
                address: false,
            } => {
                let acked = self.target.on_write(byte);
                self.events.push(BusEvent::Written { byte, acked });
                if acked {
                    self.target_data_low = true;
                    Mode::AckOut {
                        next: Next::Receive,
                    }
                } else {
                    Mode::Ignore
                }
            }
            Mode::AckOut { next } => {
                self.target_data_low = false;
                match next {
                    Next::Receive => Mode::Receive {
                        byte: 0,
                        bits: 0,
                        address: false,
                    },
                    Next::Transmit => self.load_byte(),
                }
            }
            Mode::Transmit { byte, bits: 8 } => {
                self.target_data_low = false;
                Mode::AckIn { byte }
            }
            Mode::Transmit { byte, bits } => {
                self.target_data_low = byte & (0x80 >> bits) == 0;
                Mode::Transmit { byte, bits }
            }
            Mode::AckInDone { more: true } => self.load_byte(),
            Mode::AckInDone { more: false } => Mode::Ignore,
            mode => mode,
        };
    }

    /// Fetch the next byte and put its MSB on the data line
    fn load_byte(&mut self) -> Mode {
        let byte = self.target.on_read();
        self.target_data_low = byte & 0x80 == 0;
        Mode::Transmit { byte, bits: 0 }
    }
}

/// Simulated two-wire bus with one target attached
pub struct SimBus<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for SimBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: SimTarget> SimBus<T> {
    /// Idle bus (both lines pulled high) with `target` attached
    pub fn new(target: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                target,
                clock: PinState::default(),
                data: PinState::default(),
                target_data_low: false,
                state: LineState {
                    clock: true,
                    data: true,
                },
                mode: Mode::Idle,
                trace: Vec::new(),
                events: Vec::new(),
                driven_high: false,
            })),
        }
    }

    /// Master-side clock and data pins
    pub fn pins(&self) -> (SimPin<T>, SimPin<T>) {
        (
            SimPin {
                bus: self.inner.clone(),
                line: Line::Clock,
            },
            SimPin {
                bus: self.inner.clone(),
                line: Line::Data,
            },
        )
    }

    /// Protocol engine wired to this bus with zero delays
    pub fn engine(&self) -> I2cEngine<SimPin<T>, SimPin<T>, NoDelay> {
        let (scl, sda) = self.pins();
        I2cEngine::new(BusLines::new(scl, sda), NoDelay, I2cConfig::default())
    }

    /// Current line levels
    pub fn line_state(&self) -> LineState {
        self.inner.borrow().state
    }

    /// Every level change since creation or the last [`clear`](Self::clear)
    pub fn trace(&self) -> Vec<LineState> {
        self.inner.borrow().trace.clone()
    }

    /// Every decoded event since creation or the last [`clear`](Self::clear)
    pub fn events(&self) -> Vec<BusEvent> {
        self.inner.borrow().events.clone()
    }

    /// Forget recorded trace and events
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.trace.clear();
        inner.events.clear();
    }

    /// True if a master pin was ever switched to output with its latch high
    pub fn was_driven_high(&self) -> bool {
        self.inner.borrow().driven_high
    }

    /// True if the target is currently holding the data line low
    pub fn target_holds_data(&self) -> bool {
        self.inner.borrow().target_data_low
    }

    /// Inspect or modify the attached target
    pub fn with_target<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut().target)
    }
}

/// Master-side pin attached to a [`SimBus`]
pub struct SimPin<T> {
    bus: Rc<RefCell<Inner<T>>>,
    line: Line,
}

impl<T: SimTarget> InputPin for SimPin<T> {
    fn is_high(&self) -> bool {
        self.bus.borrow().level(self.line)
    }
}

impl<T: SimTarget> FlexPin for SimPin<T> {
    fn set_as_input(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.pin(self.line).output = false;
        bus.settle();
    }

    fn set_as_output(&mut self) {
        let mut bus = self.bus.borrow_mut();
        let latch_low = {
            let pin = bus.pin(self.line);
            pin.output = true;
            pin.latch_low
        };
        if !latch_low {
            bus.driven_high = true;
        }
        bus.settle();
    }

    fn set_low(&mut self) {
        let mut bus = self.bus.borrow_mut();
        bus.pin(self.line).latch_low = true;
        bus.settle();
    }
}

/// Delay that returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Target with 256 byte-wide registers and auto-incrementing pointer
///
/// The first byte written after an address+write byte sets the register
/// pointer; following bytes are stored at the pointer. Every byte read or
/// stored advances the pointer.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    expect_pointer: bool,
    nack_all: bool,
}

impl RegisterFile {
    /// Zeroed register file answering at `address`
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            pointer: 0,
            expect_pointer: false,
            nack_all: false,
        }
    }

    /// Builder-style register preset
    pub fn with_register(mut self, register: u8, value: u8) -> Self {
        self.registers[register as usize] = value;
        self
    }

    /// Stop acknowledging anything, including the address
    pub fn set_nack_all(&mut self, nack_all: bool) {
        self.nack_all = nack_all;
    }

    /// Register value
    pub fn get(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Overwrite a register
    pub fn set(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    /// Current register pointer
    pub fn pointer(&self) -> u8 {
        self.pointer
    }
}

impl SimTarget for RegisterFile {
    fn address(&self) -> u8 {
        self.address
    }

    fn on_address(&mut self, read: bool) -> bool {
        if !read {
            self.expect_pointer = true;
        }
        !self.nack_all
    }

    fn on_write(&mut self, byte: u8) -> bool {
        if self.nack_all {
            return false;
        }
        if self.expect_pointer {
            self.pointer = byte;
            self.expect_pointer = false;
        } else {
            self.registers[self.pointer as usize] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        true
    }

    fn on_read(&mut self) -> u8 {
        let value = self.registers[self.pointer as usize];
        self.pointer = self.pointer.wrapping_add(1);
        value
    }
}
