//! Byte-level I2C master
//!
//! Wraps the protocol engine behind [`tilt_hal::I2cBus`] for generic
//! tooling. Unlike the register driver, this interface is `Result` based:
//! a NACK ends the transfer early (after a STOP) and is reported as
//! [`Error::Nack`].

use embedded_hal::delay::DelayNs;
use tilt_hal::{FlexPin, I2cBus};

use crate::engine::{address_byte, Direction, I2cEngine};
use crate::transfer::{Error, Phase};

/// Bit-banged master implementing [`I2cBus`]
pub struct BitBangI2c<SCL, SDA, D> {
    engine: I2cEngine<SCL, SDA, D>,
}

impl<SCL, SDA, D> BitBangI2c<SCL, SDA, D>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    /// Wrap an engine
    pub fn new(engine: I2cEngine<SCL, SDA, D>) -> Self {
        Self { engine }
    }

    /// Access the underlying engine
    pub fn engine(&mut self) -> &mut I2cEngine<SCL, SDA, D> {
        &mut self.engine
    }

    /// Give the engine back
    pub fn release(self) -> I2cEngine<SCL, SDA, D> {
        self.engine
    }

    /// Check whether a device ACKs its address
    pub fn probe(&mut self, address: u8) -> bool {
        self.engine
            .transaction(|e| e.write_byte(address_byte(address, Direction::Write)))
    }
}

/// Send the address byte and each payload byte, stopping at the first NACK
fn send<SCL, SDA, D>(
    engine: &mut I2cEngine<SCL, SDA, D>,
    address: u8,
    data: &[u8],
) -> Result<(), Error>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    if !engine.write_byte(address_byte(address, Direction::Write)) {
        return Err(Error::Nack(Phase::Address));
    }
    for &byte in data {
        if !engine.write_byte(byte) {
            return Err(Error::Nack(Phase::Data));
        }
    }
    Ok(())
}

/// Send the read address byte and fill `buf`
fn receive<SCL, SDA, D>(
    engine: &mut I2cEngine<SCL, SDA, D>,
    address: u8,
    buf: &mut [u8],
) -> Result<(), Error>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    if !engine.write_byte(address_byte(address, Direction::Read)) {
        return Err(Error::Nack(Phase::Address));
    }
    engine.read_into(buf);
    Ok(())
}

impl<SCL, SDA, D> I2cBus for BitBangI2c<SCL, SDA, D>
where
    SCL: FlexPin,
    SDA: FlexPin,
    D: DelayNs,
{
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.engine.transaction(|e| send(e, address, data))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Error> {
        if buf.is_empty() {
            return Err(Error::EmptyRead);
        }
        self.engine.transaction(|e| receive(e, address, buf))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Error> {
        if read_buf.is_empty() {
            return Err(Error::EmptyRead);
        }
        self.engine.transaction(|e| {
            send(e, address, write_data)?;
            e.start();
            receive(e, address, read_buf)
        })
    }
}
