//! ACK bookkeeping
//!
//! The protocol engine never aborts on a NACK. Instead every layer hands
//! the observed acknowledge status up alongside the data, and the caller
//! decides whether a NACK is fatal.

/// Which byte of a transaction a NACK was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Slave address + direction byte
    Address,
    /// Register pointer byte
    Register,
    /// Payload byte
    Data,
}

/// Bus-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A byte was not acknowledged by the slave
    Nack(Phase),
    /// A read of zero bytes was requested
    EmptyRead,
}

/// Outcome of the ACK slots in one logical operation
///
/// Only the first NACK is kept; later ones are usually a consequence of
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckStatus {
    nack: Option<Phase>,
}

impl AckStatus {
    /// Status with every slot acknowledged
    pub const fn new() -> Self {
        Self { nack: None }
    }

    /// Record the result of one ACK slot
    pub fn record(&mut self, phase: Phase, acked: bool) {
        if !acked && self.nack.is_none() {
            self.nack = Some(phase);
        }
    }

    /// Fold in the status of a later sub-transaction
    pub fn merge(&mut self, other: AckStatus) {
        if self.nack.is_none() {
            self.nack = other.nack;
        }
    }

    /// True if every recorded slot was acknowledged
    pub fn is_acknowledged(&self) -> bool {
        self.nack.is_none()
    }

    /// Phase of the first NACK, if any
    pub fn first_nack(&self) -> Option<Phase> {
        self.nack
    }

    /// Convert into a `Result`, treating any NACK as an error
    pub fn into_result(self) -> Result<(), Error> {
        match self.nack {
            None => Ok(()),
            Some(phase) => Err(Error::Nack(phase)),
        }
    }
}

/// A value read or written together with its ACK status
///
/// On a NACK the value is still present; it is whatever the line held,
/// typically `0xFF` from the pull-up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transfer<T> {
    /// Data transferred
    pub value: T,
    /// ACK slots observed while transferring it
    pub status: AckStatus,
}

impl<T> Transfer<T> {
    /// Bundle a value with its status
    pub fn new(value: T, status: AckStatus) -> Self {
        Self { value, status }
    }

    /// True if every byte was acknowledged
    pub fn is_acknowledged(&self) -> bool {
        self.status.is_acknowledged()
    }

    /// The value, or `Error::Nack` if any slot was not acknowledged
    pub fn acknowledged(self) -> Result<T, Error> {
        self.status.into_result().map(|()| self.value)
    }

    /// Transform the value, keeping the status
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Transfer<U> {
        Transfer {
            value: f(self.value),
            status: self.status,
        }
    }
}
