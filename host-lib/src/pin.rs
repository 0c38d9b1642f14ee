//! The pulse primitive: what the switch logic needs from a controller
//!
//! Everything that touches hardware goes through [`DigitalOutputs`], which is
//! handed explicitly to each operation that needs it. Nothing in this crate
//! keeps a global registry of pins.


use std::{
    sync::{
        Mutex,
        PoisonError,
    },
    time::Duration,
};

use protocol::pin::{
    Direction,
    Level,
    Pin,
};

use crate::conn::ConnSendError;


/// Digital output pins on a controller
pub trait DigitalOutputs {
    /// Configure `pin` as input or output
    fn set_direction(&mut self, pin: Pin, direction: Direction)
        -> Result<(), OutputError>;

    /// Drive `pin` to a static level
    fn set_level(&mut self, pin: Pin, level: Level)
        -> Result<(), OutputError>;

    /// Drive `pin` to `level` for `duration`, then back to its previous level
    ///
    /// Implementations that drive real hardware block until `duration` has
    /// passed.
    fn pulse(&mut self, pin: Pin, level: Level, duration: Duration)
        -> Result<(), OutputError>;
}


/// Shares one controller between several users
///
/// The lock is taken for each command separately, so users that issue
/// sequences of commands interleave at command granularity. Callers that need
/// a sequence to stay together must serialize at a higher level.
pub struct Shared<'r, T>(pub &'r Mutex<T>);

impl<T> DigitalOutputs for Shared<'_, T>
    where T: DigitalOutputs
{
    fn set_direction(&mut self, pin: Pin, direction: Direction)
        -> Result<(), OutputError>
    {
        // A panic while holding the lock can't leave a half-sent command
        // behind, so a poisoned lock is still usable.
        self.0.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_direction(pin, direction)
    }

    fn set_level(&mut self, pin: Pin, level: Level)
        -> Result<(), OutputError>
    {
        self.0.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_level(pin, level)
    }

    fn pulse(&mut self, pin: Pin, level: Level, duration: Duration)
        -> Result<(), OutputError>
    {
        self.0.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pulse(pin, level, duration)
    }
}


/// A command to the controller failed
#[derive(Debug)]
pub enum OutputError {
    /// The command could not be sent
    Send(ConnSendError),

    /// The controller implementation refused the command
    Rejected {
        pin:    Pin,
        reason: String,
    },
}

impl From<ConnSendError> for OutputError {
    fn from(err: ConnSendError) -> Self {
        Self::Send(err)
    }
}

