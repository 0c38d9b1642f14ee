//! Commands understood by the digital I/O controller that drives the switches
//!
//! The controller speaks a line-based text protocol. Every [`Command`] renders
//! to exactly one line through its `Display` implementation; the terminator is
//! added by whoever writes it to the wire.


#![no_std]


pub mod pin;


use core::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use self::pin::Pin;


/// A command from the host to the controller
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum Command {
    /// Configure a pin as input or output
    SetDirection(pin::SetDirection<Pin>),

    /// Drive a pin to a static level
    SetLevel(pin::SetLevel<Pin>),

    /// Drive a pin to a level for a limited time
    Pulse(pin::Pulse<Pin>),
}

impl From<pin::SetDirection<Pin>> for Command {
    fn from(set_direction: pin::SetDirection<Pin>) -> Self {
        Self::SetDirection(set_direction)
    }
}

impl From<pin::SetLevel<Pin>> for Command {
    fn from(set_level: pin::SetLevel<Pin>) -> Self {
        Self::SetLevel(set_level)
    }
}

impl From<pin::Pulse<Pin>> for Command {
    fn from(pulse: pin::Pulse<Pin>) -> Self {
        Self::Pulse(pulse)
    }
}

impl Command {
    /// The pin this command addresses
    pub fn pin(&self) -> Pin {
        match self {
            Command::SetDirection(command) => command.pin,
            Command::SetLevel(command)     => command.pin,
            Command::Pulse(command)        => command.pin,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::SetDirection(pin::SetDirection { pin, direction }) => {
                write!(f, "SOUR:DIG:IO{} {}", pin, direction)
            }
            Command::SetLevel(pin::SetLevel { pin, level }) => {
                write!(f, "SOUR:DIG:DATA{} {}", pin, level.digit())
            }
            Command::Pulse(pin::Pulse { pin, level, duration }) => {
                write!(
                    f,
                    "SOUR:DIG:PULS{} {},{:.6}",
                    pin,
                    level.digit(),
                    duration.as_secs_f64(),
                )
            }
        }
    }
}
