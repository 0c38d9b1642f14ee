use std::{
    fmt,
    io,
};

use protocol::pin::Pin;

use crate::switch::{
    MAX_SETTLE_TIME,
    MIN_SETTLE_TIME,
};


pub type Result<T = ()> = core::result::Result<T, Error>;


/// Low-level errors from the libraries this crate builds on
#[derive(Debug)]
pub enum Error {
    /// An I/O error occured
    Io(io::Error),

    /// The configuration file could not be parsed
    Toml(toml::de::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}


/// A request was rejected before any hardware action was taken
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    /// No preset port map exists under this name
    UnknownPreset(String),

    /// The switch has no port with this name
    UnknownPort(String),

    /// The bank has no switch with this name
    UnknownSwitch(String),

    /// The bank already has a switch with this name
    DuplicateSwitch(String),

    /// The settle time, in seconds, is outside the range the hardware allows
    SettleTimeOutOfRange(f64),

    /// A switch must have at least one port
    EmptyPortMap,

    /// Two ports of the same switch have the same name
    DuplicatePort(String),

    /// A port uses the same pin to set and to reset
    PinConflict {
        port: String,
        pin:  Pin,
    },

    /// A port's set pin is also used by another port of the same switch
    SetPinShared {
        port: String,
        pin:  Pin,
    },

    /// A pin is already used by another switch in the bank
    PinInUse {
        switch: String,
        pin:    Pin,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownPreset(name) => {
                write!(f, "unknown port map preset `{}`", name)
            }
            Self::UnknownPort(name) => {
                write!(f, "unknown port `{}`", name)
            }
            Self::UnknownSwitch(name) => {
                write!(f, "unknown switch `{}`", name)
            }
            Self::DuplicateSwitch(name) => {
                write!(f, "switch `{}` already exists", name)
            }
            Self::SettleTimeOutOfRange(secs) => {
                write!(
                    f,
                    "settle time {}s outside of [{}s, {}s]",
                    secs,
                    MIN_SETTLE_TIME.as_secs_f64(),
                    MAX_SETTLE_TIME.as_secs_f64(),
                )
            }
            Self::EmptyPortMap => {
                write!(f, "a switch needs at least one port")
            }
            Self::DuplicatePort(name) => {
                write!(f, "port `{}` appears more than once", name)
            }
            Self::PinConflict { port, pin } => {
                write!(f, "port `{}` uses pin {} to set and reset", port, pin)
            }
            Self::SetPinShared { port, pin } => {
                write!(
                    f,
                    "set pin {} of port `{}` is used by another port",
                    pin, port,
                )
            }
            Self::PinInUse { switch, pin } => {
                write!(f, "pin {} is already used by switch `{}`", pin, switch)
            }
        }
    }
}
