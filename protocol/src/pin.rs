//! Generic protocol related to pins
//!
//! The types in this module are not specific to any switch setup, and can be
//! re-used for different controllers.


use core::{
    fmt,
    str::FromStr,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};


/// Identifies a digital I/O pin on the controller
#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Ord, PartialOrd,
    Hash,
)]
#[serde(transparent)]
pub struct Pin(pub u8);

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// Sent by the host to configure a pin as input or output
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct SetDirection<Id> {
    /// The pin whose direction should be set
    pub pin: Id,

    /// The new direction of the pin
    pub direction: Direction,
}


/// Sent by the host to command the controller to set a pin to a specific level
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct SetLevel<Id> {
    /// The pin whose level should be set
    pub pin: Id,

    /// The new level of the pin
    pub level: Level,
}


/// Sent by the host to drive a pin to a level for a limited time
///
/// Once `duration` has passed, the controller returns the pin to its previous
/// level on its own.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct Pulse<Id> {
    /// The pin to pulse
    pub pin: Id,

    /// The level the pin is driven to during the pulse
    pub level: Level,

    /// How long the pin stays at `level`
    pub duration: Duration,
}


/// Represents the electrical level of a pin
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// The digit the controller uses for this level
    pub fn digit(self) -> u8 {
        match self {
            Level::High => 1,
            Level::Low  => 0,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}


/// Whether a pin is read from or driven by the controller
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum Direction {
    #[serde(rename = "IN")]
    In,

    #[serde(rename = "OUT")]
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::In  => f.write_str("IN"),
            Direction::Out => f.write_str("OUT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("IN") {
            return Ok(Direction::In);
        }
        if s.eq_ignore_ascii_case("OUT") {
            return Ok(Direction::Out);
        }

        Err(ParseDirectionError)
    }
}


/// A direction was neither `IN` nor `OUT`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseDirectionError;

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("direction must be IN or OUT")
    }
}
