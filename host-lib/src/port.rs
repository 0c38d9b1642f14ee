//! Tracks the connection state of a single switch port
//!
//! Latching switches don't report their position. A port's state is only
//! known because this driver remembers which of its pins was pulsed last.


use std::{
    fmt,
    time::Duration,
};

use protocol::pin::{
    Direction,
    Level,
    Pin,
};

use crate::pin::{
    DigitalOutputs,
    OutputError,
};


/// What the driver knows about a port
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PortState {
    /// The set pin was pulsed last
    Connected,

    /// The reset pin was pulsed last
    Disconnected,

    /// Neither pin has been pulsed since the port was created
    Unknown,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PortState::Connected    => "Connected",
            PortState::Disconnected => "Disconnected",
            PortState::Unknown      => "Unknown",
        };
        f.write_str(s)
    }
}


/// A single port on a latching switch
#[derive(Debug)]
pub struct Port {
    name:      String,
    reset_pin: Pin,
    set_pin:   Pin,
    state:     PortState,
}

impl Port {
    /// Create a port and put both of its pins into a quiescent state
    ///
    /// Both pins are driven low and configured as outputs. This doesn't move
    /// the switch, so the port's state is `Unknown` afterwards.
    pub fn new<O>(
        name:      impl Into<String>,
        reset_pin: Pin,
        set_pin:   Pin,
        outputs:   &mut O,
    )
        -> Result<Self, OutputError>
        where O: DigitalOutputs
    {
        for &pin in &[set_pin, reset_pin] {
            outputs.set_level(pin, Level::Low)?;
            outputs.set_direction(pin, Direction::Out)?;
        }

        Ok(
            Self {
                name: name.into(),
                reset_pin,
                set_pin,
                state: PortState::Unknown,
            }
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pin that disconnects this port when pulsed
    pub fn reset_pin(&self) -> Pin {
        self.reset_pin
    }

    /// The pin that connects this port when pulsed
    pub fn set_pin(&self) -> Pin {
        self.set_pin
    }

    /// Tell the port that `pin` has just been pulsed
    ///
    /// Pins that belong to neither of this port's pins are ignored.
    pub fn notify(&mut self, pin: Pin) {
        if pin == self.set_pin {
            self.state = PortState::Connected;
        }
        if pin == self.reset_pin {
            self.state = PortState::Disconnected;
        }
    }

    /// The port's current state
    pub fn read(&self) -> PortState {
        self.state
    }

    /// Connect or disconnect the port
    ///
    /// Pulses the set pin (if `connect` is `true`) or the reset pin for
    /// `duration`, then records the result. Returns the pulsed pin, so the
    /// owner can notify other ports that share it.
    ///
    /// If the pulse fails, the state is left as it was.
    pub fn write<O>(&mut self,
        connect:  bool,
        duration: Duration,
        outputs:  &mut O,
    )
        -> Result<Pin, OutputError>
        where O: DigitalOutputs
    {
        let pin = if connect { self.set_pin } else { self.reset_pin };

        log::debug!("Pulsing pin {} to {} port {} ({:?})",
            pin,
            if connect { "connect" } else { "disconnect" },
            self.name,
            duration,
        );

        outputs.pulse(pin, Level::High, duration)?;
        self.notify(pin);

        Ok(pin)
    }
}
