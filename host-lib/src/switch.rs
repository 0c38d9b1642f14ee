//! Route control for a single latching switch
//!
//! A switch connects at most one of its ports at a time. Since the hardware
//! doesn't report anything back, the route is derived from what each [`Port`]
//! remembers about the pulses it has seen.
//!
//! Nothing here can detect a pulse that didn't arrive at the switch (a loose
//! wire, a jammed relay). If that happens, the tracked state silently diverges
//! from the real one until the next pulse on the affected port.


use std::{
    convert::Infallible,
    fmt,
    str::FromStr,
    time::Duration,
};

use crate::{
    ValidationError,
    pin::{
        DigitalOutputs,
        OutputError,
    },
    port::{
        Port,
        PortState,
    },
    portmap::PortMap,
};


/// Shortest pulse the switch drivers are specified for
pub const MIN_SETTLE_TIME: Duration = Duration::from_nanos(500);

/// Longest pulse that is still safe for the switch coils
pub const MAX_SETTLE_TIME: Duration = Duration::from_secs(1);

/// Pulse length used unless configured otherwise
pub const DEFAULT_SETTLE_TIME: Duration = Duration::from_millis(10);

/// Text form of [`Route::NoConnection`] and [`RouteTarget::NoConnection`]
pub const ROUTE_NONE: &str = "Disconnected";

/// Text form of [`Route::Ambiguous`]
pub const ROUTE_MULTIPLE: &str = "Multiple";

/// Text form of [`Route::Unknown`]
pub const ROUTE_UNKNOWN: &str = "Unknown";


/// How long a pin is pulsed to make the switch latch
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SettleTime(Duration);

impl SettleTime {
    /// Validate a pulse length
    ///
    /// Accepts anything from [`MIN_SETTLE_TIME`] to [`MAX_SETTLE_TIME`],
    /// inclusive.
    pub fn new(duration: Duration) -> Result<Self, ValidationError> {
        if duration < MIN_SETTLE_TIME || duration > MAX_SETTLE_TIME {
            return Err(
                ValidationError::SettleTimeOutOfRange(duration.as_secs_f64())
            );
        }

        Ok(Self(duration))
    }

    /// Validate a pulse length given in seconds
    pub fn from_secs_f64(secs: f64) -> Result<Self, ValidationError> {
        let in_range = secs >= MIN_SETTLE_TIME.as_secs_f64()
            && secs <= MAX_SETTLE_TIME.as_secs_f64();

        // Also rejects NaN, which `Duration::from_secs_f64` would panic on.
        if !in_range {
            return Err(ValidationError::SettleTimeOutOfRange(secs));
        }

        // Converting can round to just outside of the range.
        let duration = Duration::from_secs_f64(secs)
            .max(MIN_SETTLE_TIME)
            .min(MAX_SETTLE_TIME);

        Ok(Self(duration))
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl Default for SettleTime {
    fn default() -> Self {
        Self(DEFAULT_SETTLE_TIME)
    }
}


/// The aggregate connection state of a switch
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    /// Exactly this port is connected, all others are disconnected
    Port(String),

    /// All ports are disconnected
    NoConnection,

    /// More than one port is connected
    Ambiguous,

    /// At least one port is in an unknown state
    Unknown,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Route::Port(name)   => f.write_str(name),
            Route::NoConnection => f.write_str(ROUTE_NONE),
            Route::Ambiguous    => f.write_str(ROUTE_MULTIPLE),
            Route::Unknown      => f.write_str(ROUTE_UNKNOWN),
        }
    }
}

impl From<RouteTarget> for Route {
    fn from(target: RouteTarget) -> Self {
        match target {
            RouteTarget::Port(name)   => Route::Port(name),
            RouteTarget::NoConnection => Route::NoConnection,
        }
    }
}


/// A route that can be requested from a switch
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteTarget {
    /// Connect this port, disconnect all others
    Port(String),

    /// Disconnect all ports
    NoConnection,
}

impl RouteTarget {
    pub fn port(name: impl Into<String>) -> Self {
        RouteTarget::Port(name.into())
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteTarget::Port(name)   => f.write_str(name),
            RouteTarget::NoConnection => f.write_str(ROUTE_NONE),
        }
    }
}

impl FromStr for RouteTarget {
    type Err = Infallible;

    /// Parses [`ROUTE_NONE`] as `NoConnection`, anything else as a port name
    ///
    /// Whether the port exists is up to the switch to decide.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROUTE_NONE {
            return Ok(RouteTarget::NoConnection);
        }

        Ok(RouteTarget::port(s))
    }
}

impl From<&str> for RouteTarget {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(target) => target,
            Err(never) => match never {},
        }
    }
}


/// A latching switch with a fixed set of ports
#[derive(Debug)]
pub struct Switch {
    name:        String,
    ports:       Vec<Port>,
    settle_time: SettleTime,
}

impl Switch {
    /// Create a switch from a port map
    ///
    /// The map is validated before any pin is touched. Then the pins of every
    /// port are put into a quiescent state, which leaves the route `Unknown`.
    /// If `reset` is `true`, all ports are disconnected right away, giving a
    /// known route of [`Route::NoConnection`].
    pub fn new<O>(
        name:        impl Into<String>,
        map:         &PortMap,
        settle_time: SettleTime,
        reset:       bool,
        outputs:     &mut O,
    )
        -> Result<Self, SwitchError>
        where O: DigitalOutputs
    {
        let name = name.into();
        map.validate()?;

        let mut ports = Vec::with_capacity(map.len());
        for port in map.ports() {
            ports.push(
                Port::new(&port.name, port.reset_pin, port.set_pin, outputs)?
            );
        }

        let mut switch = Self {
            name,
            ports,
            settle_time,
        };

        if reset {
            switch.set_route(&RouteTarget::NoConnection, outputs)?;
        }

        Ok(switch)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The switch's ports, in the order they are visited
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// The port map this switch was created from
    pub fn port_map(&self) -> PortMap {
        self.ports
            .iter()
            .map(|port| (port.name(), port.reset_pin(), port.set_pin()))
            .collect()
    }

    pub fn settle_time(&self) -> SettleTime {
        self.settle_time
    }

    pub fn set_settle_time(&mut self, settle_time: SettleTime) {
        self.settle_time = settle_time;
    }

    /// Derive the route from the current port states
    ///
    /// A single port in an unknown state makes the whole route unknown, no
    /// matter what the other ports say.
    pub fn route(&self) -> Route {
        let mut connected = None;

        for port in &self.ports {
            match (port.read(), connected) {
                (PortState::Unknown, _) => {
                    return Route::Unknown;
                }
                (PortState::Connected, None) => {
                    connected = Some(Some(port.name()));
                }
                (PortState::Connected, Some(_)) => {
                    connected = Some(None);
                }
                (PortState::Disconnected, _) => {}
            }
        }

        match connected {
            None             => Route::NoConnection,
            Some(Some(name)) => Route::Port(name.to_owned()),
            Some(None)       => Route::Ambiguous,
        }
    }

    /// Change the route, breaking all other connections before making the new
    /// one
    ///
    /// Every port other than the target that isn't known to be disconnected
    /// gets a disconnect pulse first. Only then is the target connected, unless
    /// it already is. If all pulses arrive, [`Switch::route`] returns `target`
    /// afterwards.
    ///
    /// An unknown port name is rejected before anything is pulsed. If a pulse
    /// fails, the sequence stops there and nothing is rolled back. The route
    /// then reflects whatever was pulsed up to that point.
    pub fn set_route<O>(&mut self, target: &RouteTarget, outputs: &mut O)
        -> Result<(), SwitchError>
        where O: DigitalOutputs
    {
        let settle_time = self.settle_time;
        self.set_route_for(target, settle_time, outputs)
    }

    /// Like [`Switch::set_route`], with a pulse length just for this call
    pub fn set_route_for<O>(&mut self,
        target:      &RouteTarget,
        settle_time: SettleTime,
        outputs:     &mut O,
    )
        -> Result<(), SwitchError>
        where O: DigitalOutputs
    {
        let target_index = match target {
            RouteTarget::Port(name)   => Some(self.index_of(name)?),
            RouteTarget::NoConnection => None,
        };

        let duration = settle_time.duration();
        match self.set_route_inner(target_index, duration, outputs) {
            Ok(()) => {
                log::info!("{}: route set to {}", self.name, target);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "{}: route change to {} aborted ({:?}); route is now {}",
                    self.name,
                    target,
                    err,
                    self.route(),
                );
                Err(err.into())
            }
        }
    }

    fn set_route_inner<O>(&mut self,
        target:   Option<usize>,
        duration: Duration,
        outputs:  &mut O,
    )
        -> Result<(), OutputError>
        where O: DigitalOutputs
    {
        // Break. The state is read as each port is visited, as an earlier
        // pulse on a shared reset pin may already have disconnected it.
        for i in 0..self.ports.len() {
            if Some(i) == target {
                continue;
            }

            match self.ports[i].read() {
                PortState::Disconnected => {
                    log::debug!("{}: port {} already disconnected",
                        self.name, self.ports[i].name());
                }
                PortState::Connected | PortState::Unknown => {
                    self.write_port(i, false, duration, outputs)?;
                }
            }
        }

        // Make
        if let Some(i) = target {
            if self.ports[i].read() == PortState::Connected {
                log::debug!("{}: port {} already connected",
                    self.name, self.ports[i].name());
            }
            else {
                self.write_port(i, true, duration, outputs)?;
            }
        }

        Ok(())
    }

    /// The state of a single port
    pub fn port_state(&self, name: &str) -> Result<PortState, ValidationError> {
        let i = self.index_of(name)?;
        Ok(self.ports[i].read())
    }

    /// Connect or disconnect a single port, ignoring all others
    ///
    /// This bypasses the break-before-make sequence of [`Switch::set_route`],
    /// and can leave several ports connected. It's meant for diagnostics and
    /// manual override.
    pub fn set_port<O>(&mut self, name: &str, connect: bool, outputs: &mut O)
        -> Result<(), SwitchError>
        where O: DigitalOutputs
    {
        let settle_time = self.settle_time;
        self.set_port_for(name, connect, settle_time, outputs)
    }

    /// Like [`Switch::set_port`], with a pulse length just for this call
    pub fn set_port_for<O>(&mut self,
        name:        &str,
        connect:     bool,
        settle_time: SettleTime,
        outputs:     &mut O,
    )
        -> Result<(), SwitchError>
        where O: DigitalOutputs
    {
        let i = self.index_of(name)?;
        self.write_port(i, connect, settle_time.duration(), outputs)?;

        Ok(())
    }

    /// Pulse a port and let every other port know which pin was pulsed
    fn write_port<O>(&mut self,
        index:    usize,
        connect:  bool,
        duration: Duration,
        outputs:  &mut O,
    )
        -> Result<(), OutputError>
        where O: DigitalOutputs
    {
        let pin = self.ports[index].write(connect, duration, outputs)?;

        for (i, port) in self.ports.iter_mut().enumerate() {
            if i != index {
                port.notify(pin);
            }
        }

        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, ValidationError> {
        self.ports
            .iter()
            .position(|port| port.name() == name)
            .ok_or_else(|| ValidationError::UnknownPort(name.to_owned()))
    }
}


/// Error operating a switch
#[derive(Debug)]
pub enum SwitchError {
    /// The request was rejected before anything was pulsed
    Validation(ValidationError),

    /// A command to the controller failed
    ///
    /// Ports pulsed before the failure keep their new state.
    Output(OutputError),
}

impl From<ValidationError> for SwitchError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<OutputError> for SwitchError {
    fn from(err: OutputError) -> Self {
        Self::Output(err)
    }
}
