use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

use crate::{
    ValidationError,
    config::{
        Config,
        ConfigReadError,
    },
    conn::{
        Conn,
        ConnInitError,
    },
    controller::Controller,
    pin::{
        DigitalOutputs,
        Shared,
    },
    port::PortState,
    portmap::PortMap,
    switch::{
        Route,
        RouteTarget,
        SettleTime,
        Switch,
        SwitchError,
    },
};


/// A set of switches driven by one controller
///
/// Each switch sits behind its own lock, which is held for the whole of an
/// operation. Two route changes on the same switch therefore never interleave,
/// while different switches can be operated from different threads at the
/// same time. The controller itself is only locked per command.
pub struct SwitchBank<P> {
    outputs:  Mutex<P>,
    switches: BTreeMap<String, Mutex<Switch>>,
}

impl SwitchBank<Controller> {
    /// Create the bank described in the `switch-bank.toml` file
    pub fn open() -> Result<Self, BankInitError> {
        let config = Config::read()?;
        Self::open_with(&config)
    }

    /// Open the configured controller and create the configured switches
    pub fn open_with(config: &Config) -> Result<Self, BankInitError> {
        let path = config.controller
            .as_ref()
            .ok_or(NotConfiguredError("controller"))?;
        let conn = Conn::new(path, config.baud_rate)?;

        Self::from_config(config, Controller::new(conn))
    }
}

impl<P> SwitchBank<P>
    where P: DigitalOutputs
{
    /// Create an empty bank
    pub fn new(outputs: P) -> Self {
        Self {
            outputs:  Mutex::new(outputs),
            switches: BTreeMap::new(),
        }
    }

    /// Create the switches described by `config`, in name order
    pub fn from_config(config: &Config, outputs: P)
        -> Result<Self, BankInitError>
    {
        let settle_time = config.settle_time()?;

        // Resolve everything first, so a bad entry is caught before any pin
        // is touched.
        let mut maps: Vec<(&String, PortMap)> = Vec::new();
        for (name, map) in &config.switches {
            let map = map.resolve()?;
            map.validate()?;
            for (other, other_map) in &maps {
                if let Some(pin) = other_map.shared_pin(&map) {
                    return Err(
                        ValidationError::PinInUse {
                            switch: other.to_string(),
                            pin,
                        }
                        .into()
                    );
                }
            }
            maps.push((name, map));
        }

        let mut bank = Self::new(outputs);
        for (name, map) in maps {
            bank.add_switch(name, &map, settle_time, config.reset)?;
        }

        Ok(bank)
    }

    /// Create a switch and add it to the bank
    pub fn add_switch(&mut self,
        name:        &str,
        map:         &PortMap,
        settle_time: SettleTime,
        reset:       bool,
    )
        -> Result<(), SwitchError>
    {
        if self.switches.contains_key(name) {
            return Err(ValidationError::DuplicateSwitch(name.to_owned()).into());
        }

        // Pulses are only tracked within a switch. A pin used by two switches
        // would change one of them behind its back.
        for (other, switch) in &self.switches {
            let other_map = switch
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .port_map();
            if let Some(pin) = other_map.shared_pin(map) {
                return Err(
                    ValidationError::PinInUse {
                        switch: other.clone(),
                        pin,
                    }
                    .into()
                );
            }
        }

        let switch = Switch::new(
            name,
            map,
            settle_time,
            reset,
            &mut Shared(&self.outputs),
        )?;
        self.switches.insert(name.to_owned(), Mutex::new(switch));

        log::info!("Added switch {} with {} ports", name, map.len());

        Ok(())
    }

    /// The names of all switches, in order
    pub fn switch_names(&self) -> impl Iterator<Item=&str> {
        self.switches.keys().map(|name| name.as_str())
    }

    /// The port names of a switch, in the order the switch visits them
    pub fn port_names(&self, switch: &str)
        -> Result<Vec<String>, ValidationError>
    {
        let switch = self.lock(switch)?;
        let names = switch.ports()
            .iter()
            .map(|port| port.name().to_owned())
            .collect();

        Ok(names)
    }

    /// The current route of a switch
    pub fn route(&self, switch: &str) -> Result<Route, ValidationError> {
        Ok(self.lock(switch)?.route())
    }

    /// Change the route of a switch
    ///
    /// See [`Switch::set_route`].
    pub fn set_route(&self, switch: &str, target: &RouteTarget)
        -> Result<(), SwitchError>
    {
        self.lock(switch)?
            .set_route(target, &mut Shared(&self.outputs))
    }

    /// Change the route of a switch, with a pulse length just for this call
    ///
    /// See [`Switch::set_route_for`].
    pub fn set_route_for(&self,
        switch:      &str,
        target:      &RouteTarget,
        settle_time: SettleTime,
    )
        -> Result<(), SwitchError>
    {
        self.lock(switch)?
            .set_route_for(target, settle_time, &mut Shared(&self.outputs))
    }

    pub fn settle_time(&self, switch: &str)
        -> Result<SettleTime, ValidationError>
    {
        Ok(self.lock(switch)?.settle_time())
    }

    /// Change the pulse length of a switch
    ///
    /// The stored value is left alone, if `secs` is out of range.
    pub fn set_settle_time(&self, switch: &str, secs: f64)
        -> Result<(), ValidationError>
    {
        let mut switch = self.lock(switch)?;
        switch.set_settle_time(SettleTime::from_secs_f64(secs)?);

        Ok(())
    }

    /// The state of a single port
    pub fn port_state(&self, switch: &str, port: &str)
        -> Result<PortState, ValidationError>
    {
        self.lock(switch)?.port_state(port)
    }

    /// Connect or disconnect a single port, bypassing route control
    ///
    /// See [`Switch::set_port`].
    pub fn set_port(&self, switch: &str, port: &str, connect: bool)
        -> Result<(), SwitchError>
    {
        self.lock(switch)?
            .set_port(port, connect, &mut Shared(&self.outputs))
    }

    /// Run `f` with exclusive access to the controller
    pub fn with_outputs<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut outputs = self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut *outputs)
    }

    /// Dismantle the bank, returning the controller
    pub fn into_outputs(self) -> P {
        self.outputs
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self, name: &str)
        -> Result<MutexGuard<Switch>, ValidationError>
    {
        let switch = self.switches
            .get(name)
            .ok_or_else(|| ValidationError::UnknownSwitch(name.to_owned()))?;

        // A panic in the middle of a route change leaves the ports in a state
        // that reflects every pulse sent up to then. That's no different from
        // a failed pulse, so the switch stays usable.
        Ok(switch.lock().unwrap_or_else(PoisonError::into_inner))
    }
}


/// Error initializing a switch bank
#[derive(Debug)]
pub enum BankInitError {
    /// Error reading configuration
    ConfigRead(ConfigReadError),

    /// Something required is missing from the configuration
    NotConfigured(NotConfiguredError),

    /// Error opening the serial connection
    ConnInit(ConnInitError),

    /// The configuration contains an invalid value
    Validation(ValidationError),

    /// Error creating one of the switches
    Switch(SwitchError),
}

impl From<ConfigReadError> for BankInitError {
    fn from(err: ConfigReadError) -> Self {
        Self::ConfigRead(err)
    }
}

impl From<NotConfiguredError> for BankInitError {
    fn from(err: NotConfiguredError) -> Self {
        Self::NotConfigured(err)
    }
}

impl From<ConnInitError> for BankInitError {
    fn from(err: ConnInitError) -> Self {
        Self::ConnInit(err)
    }
}

impl From<ValidationError> for BankInitError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<SwitchError> for BankInitError {
    fn from(err: SwitchError) -> Self {
        Self::Switch(err)
    }
}


/// The resource you tried to access was not specified in the configuration file
#[derive(Clone, Copy, Debug)]
pub struct NotConfiguredError(pub &'static str);
