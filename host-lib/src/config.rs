//! Switch bank configuration


use std::{
    collections::BTreeMap,
    fs::File,
    io::prelude::*,
    path::Path,
};

use indexmap::IndexMap;
use serde::Deserialize;

use protocol::pin::Pin;

use crate::{
    Error,
    ValidationError,
    conn::DEFAULT_BAUD_RATE,
    portmap::PortMap,
    switch::SettleTime,
};


/// Where [`Config::read`] looks for the configuration
pub const DEFAULT_PATH: &str = "switch-bank.toml";


/// The configuration options for a switch bank
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to the serial device connected to the controller
    pub controller: Option<String>,

    /// Baud rate of the serial connection to the controller
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Pulse length for all switches, in seconds
    pub settle_time: Option<f64>,

    /// Whether to disconnect all ports when the bank is created
    #[serde(default)]
    pub reset: bool,

    /// The switches, by name
    #[serde(default)]
    pub switches: BTreeMap<String, PortMapConfig>,
}

impl Config {
    /// Read configuration from the `switch-bank.toml` file
    pub fn read() -> Result<Self, ConfigReadError> {
        Self::read_from(DEFAULT_PATH)
    }

    /// Read configuration from a file
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ConfigReadError> {
        Self::read_inner(path.as_ref())
            .map_err(|err| ConfigReadError(err))
    }

    /// Parse configuration from a string
    pub fn parse(config: &str) -> Result<Self, ConfigReadError> {
        toml::from_str(config)
            .map_err(|err| ConfigReadError(err.into()))
    }

    fn read_inner(path: &Path) -> Result<Self, Error> {
        // Read configuration file
        let mut config = Vec::new();
        File::open(path)?
            .read_to_end(&mut config)?;

        // Parse configuration file
        let config = toml::from_slice(&config)?;

        Ok(config)
    }

    /// The configured settle time, or the default if none is configured
    pub fn settle_time(&self) -> Result<SettleTime, ValidationError> {
        match self.settle_time {
            Some(secs) => SettleTime::from_secs_f64(secs),
            None       => Ok(SettleTime::default()),
        }
    }
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}


/// How a switch's ports are wired
#[derive(Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum PortMapConfig {
    /// The name of one of the [`crate::portmap::PRESETS`]
    Preset(String),

    /// Port names mapped to `[reset pin, set pin]`, in the file's order
    Ports(IndexMap<String, (Pin, Pin)>),
}

impl PortMapConfig {
    pub fn resolve(&self) -> Result<PortMap, ValidationError> {
        match self {
            PortMapConfig::Preset(name) => {
                PortMap::preset(name)
            }
            PortMapConfig::Ports(ports) => {
                Ok(
                    ports
                        .iter()
                        .map(|(name, &(reset, set))| (name.as_str(), reset, set))
                        .collect()
                )
            }
        }
    }
}


/// Error reading the configuration file
#[derive(Debug)]
pub struct ConfigReadError(pub Error);
