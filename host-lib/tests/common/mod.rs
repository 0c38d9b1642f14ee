//! Support code shared by the test suites


#![allow(dead_code)]


use host_lib::{
    PortMap,
    ValidationError,
    bank::BankInitError,
    config::ConfigReadError,
    protocol::pin::Pin,
    switch::SwitchError,
};


/// Result type specific to this test suite
pub type Result<T = ()> = std::result::Result<T, Error>;


/// Error type specific to this test suite
#[derive(Debug)]
pub enum Error {
    BankInit(BankInitError),
    ConfigRead(ConfigReadError),
    Switch(SwitchError),
    Validation(ValidationError),
}

impl From<BankInitError> for Error {
    fn from(err: BankInitError) -> Self {
        Self::BankInit(err)
    }
}

impl From<ConfigReadError> for Error {
    fn from(err: ConfigReadError) -> Self {
        Self::ConfigRead(err)
    }
}

impl From<SwitchError> for Error {
    fn from(err: SwitchError) -> Self {
        Self::Switch(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}


pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}


/// Two ports, `A` and `B`, each with its own pins
///
/// `A` resets on 1 and sets on 2, `B` resets on 3 and sets on 4.
pub fn two_ports() -> PortMap {
    PortMap::new()
        .with_port("A", Pin(1), Pin(2))
        .with_port("B", Pin(3), Pin(4))
}

/// Three ports, `A`, `B` and `C`, each with its own pins
pub fn three_ports() -> PortMap {
    two_ports().with_port("C", Pin(5), Pin(6))
}


/// Replay a pulse trace and check that no port was ever connected while
/// another one was known to be connected
///
/// Pulses on pins that don't belong to `map` are skipped.
pub fn assert_break_before_make(map: &PortMap, pulses: &[Pin]) {
    let mut connected = vec![false; map.len()];

    for (n, &pin) in pulses.iter().enumerate() {
        for (i, port) in map.ports().iter().enumerate() {
            if pin == port.set_pin {
                let others = connected
                    .iter()
                    .enumerate()
                    .filter(|&(j, &is_connected)| j != i && is_connected)
                    .count();
                assert_eq!(
                    others, 0,
                    "pulse {} connects {} while another port is connected",
                    n, port.name,
                );
            }
        }

        for (i, port) in map.ports().iter().enumerate() {
            if pin == port.set_pin {
                connected[i] = true;
            }
            if pin == port.reset_pin {
                connected[i] = false;
            }
        }
    }
}
