//! Host-side driver for latching microwave switches
//!
//! The switches are wired to the digital outputs of a controller. Pulsing a
//! port's set pin connects the port, pulsing its reset pin disconnects it. The
//! switches can't be queried, so the driver tracks every port's state from the
//! pulses it sends, and derives each switch's route from that.


pub mod bank;
pub mod config;
pub mod conn;
pub mod controller;
pub mod error;
pub mod pin;
pub mod port;
pub mod portmap;
pub mod recorder;
pub mod switch;


pub use self::{
    bank::SwitchBank,
    config::Config,
    conn::Conn,
    controller::Controller,
    error::{
        Error,
        Result,
        ValidationError,
    },
    pin::DigitalOutputs,
    port::{
        Port,
        PortState,
    },
    portmap::PortMap,
    recorder::Recorder,
    switch::{
        Route,
        RouteTarget,
        SettleTime,
        Switch,
    },
};

pub use protocol;
