//! A controller stand-in that only records what it was told to do


use std::time::Duration;

use protocol::{
    Command,
    pin::{
        self,
        Direction,
        Level,
        Pin,
    },
};

use crate::pin::{
    DigitalOutputs,
    OutputError,
};


/// Records every command instead of sending it
///
/// Useful for dry runs, and for checking the exact command sequence a switch
/// operation produces. Pulses return immediately.
#[derive(Debug, Default)]
pub struct Recorder {
    trace:     Vec<Command>,
    attempted: usize,
    fail_on:   Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th command (counting from zero) fail
    ///
    /// The failing command is not recorded. All other commands succeed.
    pub fn fail_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// All commands recorded so far, oldest first
    pub fn trace(&self) -> &[Command] {
        &self.trace
    }

    /// The pulses recorded so far, oldest first
    pub fn pulses(&self) -> Vec<pin::Pulse<Pin>> {
        self.trace
            .iter()
            .filter_map(|command| match command {
                Command::Pulse(pulse) => Some(*pulse),
                _                     => None,
            })
            .collect()
    }

    /// The pins pulsed so far, oldest first
    pub fn pulsed_pins(&self) -> Vec<Pin> {
        self.pulses()
            .into_iter()
            .map(|pulse| pulse.pin)
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.trace.clear();
    }

    fn record<C>(&mut self, command: C) -> Result<(), OutputError>
        where C: Into<Command>
    {
        let command = command.into();

        let n = self.attempted;
        self.attempted += 1;

        if self.fail_on == Some(n) {
            return Err(
                OutputError::Rejected {
                    pin:    command.pin(),
                    reason: format!("injected failure on command {}", n),
                }
            );
        }

        self.trace.push(command);
        Ok(())
    }
}

impl DigitalOutputs for Recorder {
    fn set_direction(&mut self, pin: Pin, direction: Direction)
        -> Result<(), OutputError>
    {
        self.record(pin::SetDirection { pin, direction })
    }

    fn set_level(&mut self, pin: Pin, level: Level)
        -> Result<(), OutputError>
    {
        self.record(pin::SetLevel { pin, level })
    }

    fn pulse(&mut self, pin: Pin, level: Level, duration: Duration)
        -> Result<(), OutputError>
    {
        self.record(pin::Pulse { pin, level, duration })
    }
}
