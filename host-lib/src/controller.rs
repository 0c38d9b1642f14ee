use std::{
    thread::sleep,
    time::Duration,
};

use protocol::{
    Command,
    pin::{
        self,
        Direction,
        Level,
        Pin,
    },
};

use crate::{
    conn::Conn,
    pin::{
        DigitalOutputs,
        OutputError,
    },
};


/// The digital I/O controller the switches are wired to
///
/// The controller executes pulses on its own, but this driver has no way to
/// learn when a pulse has completed. `pulse` therefore waits for the pulse
/// duration after sending the command, before it reports success.
#[derive(Debug)]
pub struct Controller {
    conn: Conn,
}

impl Controller {
    pub fn new(conn: Conn) -> Self {
        Self {
            conn,
        }
    }

    fn send<C>(&mut self, command: C) -> Result<(), OutputError>
        where C: Into<Command>
    {
        self.conn.send(&command.into())?;
        Ok(())
    }
}

impl DigitalOutputs for Controller {
    fn set_direction(&mut self, pin: Pin, direction: Direction)
        -> Result<(), OutputError>
    {
        self.send(pin::SetDirection { pin, direction })
    }

    fn set_level(&mut self, pin: Pin, level: Level)
        -> Result<(), OutputError>
    {
        self.send(pin::SetLevel { pin, level })
    }

    fn pulse(&mut self, pin: Pin, level: Level, duration: Duration)
        -> Result<(), OutputError>
    {
        self.send(pin::Pulse { pin, level, duration })?;
        sleep(duration);

        Ok(())
    }
}
