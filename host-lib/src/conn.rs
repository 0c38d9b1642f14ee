use std::{
    fmt,
    io::{
        self,
        Write as _,
    },
    time::Duration,
};

use protocol::Command;

use crate::Error;


/// Baud rate used when the configuration doesn't name one
pub const DEFAULT_BAUD_RATE: u32 = 115200;


/// A connection to the switch controller
///
/// Commands are written as text, one line each.
pub struct Conn {
    port: Box<dyn io::Write + Send>,
}

impl Conn {
    /// Open the connection
    ///
    /// `path` is the path to the serial device file that connects to the
    /// controller.
    pub fn new(path: &str, baud_rate: u32) -> Result<Self, ConnInitError> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|err| ConnInitError(err))?;

        log::info!("Opened controller connection on {} ({} baud)",
            path, baud_rate);

        Ok(Self::from_writer(port))
    }

    /// Wrap something that already accepts the controller's commands
    ///
    /// This is how connections that are not a local serial device (a socket,
    /// for example) are plugged in.
    pub fn from_writer<W>(writer: W) -> Self
        where W: io::Write + Send + 'static
    {
        Self {
            port: Box::new(writer),
        }
    }

    /// Send a command
    pub fn send(&mut self, command: &Command) -> Result<(), ConnSendError> {
        self.send_inner(command)
            .map_err(|err| ConnSendError(err))
    }

    fn send_inner(&mut self, command: &Command) -> Result<(), Error> {
        log::trace!("-> {}", command);

        writeln!(self.port, "{}", command)?;
        self.port.flush()?;

        Ok(())
    }
}

impl fmt::Debug for Conn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Conn").finish_non_exhaustive()
    }
}


/// Error initializing connection
#[derive(Debug)]
pub struct ConnInitError(pub serialport::Error);


/// Error sending data through a connection
#[derive(Debug)]
pub struct ConnSendError(pub Error);
