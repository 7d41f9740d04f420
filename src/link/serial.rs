//! Serial port link (std only).

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::error::{bounded, ConnectionError};

use super::Link;

/// Read timeout for a single response.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// [`Link`] over an operating-system serial port.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialLink {
    /// Open `path` at `baud_rate`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Unavailable` if the port cannot be opened.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, ConnectionError> {
        log::info!("Opening controller on {} at {} baud", path, baud_rate);
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| ConnectionError::Unavailable {
                port: bounded(path),
                reason: bounded(&e.to_string()),
            })?;
        Ok(Self {
            port: Some(port),
            name: path.to_string(),
        })
    }

    /// Port path this link was opened on.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, serialport::Error> {
        self.port.as_mut().ok_or_else(|| {
            serialport::Error::new(serialport::ErrorKind::NoDevice, "port closed")
        })
    }
}

impl core::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerialLink")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

fn io_error(e: std::io::Error) -> serialport::Error {
    serialport::Error::new(serialport::ErrorKind::Io(e.kind()), e.to_string())
}

impl Link for SerialLink {
    type Error = serialport::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let port = self.port()?;
        port.write_all(bytes).map_err(io_error)?;
        port.flush().map_err(io_error)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.port()?.read_exact(buf).map_err(io_error)
    }

    fn bytes_pending(&mut self) -> Result<usize, Self::Error> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if self.port.take().is_some() {
            log::info!("Closed controller on {}", self.name);
        }
        Ok(())
    }
}
