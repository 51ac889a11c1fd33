//! Core traits for serial port abstraction.
//!
//! `SerialLink` is the capability the shells talk to, `PortOpener` is how they
//! get one. Real hardware and the in-memory mocks implement both, so every
//! shell path can run against a fake device.

use super::error::PortError;
use std::time::Duration;

/// Parameters used when opening a link.
///
/// The board speaks 8N1 without flow control, so only the baud rate and the
/// internal poll interval are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Timeout of a single low-level read. `read_line` keeps polling across
    /// timeouts, so this only bounds how long one poll blocks.
    pub poll_timeout: Duration,
}

impl PortConfiguration {
    /// Default configuration at the given baud rate.
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            poll_timeout: Duration::from_millis(100),
        }
    }
}

/// An open, exclusively owned serial connection.
///
/// Dropping the value closes the port.
pub trait SerialLink: std::fmt::Debug {
    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Currently configured baud rate.
    fn baud_rate(&self) -> u32;

    /// Reconfigure the baud rate of the open port in place.
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError>;

    /// Write all bytes to the port.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError>;

    /// Block until one full line has been received.
    ///
    /// The returned text has its `\r\n` / `\n` terminator removed.
    fn read_line(&mut self) -> Result<String, PortError>;
}

/// Opens serial links by name.
pub trait PortOpener {
    /// Open `port_name` with the given configuration.
    fn open(
        &self,
        port_name: &str,
        config: PortConfiguration,
    ) -> Result<Box<dyn SerialLink>, PortError>;
}
