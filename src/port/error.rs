//! Port-specific error types.
//!
//! Kept separate from the application-level `AppError` so the port layer can be
//! used (and tested) without the shells.

use thiserror::Error;

/// Errors that can occur while enumerating, opening or talking to a serial port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration failed (e.g. the driver rejected a baud rate).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host platform has no known serial device naming scheme.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Map a `serialport` error the same way for every open/configure call site.
    pub(crate) fn from_serial(port_name: &str, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => Self::not_found(port_name),
            serialport::ErrorKind::InvalidInput => Self::config(err.to_string()),
            _ => Self::Serial(err),
        }
    }
}
