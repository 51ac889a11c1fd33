use crate::port::PortError;
use thiserror::Error;

/// Result alias used by the shells and the binary.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type.
///
/// Only `NoPortAvailable` and startup `PortOpen` failures end the
/// program; everything else is reported by the shells and the menu is shown
/// again.
#[derive(Debug, Error)]
pub enum AppError {
    /// Enumeration found nothing to connect to.
    #[error("no serial port available!")]
    NoPortAvailable,

    /// Opening a specific port failed.
    #[error("could not open {port}: {source}")]
    PortOpen {
        port: String,
        #[source]
        source: PortError,
    },

    /// Any other serial port failure.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Reading from or writing to the operator console failed.
    #[error("console I/O error: {0}")]
    Console(#[from] std::io::Error),
}

impl AppError {
    /// Wrap an open failure with the port it concerns.
    pub fn port_open(port: impl Into<String>, source: PortError) -> Self {
        Self::PortOpen {
            port: port.into(),
            source,
        }
    }
}
