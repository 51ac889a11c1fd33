//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own `SerialLink`
//! trait so the shells never touch the driver directly.

use super::error::PortError;
use super::traits::{PortConfiguration, PortOpener, SerialLink};
use std::io::{ErrorKind, Read, Write};

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
    /// Bytes received after the last complete line.
    lines: LineReader,
}

impl SyncSerialPort {
    /// Open a serial port with the given configuration.
    ///
    /// # Arguments
    /// * `port_name` - The system path to the serial port (e.g., "/dev/ttyUSB0" or "COM3")
    /// * `config` - Configuration parameters for the port
    ///
    /// # Example
    /// ```no_run
    /// use testprotocol::port::{PortConfiguration, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyUSB0", PortConfiguration::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: PortConfiguration) -> Result<Self, PortError> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(config.poll_timeout)
            .open()
            .map_err(|e| PortError::from_serial(port_name, e))?;

        tracing::debug!(port = port_name, baud = config.baud_rate, "opened serial port");

        Ok(Self {
            port,
            name: port_name.to_string(),
            lines: LineReader::default(),
        })
    }
}

impl SerialLink for SyncSerialPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        // The driver only fails here if the handle went away underneath us.
        self.port.baud_rate().unwrap_or_default()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError> {
        self.port
            .set_baud_rate(baud_rate)
            .map_err(|e| PortError::from_serial(&self.name, e))
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, PortError> {
        let port = &mut self.port;
        self.lines.read_line(|buf| match port.read(buf) {
            Ok(n) => Ok(n),
            // Poll timeouts are not failures: the response wait is unbounded.
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(PortError::Io(e)),
        })
    }
}

impl Drop for SyncSerialPort {
    fn drop(&mut self) {
        tracing::debug!(port = %self.name, "closed serial port");
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}

/// Opens real hardware through `serialport`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPortOpener;

impl PortOpener for SystemPortOpener {
    fn open(
        &self,
        port_name: &str,
        config: PortConfiguration,
    ) -> Result<Box<dyn SerialLink>, PortError> {
        Ok(Box::new(SyncSerialPort::open(port_name, config)?))
    }
}

/// Longest line kept before it is handed out without a terminator.
const MAX_LINE_LEN: usize = 4096;

/// Splits a byte stream into text lines.
#[derive(Debug, Default)]
struct LineReader {
    pending: Vec<u8>,
}

impl LineReader {
    /// Pull bytes through `fill` until a `\n` shows up. A fill result of zero
    /// bytes means "nothing yet" and is polled again.
    ///
    /// A board that never sends `\n` gets its output returned in pieces of
    /// `MAX_LINE_LEN` bytes.
    fn read_line<F>(&mut self, mut fill: F) -> Result<String, PortError>
    where
        F: FnMut(&mut [u8]) -> Result<usize, PortError>,
    {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                return Ok(decode_line(&line));
            }
            if self.pending.len() >= MAX_LINE_LEN {
                let line: Vec<u8> = self.pending.drain(..MAX_LINE_LEN).collect();
                return Ok(decode_line(&line));
            }
            let n = fill(&mut chunk)?;
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }
}

/// Decode one raw line, dropping the trailing `\n` and an optional `\r`.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
