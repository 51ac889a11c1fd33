//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that behaves like the board on the other end of
//! the cable without requiring hardware, and a `MockPortOpener` that hands out
//! mocks by name.

use super::error::PortError;
use super::sync_port::decode_line;
use super::traits::{PortConfiguration, PortOpener, SerialLink};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// Current baud rate.
    baud_rate: u32,
    /// Baud rates the fake driver refuses.
    rejected_bauds: Vec<u32>,
    /// Number of times a link to this mock was dropped.
    close_count: usize,
    /// Links to this mock currently alive.
    open_links: usize,
}

/// Mock serial port for testing.
///
/// Clones share state, so a test can keep one clone for inspection while the
/// shell owns another. Once its queued input is used up, `read_line` fails
/// with `WouldBlock` instead of blocking, which makes "never completes"
/// behaviour observable.
///
/// # Example
/// ```
/// use testprotocol::port::{MockSerialPort, SerialLink};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_line("Test 1 done");
///
/// port.write_bytes(b"00001\r\n").unwrap();
/// assert_eq!(port.read_line().unwrap(), "Test 1 done");
/// assert_eq!(port.written(), b"00001\r\n");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                baud_rate: PortConfiguration::default().baud_rate,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockPortState> {
        // A poisoned lock only means another test thread panicked mid-call;
        // the queue itself is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue raw bytes to be returned by subsequent reads.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state().read_queue.extend(data);
    }

    /// Enqueue one CRLF-terminated response line, the way the firmware sends them.
    pub fn enqueue_line(&mut self, line: &str) {
        self.enqueue_read(format!("{line}\r\n").as_bytes());
    }

    /// Make the fake driver refuse `baud_rate`.
    pub fn reject_baud(&mut self, baud_rate: u32) {
        self.state().rejected_bauds.push(baud_rate);
    }

    /// Get a copy of every write, one entry per call.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// All written bytes concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.state().write_log.concat()
    }

    /// Get the number of bytes still waiting to be read.
    pub fn available_bytes(&self) -> usize {
        self.state().read_queue.len()
    }

    /// How many links to this mock have been closed.
    pub fn close_count(&self) -> usize {
        self.state().close_count
    }

    /// Number of links to this mock that are currently open.
    pub fn open_links(&self) -> usize {
        self.state().open_links
    }

    /// Current baud rate as seen by the fake driver.
    pub fn current_baud(&self) -> u32 {
        self.state().baud_rate
    }
}

impl SerialLink for MockSerialPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        self.state().baud_rate
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError> {
        let mut state = self.state();
        if state.rejected_bauds.contains(&baud_rate) {
            return Err(PortError::config(format!("unsupported baud rate {baud_rate}")));
        }
        state.baud_rate = baud_rate;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.state().write_log.push(data.to_vec());
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, PortError> {
        let mut state = self.state();
        let Some(pos) = state.read_queue.iter().position(|&b| b == b'\n') else {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "No complete line available",
            )));
        };
        let line: Vec<u8> = state.read_queue.drain(..=pos).collect();
        Ok(decode_line(&line))
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

/// A link handed out by `MockPortOpener`; records its own close on drop.
#[derive(Debug)]
struct MockLink(MockSerialPort);

impl SerialLink for MockLink {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn baud_rate(&self) -> u32 {
        self.0.baud_rate()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError> {
        self.0.set_baud_rate(baud_rate)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.0.write_bytes(data)
    }

    fn read_line(&mut self) -> Result<String, PortError> {
        self.0.read_line()
    }
}

impl Drop for MockLink {
    fn drop(&mut self) {
        let mut state = self.0.state();
        state.close_count += 1;
        state.open_links -= 1;
    }
}

/// Opener that only knows the mocks registered with it.
#[derive(Debug, Default, Clone)]
pub struct MockPortOpener {
    ports: HashMap<String, MockSerialPort>,
    open_log: Arc<Mutex<Vec<String>>>,
    peak_open: Arc<Mutex<usize>>,
}

impl MockPortOpener {
    /// Create an opener with no ports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mock; opening its name returns a clone sharing its state.
    pub fn with_port(mut self, port: MockSerialPort) -> Self {
        self.ports.insert(port.name.clone(), port);
        self
    }

    /// Highest number of links that were open at the same time, across all
    /// registered ports.
    pub fn peak_open_links(&self) -> usize {
        *self.peak_open.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Names passed to `open`, successful or not, in call order.
    pub fn open_attempts(&self) -> Vec<String> {
        self.open_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl PortOpener for MockPortOpener {
    fn open(
        &self,
        port_name: &str,
        config: PortConfiguration,
    ) -> Result<Box<dyn SerialLink>, PortError> {
        self.open_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(port_name.to_string());

        let mut port = self
            .ports
            .get(port_name)
            .cloned()
            .ok_or_else(|| PortError::not_found(port_name))?;
        port.set_baud_rate(config.baud_rate)?;
        port.state().open_links += 1;

        let open_now: usize = self.ports.values().map(MockSerialPort::open_links).sum();
        let mut peak = self.peak_open.lock().unwrap_or_else(|e| e.into_inner());
        *peak = (*peak).max(open_now);

        Ok(Box::new(MockLink(port)))
    }
}
