//! Shared test utilities for the session and enumeration tests.

#![allow(dead_code)]

use testprotocol::{MockPortOpener, MockSerialPort, Platform, PortEnumerator};

/// Enumerator that probes `COM1` … `COM256` against the mock opener.
pub fn windows_enumerator() -> PortEnumerator {
    PortEnumerator::new(Platform::Windows, "/nonexistent")
}

/// Create a mock board on `port_name` with pre-programmed response lines.
///
/// # Example
/// ```ignore
/// let board = board_with_lines("COM3", &["Message Received: 1", "Test 1 done"]);
/// ```
pub fn board_with_lines(port_name: &str, lines: &[&str]) -> MockSerialPort {
    let mut board = MockSerialPort::new(port_name);
    for line in lines {
        board.enqueue_line(line);
    }
    board
}

/// Opener knowing exactly the given boards.
pub fn opener_for(boards: &[&MockSerialPort]) -> MockPortOpener {
    boards
        .iter()
        .fold(MockPortOpener::new(), |opener, board| opener.with_port((*board).clone()))
}
