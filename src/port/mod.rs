//! Port abstraction layer for serial communication.
//!
//! Provides the `SerialLink`/`PortOpener` traits, the `serialport`-backed
//! implementation, in-memory mocks and port discovery.

pub mod enumerate;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use enumerate::{list_ports, Platform, PortEnumerator};
pub use error::PortError;
pub use mock::{MockPortOpener, MockSerialPort};
pub use sync_port::{SyncSerialPort, SystemPortOpener};
pub use traits::*;
