//! Serial test console for the Sailwind motor controller board.
//!
//! The operator picks a port and baud rate, sends a test code and watches the
//! board's answer until it reports the test as done.
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment overrides
//! - `console`: operator input/output abstraction
//! - `error`: unified application error
//! - `logging`: tracing subscriber setup
//! - `port`: serial link abstraction, real and mock ports, port discovery
//! - `protocol`: test code wire format and menus
//! - `shell`: the start menu and test menu state machines

pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod port;
pub mod protocol;
pub mod shell;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use console::{Console, ConsoleEvent, ScriptedConsole, StdConsole};
pub use error::{AppError, AppResult};
pub use port::{
    list_ports, MockPortOpener, MockSerialPort, Platform, PortConfiguration, PortEnumerator,
    PortError, PortOpener, SerialLink, SyncSerialPort, SystemPortOpener,
};
pub use protocol::{parse_selection, Selection, TestSelection};
pub use shell::{run_session, Session, SessionState};
