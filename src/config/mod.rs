//! Configuration module for testprotocol.
//!
//! Optional TOML configuration with environment variable overrides. Running
//! without any file gives the stock behaviour: first port at 115200 baud,
//! warnings only on stderr.
//!
//! # Configuration Resolution
//!
//! 1. `--config <PATH>` on the command line
//! 2. `TESTPROTOCOL_CONFIG` environment variable (explicit path)
//! 3. `./testprotocol.toml` (current directory)
//! 4. `config.toml` in the platform config directory
//!    (`~/.config/testprotocol/` on Linux)
//! 5. Built-in defaults (no file required)
//!
//! # Example
//!
//! ```toml
//! [serial]
//! default_baud = 115200
//! poll_timeout_ms = 100
//!
//! [serial.port_aliases]
//! board = "/dev/ttyACM0"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! file = "testprotocol.log"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig};
