//! Configuration schema definitions.
//!
//! Every section has defaults, so an empty or missing file is a valid
//! configuration.

use super::error::{ConfigError, ConfigResult};
use crate::port::PortConfiguration;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values that would make the session unusable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.default_baud == 0 {
            return Err(ConfigError::validation(
                "serial.default_baud",
                "baud rate must be greater than zero",
            ));
        }
        if self.serial.poll_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "serial.poll_timeout_ms",
                "poll timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Baud rate of the first connection
    pub default_baud: u32,
    /// Timeout of a single low-level read in milliseconds
    pub poll_timeout_ms: u64,
    /// Short names for port paths, e.g. `board = "/dev/ttyACM0"`
    pub port_aliases: HashMap<String, String>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            default_baud: 115_200,
            poll_timeout_ms: 100,
            port_aliases: HashMap::new(),
        }
    }
}

impl SerialConfig {
    /// Get the poll timeout as Duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Resolve a port name through aliases
    pub fn resolve_port(&self, name: &str) -> String {
        self.port_aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Port parameters for opening at `baud_rate`.
    pub fn port_configuration(&self, baud_rate: u32) -> PortConfiguration {
        PortConfiguration {
            baud_rate,
            poll_timeout: self.poll_timeout(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error" or a full
    /// `EnvFilter` string
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
    /// Log file path; stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}
