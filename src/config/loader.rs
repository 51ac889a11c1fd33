//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "TESTPROTOCOL";

/// Config file name in the current directory
const LOCAL_CONFIG_FILE: &str = "testprotocol.toml";

/// Config file name inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "TESTPROTOCOL_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `explicit` (the `--config` flag); it must exist
    /// 2. `TESTPROTOCOL_CONFIG` environment variable
    /// 3. `./testprotocol.toml`
    /// 4. `config.toml` in the platform config directory
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables override file values.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => resolve_config_path(),
        };

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        tracing::debug!(path = ?config_path, "configuration loaded");
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        if apply_env_overrides(&mut config).is_err() {
            config = Config::default();
        }

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. Platform config directory
    get_default_config_path().filter(|path| path.exists())
}

/// Platform config file location, e.g. `~/.config/testprotocol/config.toml`.
pub fn get_default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "testprotocol")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// - `TESTPROTOCOL_SERIAL_DEFAULT_BAUD=9600`
/// - `TESTPROTOCOL_SERIAL_POLL_TIMEOUT_MS=50`
/// - `TESTPROTOCOL_LOG_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    let baud_var = format!("{ENV_PREFIX}_SERIAL_DEFAULT_BAUD");
    if let Ok(val) = std::env::var(&baud_var) {
        config.serial.default_baud = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse(&baud_var, "Invalid baud rate"))?;
    }

    let poll_var = format!("{ENV_PREFIX}_SERIAL_POLL_TIMEOUT_MS");
    if let Ok(val) = std::env::var(&poll_var) {
        config.serial.poll_timeout_ms = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse(&poll_var, "Invalid timeout"))?;
    }

    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_LOG_LEVEL")) {
        config.logging.level = val;
    }

    Ok(())
}
