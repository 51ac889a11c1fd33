//! Serial port discovery.
//!
//! Candidates come from the platform's device naming scheme and are then
//! probed by opening and immediately closing them; anything that fails to
//! open is dropped without a message.

use super::error::PortError;
use super::sync_port::SystemPortOpener;
use super::traits::{PortConfiguration, PortOpener};
use std::path::{Path, PathBuf};

/// Number of `COMn` names tried on Windows.
const WINDOWS_COM_PORTS: u32 = 256;

/// Device directory scanned on Unix-like hosts.
const DEV_DIR: &str = "/dev";

/// Platform families with a known serial device naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `COM1` … `COM256`.
    Windows,
    /// `/dev/tty[A-Za-z]*` (Linux, Cygwin, BSDs).
    Unix,
    /// `/dev/tty.*`.
    Darwin,
}

impl Platform {
    /// Platform of the running binary.
    pub fn detect() -> Result<Self, PortError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value to a platform family.
    pub fn from_os(os: &str) -> Result<Self, PortError> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" | "ios" => Ok(Self::Darwin),
            "linux" | "cygwin" | "android" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" => Ok(Self::Unix),
            other => Err(PortError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Does `name` look like a serial device on this platform?
    fn matches_device(self, name: &str) -> bool {
        match self {
            Self::Windows => false,
            Self::Unix => name
                .strip_prefix("tty")
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_alphabetic()),
            Self::Darwin => name.starts_with("tty."),
        }
    }
}

/// Candidate port names for `platform`, in the order they will be probed.
///
/// `dev_dir` is only scanned on Unix-like platforms; entries are sorted by
/// name. An unreadable directory yields no candidates.
pub fn candidates(platform: Platform, dev_dir: &Path) -> Vec<String> {
    if platform == Platform::Windows {
        return (1..=WINDOWS_COM_PORTS).map(|i| format!("COM{i}")).collect();
    }

    let entries = match std::fs::read_dir(dev_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dev_dir.display(), error = %e, "cannot scan device directory");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| platform.matches_device(name))
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| dev_dir.join(name).to_string_lossy().into_owned())
        .collect()
}

/// Keep the candidates that `opener` can open with `config`. Each probe
/// handle is closed before the next candidate is tried.
pub fn probe<I>(opener: &dyn PortOpener, candidates: I, config: PortConfiguration) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .filter(|name| match opener.open(name, config) {
            Ok(link) => {
                drop(link);
                true
            }
            Err(e) => {
                tracing::trace!(port = %name, error = %e, "candidate rejected");
                false
            }
        })
        .collect()
}

/// Candidate generation plus probing for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEnumerator {
    platform: Platform,
    dev_dir: PathBuf,
    probe_config: PortConfiguration,
}

impl PortEnumerator {
    /// Enumerator for the running host.
    pub fn detect() -> Result<Self, PortError> {
        Ok(Self::new(Platform::detect()?, DEV_DIR))
    }

    /// Enumerator for an explicit platform and device directory.
    pub fn new(platform: Platform, dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            dev_dir: dev_dir.into(),
            probe_config: PortConfiguration::default(),
        }
    }

    /// Probe candidates with `config` instead of the port defaults.
    pub fn with_probe_config(mut self, config: PortConfiguration) -> Self {
        self.probe_config = config;
        self
    }

    /// Platform this enumerator generates names for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Ports that `opener` can currently open, in candidate order.
    pub fn list(&self, opener: &dyn PortOpener) -> Vec<String> {
        let ports = probe(
            opener,
            candidates(self.platform, &self.dev_dir),
            self.probe_config,
        );
        tracing::debug!(platform = ?self.platform, count = ports.len(), "enumerated serial ports");
        ports
    }
}

/// List the serial ports of this machine that can currently be opened.
pub fn list_ports() -> Result<Vec<String>, PortError> {
    Ok(PortEnumerator::detect()?.list(&SystemPortOpener))
}
