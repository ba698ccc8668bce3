// src/config.rs

//! Process-wide defaults for the multiplexers.
//!
//! The values here are only consulted when a caller passes the `-1`
//! "use the default" sentinel for an epoll size hint or a poll capacity.
//! They are loaded once, on first use, from the JSON file named by the
//! `KSELECT_CONFIG` environment variable; a missing variable means the
//! built-in defaults, and an unreadable or malformed file is logged and
//! ignored.

use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "KSELECT_CONFIG";

/// `FD_SETSIZE - 1`, the capacity used when nothing else is configured.
pub const DEFAULT_CAPACITY: i32 = libc::FD_SETSIZE as i32 - 1;

/// Global configuration, initialized on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Epoll-specific defaults.
    pub epoll: EpollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpollConfig {
    /// Size hint substituted by `Epoll::new(-1)`.
    pub default_sizehint: i32,
    /// Result buffer length for `poll(timeout, -1)`.
    pub default_max_events: i32,
}

impl Default for EpollConfig {
    fn default() -> Self {
        Self {
            default_sizehint: DEFAULT_CAPACITY,
            default_max_events: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Reads the file named by `KSELECT_CONFIG`, or returns the defaults.
    pub fn load_or_default() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Self::default(),
        }
    }

    /// Parses a JSON configuration file, falling back to the defaults on any error.
    pub fn from_file(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read config {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(config) => {
                debug!("Loaded config from {}: {:?}", path.display(), config);
                config
            }
            Err(e) => {
                warn!("Invalid config {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses a JSON document. Non-positive capacities are replaced with
    /// the built-in default.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut config: Config = serde_json::from_str(text)?;
        config.epoll.sanitize();
        Ok(config)
    }
}

impl EpollConfig {
    fn sanitize(&mut self) {
        if self.default_sizehint < 1 {
            warn!(
                "Ignoring non-positive epoll.default_sizehint {}",
                self.default_sizehint
            );
            self.default_sizehint = DEFAULT_CAPACITY;
        }
        if self.default_max_events < 1 {
            warn!(
                "Ignoring non-positive epoll.default_max_events {}",
                self.default_max_events
            );
            self.default_max_events = DEFAULT_CAPACITY;
        }
    }
}
