//! User configuration, read from `<config_dir>/subform/config.json`.
//!
//! Every field is optional in the file; missing fields take their defaults
//! and a missing file means all defaults.

mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

use crate::form::{DEFAULT_DIALOG_WIDTH, DEFAULT_IDLE_DELAY};

const APP_DIR: &str = "subform";
const CONFIG_FILE: &str = "config.json";

/// Tunable settings for the form and the terminal loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds without a keystroke before the user counts as idle.
    pub idle_delay_ms: u64,
    /// Width requested for the clear-form confirmation dialog.
    pub dialog_width: String,
    /// Upper bound, in milliseconds, on how long the event loop waits for input.
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_delay_ms: DEFAULT_IDLE_DELAY.as_millis() as u64,
            dialog_width: DEFAULT_DIALOG_WIDTH.to_string(),
            tick_rate_ms: 250,
        }
    }
}

impl Config {
    /// Loads the config from the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the config from `path`, falling back to defaults if the file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = serde_json::from_str(&contents)?;
                tracing::debug!(path = %path.display(), "config loaded");
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// The idle delay as a [`Duration`].
    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }

    /// The event loop tick rate as a [`Duration`].
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Directory for the log file (`<data_dir>/subform`), created if missing.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
