//! Process-level configuration from the environment
//!
//! Everything a deployment needs to point the daemon at its files; user
//! preferences live in the settings document instead.

use std::env;
use std::path::PathBuf;

/// Default location of the user settings document.
pub const DEFAULT_SETTINGS_PATH: &str = "renotify.yaml";

/// Default location of the listener ingestion socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/renotify.sock";

/// Runtime paths resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// User settings YAML document (`RENOTIFY_SETTINGS`).
    pub settings_path: PathBuf,
    /// Unix socket the notification listener connects to
    /// (`RENOTIFY_SOCKET`).
    pub socket_path: PathBuf,
}

impl Config {
    /// Resolve the configuration from environment variables, falling back
    /// to the defaults next to the working directory.
    pub fn from_env() -> Self {
        Config {
            settings_path: env::var("RENOTIFY_SETTINGS")
                .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string())
                .into(),
            socket_path: env::var("RENOTIFY_SOCKET")
                .unwrap_or_else(|_| DEFAULT_SOCKET_PATH.to_string())
                .into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            settings_path: DEFAULT_SETTINGS_PATH.into(),
            socket_path: DEFAULT_SOCKET_PATH.into(),
        }
    }
}
