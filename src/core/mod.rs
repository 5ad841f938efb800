//! # Core Module
//!
//! Process configuration and user settings for the reminder daemon.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Settings store broadcasts live updates over a watch channel
//! - 1.1.0: YAML settings document with validation
//! - 1.0.0: Initial creation with env-based config

pub mod config;
pub mod settings;

// Re-export commonly used items
pub use config::Config;
pub use settings::{
    ApplicationSettings, ReminderSettings, SchedulerSettings, Settings, SettingsStore,
    SoundSettings,
};
