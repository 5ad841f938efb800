//! # User Settings
//!
//! YAML-backed settings document with full validation, plus a store that
//! broadcasts live updates to the reminder engine over a watch channel.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::features::schedule::{QuietHours, SchedulerMode, MINUTES_IN_DAY};

/// Smallest accepted reminder interval, in minutes.
pub const REMINDER_INTERVAL_MIN: u32 = 1;

/// Largest accepted reminder interval, in minutes (one day).
pub const REMINDER_INTERVAL_MAX: u32 = MINUTES_IN_DAY;

/// Largest accepted repeat limit.
pub const REMINDER_REPEATS_MAX: u32 = 100;

/// Root settings document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub reminder: ReminderSettings,

    #[serde(default)]
    pub applications: ApplicationSettings,

    #[serde(default)]
    pub scheduler: SchedulerSettings,

    #[serde(default)]
    pub sound: SoundSettings,
}

/// Core reminder behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReminderSettings {
    /// Master switch for periodic reminders.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minutes between reminder passes.
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,

    /// Stop reminding after `max_repeats` plays until new activity arrives.
    #[serde(default)]
    pub limit_repeats: bool,

    /// Repeat budget used when `limit_repeats` is set.
    #[serde(default = "default_max_repeats")]
    pub max_repeats: u32,

    /// Play the reminder even while the screen is on.
    #[serde(default = "default_true")]
    pub remind_when_screen_on: bool,
}

/// Which applications are worth reminding about.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApplicationSettings {
    /// Package identifiers to remind for.
    #[serde(default)]
    pub selected: HashSet<String>,

    /// Skip ongoing (persistent) notifications when matching.
    #[serde(default = "default_true")]
    pub ignore_persistent: bool,
}

/// Quiet-hours window configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchedulerSettings {
    /// Whether the quiet-hours window applies at all.
    #[serde(default)]
    pub enabled: bool,

    /// How the range is interpreted.
    #[serde(default = "default_mode")]
    pub mode: SchedulerMode,

    /// Range begin, minute of day.
    #[serde(default = "default_range_begin")]
    pub range_begin: u32,

    /// Range end, minute of day.
    #[serde(default = "default_range_end")]
    pub range_end: u32,
}

/// External player invocation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SoundSettings {
    /// Player executable.
    #[serde(default = "default_sound_command")]
    pub command: String,

    /// Arguments, typically the sound file path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound on a single playback.
    #[serde(default = "default_sound_timeout")]
    pub timeout_seconds: u64,
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every group of the document.
    pub fn validate(&self) -> Result<()> {
        if self.reminder.interval_minutes < REMINDER_INTERVAL_MIN
            || self.reminder.interval_minutes > REMINDER_INTERVAL_MAX
        {
            bail!(
                "reminder interval must be within [{REMINDER_INTERVAL_MIN}, {REMINDER_INTERVAL_MAX}] minutes: got {}",
                self.reminder.interval_minutes
            );
        }

        if self.reminder.max_repeats == 0 || self.reminder.max_repeats > REMINDER_REPEATS_MAX {
            bail!(
                "reminder repeat limit must be within [1, {REMINDER_REPEATS_MAX}]: got {}",
                self.reminder.max_repeats
            );
        }

        // Range bounds share the window's own validation.
        QuietHours::new(
            self.scheduler.mode,
            self.scheduler.range_begin,
            self.scheduler.range_end,
        )?;

        if self.sound.command.trim().is_empty() {
            bail!("sound player command must not be empty");
        }

        if self.sound.timeout_seconds == 0 {
            bail!("sound playback timeout must be at least one second");
        }

        Ok(())
    }

    /// The quiet-hours window to apply, or `None` when disabled.
    pub fn quiet_hours(&self) -> Result<Option<QuietHours>> {
        if !self.scheduler.enabled {
            return Ok(None);
        }
        QuietHours::new(
            self.scheduler.mode,
            self.scheduler.range_begin,
            self.scheduler.range_end,
        )
        .map(Some)
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        ReminderSettings {
            enabled: true,
            interval_minutes: default_interval(),
            limit_repeats: false,
            max_repeats: default_max_repeats(),
            remind_when_screen_on: true,
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        ApplicationSettings {
            selected: HashSet::new(),
            ignore_persistent: true,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        SchedulerSettings {
            enabled: false,
            mode: default_mode(),
            range_begin: default_range_begin(),
            range_end: default_range_end(),
        }
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        SoundSettings {
            command: default_sound_command(),
            args: vec![],
            timeout_seconds: default_sound_timeout(),
        }
    }
}

/// Settings owner: persists the document and fans out live updates.
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Open the store, loading the document when the file exists and
    /// starting from defaults otherwise.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let loaded = Settings::load(&path)?;
            info!("loaded settings from {}", path.display());
            loaded
        } else {
            info!(
                "no settings file at {}, starting with defaults",
                path.display()
            );
            Settings::default()
        };
        let (tx, _) = watch::channel(settings);
        Ok(SettingsStore { path, tx })
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Receiver for live settings updates.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Apply a mutation, validate, persist, and broadcast the new value.
    /// The stored document is untouched when validation fails.
    pub fn update(&self, mutate: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut next = self.tx.borrow().clone();
        mutate(&mut next);
        next.validate()?;

        let rendered = serde_yaml::to_string(&next)?;
        fs::write(&self.path, rendered)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        debug!("settings saved to {}", self.path.display());

        self.tx.send_replace(next);
        Ok(())
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_interval() -> u32 {
    5
}

fn default_max_repeats() -> u32 {
    10
}

fn default_mode() -> SchedulerMode {
    SchedulerMode::WorkingPeriod
}

fn default_range_begin() -> u32 {
    6 * 60 // 06:00
}

fn default_range_end() -> u32 {
    22 * 60 // 22:00
}

fn default_sound_command() -> String {
    "paplay".to_string()
}

fn default_sound_timeout() -> u64 {
    5
}
