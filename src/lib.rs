// Core layer - process config and user settings
pub mod core;

// Features layer - scheduling, tracking, reminders, sound
pub mod features;

// IPC layer - notification listener ingestion
pub mod ipc;

// Re-export core config for convenience
pub use core::{Config, Settings, SettingsStore};

// Re-export feature items
pub use features::{
    // Notifications
    NotificationRecord, NotificationTracker,
    // Reminders
    FixedScreenState, ReminderEngine, ScreenStateProvider,
    // Scheduling
    compute_next_wake, QuietHours, SchedulerMode,
    // Sound
    CommandPlayer, ReminderPlayer,
};

// Re-export IPC items
pub use ipc::{ListenerEvent, ListenerServer};
