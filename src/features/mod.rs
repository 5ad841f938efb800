//! # Features
//!
//! Feature modules of the reminder daemon.

pub mod notifications;
pub mod reminders;
pub mod schedule;
pub mod sound;

pub use notifications::{NotificationRecord, NotificationTracker};
pub use reminders::{FixedScreenState, ReminderEngine, ScreenStateProvider};
pub use schedule::{compute_next_wake, next_allowed, QuietHours, SchedulerMode};
pub use sound::{CommandPlayer, ReminderPlayer};
