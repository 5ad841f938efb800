//! # Feature: Notification Tracking
//!
//! In-memory table of currently visible notifications, fed by the
//! listener IPC and consulted by the reminder engine.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Ongoing notifications are stored and filtered at match time
//! - 1.0.0: Initial release with DashMap-backed tracker

pub mod tracker;

pub use tracker::{NotificationRecord, NotificationTracker};
