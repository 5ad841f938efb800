//! Shared notification table
//!
//! One entry per visible notification, keyed by the listener-supplied id.
//! Ongoing (persistent) notifications are kept in the table and excluded
//! at match time instead of at insert time, so toggling the
//! ignore-persistent setting re-evaluates against the full picture.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;

/// A single visible notification as reported by the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Listener-supplied key, unique among visible notifications.
    pub id: String,
    /// Package identifier of the posting application.
    pub package: String,
    /// When the notification was posted.
    pub posted_at: DateTime<Utc>,
    /// Whether the notification is ongoing (persistent).
    pub ongoing: bool,
}

/// Thread-safe table of currently visible notifications.
#[derive(Debug, Default)]
pub struct NotificationTracker {
    entries: DashMap<String, NotificationRecord>,
}

impl NotificationTracker {
    pub fn new() -> Self {
        NotificationTracker {
            entries: DashMap::new(),
        }
    }

    /// Record a posted notification, replacing any previous entry with the
    /// same id (a repost updates in place).
    pub fn insert(&self, record: NotificationRecord) {
        debug!(
            "tracking notification {} from {} (ongoing: {})",
            record.id, record.package, record.ongoing
        );
        self.entries.insert(record.id.clone(), record);
    }

    /// Drop a notification by id. Returns the removed record, if any.
    pub fn remove(&self, id: &str) -> Option<NotificationRecord> {
        let removed = self.entries.remove(id).map(|(_, record)| record);
        if let Some(ref record) = removed {
            debug!("dropped notification {} from {}", record.id, record.package);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether at least one tracked notification belongs to one of the
    /// selected packages. Ongoing notifications are skipped when
    /// `ignore_ongoing` is set.
    pub fn has_notifications_for(&self, selected: &HashSet<String>, ignore_ongoing: bool) -> bool {
        self.entries.iter().any(|entry| {
            let record = entry.value();
            if ignore_ongoing && record.ongoing {
                return false;
            }
            selected.contains(&record.package)
        })
    }

    /// Distinct packages with at least one tracked notification, for
    /// status logging.
    pub fn packages(&self) -> Vec<String> {
        let mut packages: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.value().package.clone())
            .collect();
        packages.sort();
        packages.dedup();
        packages
    }
}
