//! Reminder engine
//!
//! Single-task loop owning all reminder state: which notifications are
//! visible (via the tracker), whether a reminder cycle is active, and when
//! the next pass is due. Listener events, settings changes, and the wake
//! timer all feed the same loop, so there is exactly one mutator of the
//! derived scheduling state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, LocalResult, TimeZone, Utc};
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};

use crate::core::settings::Settings;
use crate::features::notifications::{NotificationRecord, NotificationTracker};
use crate::features::schedule::compute_next_wake;
use crate::features::sound::ReminderPlayer;
use crate::ipc::ListenerEvent;

use super::ScreenStateProvider;

/// The next scheduled reminder pass: the absolute due time for logging
/// and the monotonic deadline the timer sleeps on.
#[derive(Debug, Clone, Copy)]
struct NextWake {
    due_at_millis: i64,
    deadline: Instant,
}

/// Periodic reminder engine. Construct once, then [`run`](Self::run).
pub struct ReminderEngine {
    settings: watch::Receiver<Settings>,
    tracker: Arc<NotificationTracker>,
    player: Arc<dyn ReminderPlayer>,
    screen: Arc<dyn ScreenStateProvider>,
    active: bool,
    repeats_played: u32,
    next_wake: Option<NextWake>,
}

impl ReminderEngine {
    pub fn new(
        settings: watch::Receiver<Settings>,
        tracker: Arc<NotificationTracker>,
        player: Arc<dyn ReminderPlayer>,
        screen: Arc<dyn ScreenStateProvider>,
    ) -> Self {
        ReminderEngine {
            settings,
            tracker,
            player,
            screen,
            active: false,
            repeats_played: 0,
            next_wake: None,
        }
    }

    /// Drive the engine until the listener channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<ListenerEvent>) -> Result<()> {
        let mut settings_rx = self.settings.clone();
        self.check_waking_conditions();

        loop {
            let deadline = self.next_wake.map(|wake| wake.deadline);
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        info!("listener channel closed, stopping engine");
                        break;
                    };
                    self.handle_event(event);
                }
                changed = settings_rx.changed() => {
                    if changed.is_err() {
                        info!("settings store dropped, stopping engine");
                        break;
                    }
                    debug!("settings changed, restarting wake cycle");
                    self.stop_waking();
                    self.check_waking_conditions();
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_wake().await;
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: ListenerEvent) {
        match event {
            ListenerEvent::Posted {
                id,
                package,
                ongoing,
                posted_at,
            } => {
                let record = NotificationRecord {
                    id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    package,
                    posted_at: posted_at.unwrap_or_else(Utc::now),
                    ongoing,
                };
                if self.matches_selection(&record) {
                    // Fresh activity restores the repeat budget.
                    self.repeats_played = 0;
                }
                self.tracker.insert(record);
                self.check_waking_conditions();
            }
            ListenerEvent::Removed { id } => {
                self.tracker.remove(&id);
                // Stop, then decide again from what remains.
                self.stop_waking();
                self.check_waking_conditions();
            }
        }
    }

    fn matches_selection(&self, record: &NotificationRecord) -> bool {
        let settings = self.settings.borrow();
        if settings.applications.ignore_persistent && record.ongoing {
            return false;
        }
        settings.applications.selected.contains(&record.package)
    }

    /// Become active and schedule the first pass when reminders are
    /// enabled and a matching notification exists.
    fn check_waking_conditions(&mut self) {
        if self.active {
            debug!("check_waking_conditions: already active, skipping");
            return;
        }
        let settings = self.settings.borrow().clone();
        if !settings.reminder.enabled {
            debug!("check_waking_conditions: reminders disabled, skipping");
            return;
        }
        let has_matching = self.tracker.has_notifications_for(
            &settings.applications.selected,
            settings.applications.ignore_persistent,
        );
        if has_matching {
            info!(
                "unread notifications present ({:?}), scheduling reminders",
                self.tracker.packages()
            );
            self.active = true;
            self.schedule_next_wake(&settings);
        } else {
            debug!("check_waking_conditions: nothing to remind about");
        }
    }

    fn schedule_next_wake(&mut self, settings: &Settings) {
        let window = match settings.quiet_hours() {
            Ok(window) => window,
            Err(err) => {
                warn!("invalid quiet hours configuration, ignoring window: {err:#}");
                None
            }
        };

        let now_millis = Utc::now().timestamp_millis();
        match compute_next_wake(
            now_millis,
            settings.reminder.interval_minutes,
            window.as_ref(),
        ) {
            Ok(due_at_millis) => {
                let delay_millis = (due_at_millis - now_millis).max(0) as u64;
                if let LocalResult::Single(due) = Utc.timestamp_millis_opt(due_at_millis) {
                    debug!(
                        "next reminder pass at {} (in {} seconds)",
                        due.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                        delay_millis / 1000
                    );
                }
                self.next_wake = Some(NextWake {
                    due_at_millis,
                    deadline: Instant::now() + Duration::from_millis(delay_millis),
                });
            }
            Err(err) => {
                warn!("failed to compute next wake time: {err:#}");
                self.stop_waking();
            }
        }
    }

    async fn on_wake(&mut self) {
        self.next_wake = None;
        if !self.active {
            warn!("woke without an active reminder cycle, stopping");
            self.stop_waking();
            return;
        }

        let settings = self.settings.borrow().clone();
        let still_matching = self.tracker.has_notifications_for(
            &settings.applications.selected,
            settings.applications.ignore_persistent,
        );
        if !still_matching {
            info!("no matching notifications remain, stopping reminders");
            self.stop_waking();
            return;
        }

        if settings.reminder.remind_when_screen_on || !self.screen.is_screen_on() {
            match self.player.play(&settings.sound).await {
                Ok(()) => {
                    self.repeats_played += 1;
                    debug!("reminder sound played ({} so far)", self.repeats_played);
                }
                Err(err) => warn!("reminder playback failed: {err:#}"),
            }
        } else {
            debug!("screen is on, skipping reminder sound");
        }

        if settings.reminder.limit_repeats && self.repeats_played >= settings.reminder.max_repeats {
            info!(
                "reminder repeat limit of {} reached, waiting for new notifications",
                settings.reminder.max_repeats
            );
            self.stop_waking();
            return;
        }

        self.schedule_next_wake(&settings);
    }

    fn stop_waking(&mut self) {
        if self.active {
            debug!("cancelling scheduled reminders");
        }
        self.active = false;
        self.next_wake = None;
    }
}
