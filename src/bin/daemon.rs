use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use tokio::sync::mpsc;

use renotify::core::{Config, SettingsStore};
use renotify::features::notifications::NotificationTracker;
use renotify::features::reminders::{FixedScreenState, ReminderEngine};
use renotify::features::sound::CommandPlayer;
use renotify::ipc::ListenerServer;

/// Buffered listener events; the engine drains these quickly.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!(
        "starting renotifyd (settings: {}, socket: {})",
        config.settings_path.display(),
        config.socket_path.display()
    );

    let store = SettingsStore::open(&config.settings_path)?;
    let tracker = Arc::new(NotificationTracker::new());

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let server = ListenerServer::bind(&config.socket_path, events_tx)?;
    tokio::spawn(async move {
        if let Err(err) = server.run().await {
            log::error!("listener server failed: {err:#}");
        }
    });

    let engine = ReminderEngine::new(
        store.subscribe(),
        Arc::clone(&tracker),
        Arc::new(CommandPlayer::new()),
        // The display query is a platform collaborator; assume the screen
        // is off unless a future integration says otherwise.
        Arc::new(FixedScreenState { screen_on: false }),
    );

    engine.run(events_rx).await
}
