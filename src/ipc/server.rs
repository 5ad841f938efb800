//! # Listener Server
//!
//! Unix socket server accepting connections from the platform
//! notification listener and forwarding decoded events to the engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use crate::ipc::protocol::{read_event, ListenerEvent};

/// Accept loop for the listener socket.
pub struct ListenerServer {
    listener: UnixListener,
    events: mpsc::Sender<ListenerEvent>,
}

impl ListenerServer {
    /// Bind the socket, replacing a stale file left by a previous run.
    pub fn bind(path: &Path, events: mpsc::Sender<ListenerEvent>) -> Result<Self> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("failed to remove stale socket {}", path.display()))?;
        }
        let listener = UnixListener::bind(path)
            .with_context(|| format!("failed to bind listener socket {}", path.display()))?;
        info!("listener socket bound at {}", path.display());
        Ok(ListenerServer { listener, events })
    }

    /// Accept connections until the process shuts down. Each connection
    /// gets its own task; a bad peer only takes itself down.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, _) = self.listener.accept().await?;
            debug!("listener connected");
            let events = self.events.clone();
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, events).await {
                    warn!("listener connection closed with error: {err:#}");
                }
            });
        }
    }
}

async fn handle_connection(
    mut stream: UnixStream,
    events: mpsc::Sender<ListenerEvent>,
) -> Result<()> {
    while let Some(event) = read_event(&mut stream).await? {
        if events.send(event).await.is_err() {
            // Engine is gone; nothing left to feed.
            break;
        }
    }
    debug!("listener disconnected");
    Ok(())
}
