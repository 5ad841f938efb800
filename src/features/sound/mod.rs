//! # Feature: Reminder Sound
//!
//! Plays the reminder sound by spawning an external player command, so the
//! audio stack stays a deployment concern (`paplay`, `pw-play`, `aplay`,
//! anything that takes a file argument works).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//! - **Toggleable**: true

use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::process::Command;
use tokio::time;

use crate::core::settings::SoundSettings;

/// Playback seam between the reminder engine and the audio stack.
#[async_trait]
pub trait ReminderPlayer: Send + Sync {
    /// Play the reminder sound once. Implementations must return within
    /// the configured timeout or be cancel-safe on drop.
    async fn play(&self, sound: &SoundSettings) -> Result<()>;
}

/// Production player: runs the configured command and waits for it,
/// bounded by the playback timeout.
#[derive(Debug, Default)]
pub struct CommandPlayer;

impl CommandPlayer {
    pub fn new() -> Self {
        CommandPlayer
    }
}

#[async_trait]
impl ReminderPlayer for CommandPlayer {
    async fn play(&self, sound: &SoundSettings) -> Result<()> {
        debug!(
            "playing reminder sound: {} {}",
            sound.command,
            sound.args.join(" ")
        );

        let child = Command::new(&sound.command)
            .args(&sound.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn sound player {}", sound.command))?;

        let timeout = Duration::from_secs(sound.timeout_seconds);
        match time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => bail!(
                "sound player did not finish within {} seconds",
                sound.timeout_seconds
            ),
            Ok(Err(err)) => Err(err).context("sound player failed"),
            Ok(Ok(output)) => {
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    bail!(
                        "sound player exited with {}: {}",
                        output.status,
                        stderr.trim()
                    );
                }
                Ok(())
            }
        }
    }
}
