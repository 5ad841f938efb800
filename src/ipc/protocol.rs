//! # Listener Protocol
//!
//! Message types for the notification listener -> daemon channel.
//!
//! Uses length-prefixed JSON framing:
//! - 4 bytes: message length (big-endian u32)
//! - N bytes: JSON payload

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame. Notification events are tiny; anything
/// bigger is a confused or hostile peer.
pub const MAX_FRAME_BYTES: u32 = 64 * 1024;

/// Events sent by the platform notification listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ListenerEvent {
    /// A notification became visible
    Posted {
        /// Listener-side key; generated when absent
        #[serde(default)]
        id: Option<String>,
        /// Package identifier of the posting application
        package: String,
        /// Ongoing (persistent) notification
        #[serde(default)]
        ongoing: bool,
        /// Post time; defaults to receipt time
        #[serde(default)]
        posted_at: Option<DateTime<Utc>>,
    },
    /// A notification was dismissed or cleared
    Removed {
        id: String,
    },
}

/// Encode an event with its length prefix.
pub fn encode_event(event: &ListenerEvent) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(event)?;
    if json.len() > MAX_FRAME_BYTES as usize {
        bail!("event too large: {} bytes", json.len());
    }
    let mut buf = Vec::with_capacity(4 + json.len());
    buf.extend_from_slice(&(json.len() as u32).to_be_bytes());
    buf.extend_from_slice(&json);
    Ok(buf)
}

/// Read one framed event. Returns `None` on a clean end of stream.
pub async fn read_event<R>(reader: &mut R) -> Result<Option<ListenerEvent>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }

    let len = u32::from_be_bytes(len_buf);
    if len == 0 || len > MAX_FRAME_BYTES {
        bail!("invalid frame length: {len} bytes (max {MAX_FRAME_BYTES})");
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(Some(serde_json::from_slice(&payload)?))
}

/// Write one framed event.
pub async fn write_event<W>(writer: &mut W, event: &ListenerEvent) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let encoded = encode_event(event)?;
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}
