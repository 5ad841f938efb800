//! # IPC Module
//!
//! Ingestion channel between the platform notification listener and the
//! daemon.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with Unix socket protocol

pub mod protocol;
pub mod server;

pub use protocol::{read_event, write_event, ListenerEvent, MAX_FRAME_BYTES};
pub use server::ListenerServer;
