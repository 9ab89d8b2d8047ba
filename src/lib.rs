//! ttsd - resident text-to-speech daemon
//!
//! A long-lived worker process that keeps a speech-synthesis engine in
//! memory and serves a foreground application over a minimal binary
//! protocol on stdin/stdout. Requests and responses are length-prefixed
//! frames; a handful of control commands mutate the session (voice,
//! language, speed) between synthesis calls.

pub mod config;
pub mod daemon;
pub mod error;
pub mod protocol;
pub mod session;
pub mod speech;

pub use error::{Result, TtsdError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "ttsd";
