//! # bark-relay
//!
//! Forwards Gotify notifications to a Bark push server.
//!
//! The relay keeps one WebSocket subscription to Gotify's `/stream` and, for
//! every message it receives, POSTs a Bark notification (optionally
//! AES-CBC encrypted) to the configured push URL.
//!
//! ## Architecture
//!
//! ```text
//!  Gotify ──/stream (ws/wss)──► Relay ──HTTP POST (json)──► Bark
//!                                 │
//!                       decode → build → encrypt?
//! ```
//!
//! - A stream failure closes the connection and redials after a fixed delay.
//! - A delivery failure drops that one message and keeps the stream.
//! - Messages are handled one at a time, in arrival order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod delivery;
pub mod error;
pub mod payload;
pub mod relay;
pub mod stream;

pub use config::{ConfigError, RelayConfig};
pub use relay::{Relay, RelayBuildError, RelayState, Step};
