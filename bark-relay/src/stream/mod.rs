//! Source abstraction for the Gotify message stream.
//!
//! This module provides a pluggable source layer so the relay loop can run
//! against the real WebSocket or an in-memory mock.
//!
//! # Design
//!
//! - [`EventSource::connect`] dials and returns a fresh, owned [`EventStream`]
//! - [`EventStream::next_event`] blocks until one message is decoded
//! - [`EventStream::close`] tears the stream down before it is dropped
//!
//! A stream is never reused after an error; the relay dials a new one.

pub mod mock;
mod tls;
mod websocket;

pub use mock::{MockSource, MockStream};
pub use websocket::{GotifySource, GotifyStream};

use async_trait::async_trait;
use bark_types::InboundEvent;

use crate::error::{DialResult, StreamResult};

/// `User-Agent` sent on the stream upgrade request.
pub const STREAM_USER_AGENT: &str = "Gotify-Forwarder/1.0";

/// Build the `/stream` URL for a Gotify host.
///
/// `http://` becomes `ws://` and `https://` becomes `wss://`; other schemes
/// are kept. A trailing `/` on the host is dropped.
pub fn stream_url(host: &str, token: &str) -> String {
    let host = host.trim_end_matches('/');
    let base = if let Some(rest) = host.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = host.strip_prefix("https://") {
        format!("wss://{rest}")
    } else {
        host.to_string()
    };
    format!("{base}/stream?token={token}")
}

/// The stream URL with the token value masked, for logging.
pub fn redact_token(url: &str) -> String {
    match url.split_once("token=") {
        Some((head, _)) => format!("{head}token=***"),
        None => url.to_string(),
    }
}

/// Something that can open a Gotify message stream.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// The stream type produced by a successful dial.
    type Stream: EventStream;

    /// Dial the source.
    async fn connect(&self) -> DialResult<Self::Stream>;
}

/// An open Gotify message stream.
#[async_trait]
pub trait EventStream: Send {
    /// Read the next message.
    ///
    /// Blocks until a full message is available or the stream fails.
    async fn next_event(&mut self) -> StreamResult<InboundEvent>;

    /// Close the stream. Errors while closing are ignored.
    async fn close(&mut self);
}
