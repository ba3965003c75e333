//! Error types for the relay.
//!
//! Stream errors (`DialError`, `StreamError`) make the relay reconnect.
//! Per-message errors (`ForwardError`) drop the message and keep the stream.

use bark_crypto::CryptoError;
use bark_types::WireError;

/// Failure to open the Gotify stream.
#[derive(Debug, thiserror::Error)]
pub enum DialError {
    /// The server answered the upgrade request with a non-101 response.
    #[error("handshake rejected with status {status}")]
    Handshake {
        /// HTTP status returned by the server.
        status: u16,
        /// Response body, if any.
        body: Option<String>,
    },

    /// Stream URL could not be turned into a request.
    #[error("invalid stream URL: {0}")]
    InvalidUrl(String),

    /// TLS client setup failed.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// TCP, TLS or WebSocket connection failure.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Failure while reading from an open Gotify stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The server closed the stream.
    #[error("stream closed by server")]
    Closed,

    /// Reading a frame failed.
    #[error("stream read failed: {0}")]
    Read(String),

    /// A frame did not decode as a Gotify message.
    #[error("message decode failed: {0}")]
    Decode(#[from] WireError),
}

/// Failure to deliver a payload to Bark.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Payload serialization failed.
    #[error("payload serialization failed: {0}")]
    Serialize(#[source] WireError),

    /// Request could not be built or sent, or the response not read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Bark answered with a status other than 200.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status returned by Bark.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// Failure to forward a single message. The stream is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Building the plaintext for encryption failed.
    #[error("failed to serialize payload for encryption: {0}")]
    Payload(#[source] WireError),

    /// IV generation or encryption failed.
    #[error("failed to encrypt payload: {0}")]
    Crypto(#[from] CryptoError),

    /// Delivery to Bark failed.
    #[error("failed to deliver payload: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Result type alias for dial operations.
pub type DialResult<T> = std::result::Result<T, DialError>;

/// Result type alias for stream reads.
pub type StreamResult<T> = std::result::Result<T, StreamError>;

/// Result type alias for delivery operations.
pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;
