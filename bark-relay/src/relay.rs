//! The relay loop.
//!
//! A single task drives the state machine below, one transition per
//! [`Relay::step`]:
//!
//! ```text
//!            dial ok                      event
//! Disconnected ────────► Connected ───────────────► Forwarding
//!   ▲    │                 │   ▲                        │
//!   │    │ dial failed     │   └────────────────────────┘
//!   │    ▼                 │     delivered / dropped
//!   └── wait ◄─────────────┘
//!                read failed: close, wait
//! ```
//!
//! Only stream failures lead back to `Disconnected`. A message that cannot
//! be encrypted or delivered is logged and dropped, and the next read
//! happens right away.

use bark_types::InboundEvent;
use std::time::Duration;

use crate::config::{ConfigError, RelayConfig};
use crate::delivery::{BarkClient, Delivery};
use crate::error::{DeliveryError, DialError, ForwardError};
use crate::payload::PayloadBuilder;
use crate::stream::{EventSource, EventStream, GotifySource};

/// Delay before redialing after a stream failure.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection state of the relay.
#[derive(Debug)]
pub enum RelayState<S> {
    /// No live stream.
    Disconnected,
    /// A live stream, exclusively owned by the relay.
    Connected(S),
}

impl<S> RelayState<S> {
    /// Whether a stream is open.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

/// Outcome of one [`Relay::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A stream was opened.
    Connected,
    /// Dialing failed; the reconnect delay has elapsed.
    DialFailed,
    /// An event was delivered.
    Forwarded,
    /// An event was read but could not be forwarded; the stream stays open.
    Dropped,
    /// The stream failed and was closed; the reconnect delay has elapsed.
    StreamLost,
}

/// Relays events from a source to a delivery target.
pub struct Relay<S: EventSource, D: Delivery> {
    source: S,
    delivery: D,
    builder: PayloadBuilder,
    reconnect_delay: Duration,
    state: RelayState<S::Stream>,
}

impl Relay<GotifySource, BarkClient> {
    /// Create the production relay.
    ///
    /// Fails without dialing if the Gotify host, token or Bark target is missing.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayBuildError> {
        config.validate()?;
        let source = GotifySource::new(
            &config.gotify.host,
            &config.gotify.token,
            config.gotify.tls_verify,
        )?;
        let delivery = BarkClient::new(&config.bark.target, config.bark.basic_auth())?;
        let builder = PayloadBuilder::from_config(config);

        Ok(Self::new(source, delivery, builder).with_reconnect_delay(config.reconnect_delay()))
    }
}

impl<S: EventSource, D: Delivery> Relay<S, D> {
    /// Create a relay in the `Disconnected` state.
    pub fn new(source: S, delivery: D, builder: PayloadBuilder) -> Self {
        Self {
            source,
            delivery,
            builder,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            state: RelayState::Disconnected,
        }
    }

    /// Set the delay before redialing after a stream failure.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Current connection state.
    pub fn state(&self) -> &RelayState<S::Stream> {
        &self.state
    }

    /// Run forever.
    pub async fn run(mut self) {
        tracing::info!(
            "Relay started (encryption: {})",
            if self.builder.encrypts() { "on" } else { "off" }
        );
        loop {
            self.step().await;
        }
    }

    /// Perform one state transition.
    pub async fn step(&mut self) -> Step {
        match std::mem::replace(&mut self.state, RelayState::Disconnected) {
            RelayState::Disconnected => match self.source.connect().await {
                Ok(stream) => {
                    self.state = RelayState::Connected(stream);
                    Step::Connected
                }
                Err(e) => {
                    log_dial_error(&e);
                    tokio::time::sleep(self.reconnect_delay).await;
                    Step::DialFailed
                }
            },
            RelayState::Connected(mut stream) => match stream.next_event().await {
                Ok(event) => {
                    self.state = RelayState::Connected(stream);
                    log_event(&event);
                    match self.forward(&event).await {
                        Ok(()) => {
                            tracing::info!("Successfully forwarded message: {}", event.title);
                            Step::Forwarded
                        }
                        Err(e) => {
                            log_forward_error(&event, &e);
                            Step::Dropped
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Error reading message: {}", e);
                    stream.close().await;
                    drop(stream);
                    tokio::time::sleep(self.reconnect_delay).await;
                    Step::StreamLost
                }
            },
        }
    }

    /// Build, encrypt and deliver the payload for one event.
    async fn forward(&self, event: &InboundEvent) -> Result<(), ForwardError> {
        let payload = self.builder.build(event)?;
        self.delivery.deliver(&payload).await?;
        Ok(())
    }
}

fn log_event(event: &InboundEvent) {
    tracing::info!(
        id = event.id,
        appid = event.appid,
        priority = event.priority,
        date = %event.date,
        "New message received - Title: {}, Message: {}",
        event.title,
        event.message,
    );
}

fn log_dial_error(error: &DialError) {
    match error {
        DialError::Handshake { status, body } => tracing::error!(
            status = *status,
            body = body.as_deref().unwrap_or(""),
            "Connection error: {}",
            error
        ),
        _ => tracing::error!("Connection error: {}", error),
    }
}

fn log_forward_error(event: &InboundEvent, error: &ForwardError) {
    match error {
        ForwardError::Delivery(DeliveryError::Status { status, body }) => tracing::error!(
            id = event.id,
            status = *status,
            body = %body,
            "Error forwarding message: {}",
            error
        ),
        _ => tracing::error!(id = event.id, "Error forwarding message: {}", error),
    }
}

/// Failure to construct the production relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayBuildError {
    /// Required settings are missing.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Stream source setup failed.
    #[error("stream setup failed: {0}")]
    Source(#[from] DialError),
    /// HTTP client setup failed.
    #[error("delivery setup failed: {0}")]
    Delivery(#[from] DeliveryError),
}
