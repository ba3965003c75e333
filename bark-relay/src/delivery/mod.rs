//! Delivery of payloads to Bark.
//!
//! [`BarkClient`] POSTs over HTTP; [`MockDelivery`] records payloads for tests.

mod bark;
pub mod mock;

pub use bark::{BarkClient, CONTENT_TYPE_JSON, REQUEST_TIMEOUT};
pub use mock::MockDelivery;

use async_trait::async_trait;
use bark_types::OutboundPayload;

use crate::error::DeliveryResult;

/// Something that can deliver a payload to a Bark server.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Deliver one payload, waiting for the server's answer.
    ///
    /// Succeeds only on HTTP 200.
    async fn deliver(&self, payload: &OutboundPayload) -> DeliveryResult<()>;
}
