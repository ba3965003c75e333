//! Mock delivery for testing.

use super::Delivery;
use crate::error::{DeliveryError, DeliveryResult};
use async_trait::async_trait;
use bark_types::OutboundPayload;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records delivered payloads and can be told to reject the next ones.
///
/// Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MockDelivery {
    inner: Arc<Mutex<MockDeliveryInner>>,
}

#[derive(Debug, Default)]
struct MockDeliveryInner {
    delivered: Vec<OutboundPayload>,
    attempts: usize,
    rejections: VecDeque<(u16, String)>,
}

impl MockDelivery {
    /// Create a new mock delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next delivery with `status` and `body` instead of 200.
    pub fn reject_next(&self, status: u16, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.rejections.push_back((status, body.to_string()));
    }

    /// Payloads accepted so far, in order.
    pub fn delivered(&self) -> Vec<OutboundPayload> {
        self.inner.lock().unwrap().delivered.clone()
    }

    /// Number of delivery attempts, accepted or not.
    pub fn attempts(&self) -> usize {
        self.inner.lock().unwrap().attempts
    }
}

#[async_trait]
impl Delivery for MockDelivery {
    async fn deliver(&self, payload: &OutboundPayload) -> DeliveryResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts += 1;

        if let Some((status, body)) = inner.rejections.pop_front() {
            return Err(DeliveryError::Status { status, body });
        }

        inner.delivered.push(payload.clone());
        Ok(())
    }
}
