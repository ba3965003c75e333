//! HTTP client for a Bark push server.

use async_trait::async_trait;
use bark_types::OutboundPayload;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;

use super::Delivery;
use crate::error::{DeliveryError, DeliveryResult};

/// Content type of push requests.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Upper bound on one push request, so a stalled Bark server cannot stall
/// the stream behind it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers payloads to one Bark push URL.
#[derive(Clone)]
pub struct BarkClient {
    client: reqwest::Client,
    target: String,
    auth: Option<(String, String)>,
}

impl std::fmt::Debug for BarkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarkClient")
            .field("target", &self.target)
            .field("basic_auth", &self.auth.is_some())
            .finish()
    }
}

impl BarkClient {
    /// Create a client for `target`, with optional basic auth `(user, password)`.
    pub fn new(target: &str, auth: Option<(String, String)>) -> DeliveryResult<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            target: target.to_string(),
            auth,
        })
    }

    /// The push URL.
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl Delivery for BarkClient {
    async fn deliver(&self, payload: &OutboundPayload) -> DeliveryResult<()> {
        let body = payload.to_json_vec().map_err(DeliveryError::Serialize)?;
        tracing::debug!("Sending payload: {}", String::from_utf8_lossy(&body));

        let mut request = self
            .client
            .post(&self.target)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
