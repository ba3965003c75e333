//! WebSocket connection to Gotify's `/stream` endpoint.

use async_trait::async_trait;
use bark_types::InboundEvent;
use futures_util::StreamExt;
use rustls::ClientConfig;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, USER_AGENT};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};

use super::{redact_token, stream_url, tls, EventSource, EventStream, STREAM_USER_AGENT};
use crate::error::{DialError, DialResult, StreamError, StreamResult};

/// Dials Gotify's `/stream` WebSocket.
pub struct GotifySource {
    url: String,
    tls: Arc<ClientConfig>,
}

impl std::fmt::Debug for GotifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GotifySource")
            .field("url", &redact_token(&self.url))
            .finish()
    }
}

impl GotifySource {
    /// Create a source for `host`, authenticating with a client `token`.
    ///
    /// `verify_tls` controls certificate checks for `https://` hosts.
    pub fn new(host: &str, token: &str, verify_tls: bool) -> DialResult<Self> {
        let tls = tls::client_config(verify_tls).map_err(|e| DialError::Tls(e.to_string()))?;
        Ok(Self {
            url: stream_url(host, token),
            tls,
        })
    }
}

#[async_trait]
impl EventSource for GotifySource {
    type Stream = GotifyStream;

    async fn connect(&self) -> DialResult<GotifyStream> {
        tracing::info!("Connecting to Gotify stream: {}", redact_token(&self.url));

        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| DialError::InvalidUrl(e.to_string()))?;
        request
            .headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static(STREAM_USER_AGENT));

        let connector = Connector::Rustls(Arc::clone(&self.tls));
        match connect_async_tls_with_config(request, None, false, Some(connector)).await {
            Ok((ws, _response)) => {
                tracing::info!("Successfully connected to Gotify stream");
                Ok(GotifyStream { ws })
            }
            Err(tungstenite::Error::Http(response)) => {
                let status = response.status().as_u16();
                let body = response
                    .body()
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).into_owned());
                Err(DialError::Handshake { status, body })
            }
            Err(e) => Err(DialError::Connection(e.to_string())),
        }
    }
}

/// An open Gotify stream.
pub struct GotifyStream {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for GotifyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GotifyStream").finish()
    }
}

#[async_trait]
impl EventStream for GotifyStream {
    async fn next_event(&mut self) -> StreamResult<InboundEvent> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(InboundEvent::from_json(&text)?),
                Some(Ok(Message::Binary(data))) => return Ok(InboundEvent::from_slice(&data)?),
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!("Close frame received: {:?}", frame);
                    return Err(StreamError::Closed);
                }
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(StreamError::Read(e.to_string())),
                None => return Err(StreamError::Closed),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!("Error closing stream: {}", e);
        }
    }
}
