//! Local stand-ins for Bark and Gotify.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// A request received by [`BarkStub`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Default)]
struct BarkStubInner {
    requests: Vec<CapturedRequest>,
    responses: VecDeque<(StatusCode, String)>,
}

/// Fake Bark server: answers 200 unless told otherwise, records every request.
#[derive(Debug, Clone, Default)]
pub struct BarkStub {
    inner: Arc<Mutex<BarkStubInner>>,
    pub addr: Option<SocketAddr>,
}

impl BarkStub {
    pub async fn start() -> Self {
        let mut stub = Self::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        stub.addr = Some(listener.local_addr().unwrap());

        let app = Router::new().fallback(bark_handler).with_state(stub.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        stub
    }

    /// Push URL for a device key on this server.
    pub fn url(&self, device_key: &str) -> String {
        format!("http://{}/{}", self.addr.unwrap(), device_key)
    }

    pub fn respond_next(&self, status: StatusCode, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

async fn bark_handler(
    State(stub): State<BarkStub>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let mut inner = stub.inner.lock().unwrap();
    inner.requests.push(CapturedRequest {
        path: uri.path().to_string(),
        headers,
        body: body.to_vec(),
    });
    inner
        .responses
        .pop_front()
        .unwrap_or((StatusCode::OK, r#"{"code":200,"message":"success"}"#.to_string()))
}

/// Upgrade request seen by [`GotifyStub`].
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub uri: String,
    pub user_agent: Option<String>,
}

/// Fake Gotify `/stream`: each accepted connection is sent the next batch of
/// frames, then closed.
#[derive(Debug, Clone)]
pub struct GotifyStub {
    pub addr: SocketAddr,
    upgrades: Arc<Mutex<Vec<Upgrade>>>,
}

impl GotifyStub {
    pub async fn start(batches: Vec<Vec<String>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upgrades = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&upgrades);
        tokio::spawn(async move {
            for frames in batches {
                let (tcp, _) = listener.accept().await.unwrap();
                let seen = Arc::clone(&seen);
                let callback = move |req: &Request, resp: Response| {
                    seen.lock().unwrap().push(Upgrade {
                        uri: req.uri().to_string(),
                        user_agent: req
                            .headers()
                            .get("user-agent")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    Ok::<Response, ErrorResponse>(resp)
                };
                let mut ws = tokio_tungstenite::accept_hdr_async(tcp, callback)
                    .await
                    .unwrap();
                for frame in frames {
                    ws.send(Message::Text(frame.into())).await.unwrap();
                }
                let _ = ws.close(None).await;
                // Drain until the client answers the close
                while let Some(Ok(_)) = ws.next().await {}
            }
        });

        Self { addr, upgrades }
    }

    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn upgrades(&self) -> Vec<Upgrade> {
        self.upgrades.lock().unwrap().clone()
    }
}

/// A Gotify message frame.
pub fn gotify_frame(id: u32, title: &str, message: &str) -> String {
    serde_json::json!({
        "id": id,
        "appid": 1,
        "message": message,
        "title": title,
        "priority": 5,
        "date": "2024-06-01T12:00:00Z",
    })
    .to_string()
}
