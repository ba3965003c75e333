//! The relay against local Gotify and Bark servers.

mod common;

use axum::http::StatusCode;
use bark_crypto::{decrypt, AesKey};
use common::{gotify_frame, BarkStub, GotifyStub};
use gotify_bark_relay::error::DialError;
use gotify_bark_relay::stream::{EventSource, GotifySource, STREAM_USER_AGENT};
use gotify_bark_relay::{Relay, RelayConfig, Step};
use std::time::Duration;

fn config(gotify: &GotifyStub, bark: &BarkStub) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.gotify.host = gotify.host();
    config.gotify.token = "CLIENT_TOKEN".to_string();
    config.bark.target = bark.url("DEVICE");
    config.bark.icon = "https://icon/x.png".to_string();
    config.reconnect.delay_secs = 0;
    config
}

#[tokio::test]
async fn forwards_stream_message_to_bark() {
    let gotify = GotifyStub::start(vec![vec![gotify_frame(1, "A", "B")]]).await;
    let bark = BarkStub::start().await;
    let config = config(&gotify, &bark);
    let mut relay = Relay::from_config(&config).unwrap();

    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::Forwarded);

    let upgrades = gotify.upgrades();
    assert_eq!(upgrades.len(), 1);
    assert_eq!(upgrades[0].uri, "/stream?token=CLIENT_TOKEN");
    assert_eq!(upgrades[0].user_agent.as_deref(), Some(STREAM_USER_AGENT));

    let requests = bark.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].json(),
        serde_json::json!({
            "title": "A",
            "body": "B",
            "badge": 1,
            "sound": "minuet",
            "group": "Gotify",
            "icon": "https://icon/x.png",
            "url": gotify.host(),
            "device_key": bark.url("DEVICE"),
        })
    );
}

#[tokio::test]
async fn delivery_failure_keeps_reading_same_stream() {
    let gotify = GotifyStub::start(vec![vec![
        gotify_frame(1, "first", "1"),
        gotify_frame(2, "second", "2"),
    ]])
    .await;
    let bark = BarkStub::start().await;
    bark.respond_next(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let mut relay = Relay::from_config(&config(&gotify, &bark)).unwrap();

    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::Dropped);
    assert!(relay.state().is_connected());
    assert_eq!(relay.step().await, Step::Forwarded);

    assert_eq!(gotify.upgrades().len(), 1);
    let titles: Vec<String> = bark
        .requests()
        .iter()
        .map(|r| r.json()["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["first", "second"]);
}

#[tokio::test]
async fn server_close_triggers_reconnect() {
    let gotify = GotifyStub::start(vec![
        vec![gotify_frame(1, "before", "x")],
        vec![gotify_frame(2, "after", "y")],
    ])
    .await;
    let bark = BarkStub::start().await;
    let mut relay = Relay::from_config(&config(&gotify, &bark)).unwrap();

    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::Forwarded);
    assert_eq!(relay.step().await, Step::StreamLost);
    assert!(!relay.state().is_connected());
    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::Forwarded);

    assert_eq!(gotify.upgrades().len(), 2);
    assert_eq!(bark.requests().len(), 2);
}

#[tokio::test]
async fn undecodable_frame_triggers_reconnect() {
    let gotify = GotifyStub::start(vec![
        vec!["not a gotify message".to_string()],
        vec![gotify_frame(3, "ok", "z")],
    ])
    .await;
    let bark = BarkStub::start().await;
    let mut relay = Relay::from_config(&config(&gotify, &bark)).unwrap();

    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::StreamLost);
    assert!(bark.requests().is_empty());

    assert_eq!(relay.step().await, Step::Connected);
    assert_eq!(relay.step().await, Step::Forwarded);
}

#[tokio::test]
async fn encrypted_relay_sends_ciphertext_only() {
    let gotify = GotifyStub::start(vec![vec![
        gotify_frame(1, "secret title", "secret body"),
        gotify_frame(2, "second", "again"),
    ]])
    .await;
    let bark = BarkStub::start().await;
    let mut config = config(&gotify, &bark);
    config.bark.aes_key = Some("0123456789abcdef".to_string());
    let mut relay = Relay::from_config(&config).unwrap();

    relay.step().await;
    assert_eq!(relay.step().await, Step::Forwarded);
    assert_eq!(relay.step().await, Step::Forwarded);

    let requests = bark.requests();
    let bodies: Vec<serde_json::Value> = requests.iter().map(|r| r.json()).collect();
    for body in &bodies {
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2, "unexpected fields in {body}");
        assert!(object.contains_key("ciphertext"));
        assert!(object.contains_key("iv"));
    }
    assert_ne!(bodies[0]["iv"], bodies[1]["iv"]);

    let iv = bodies[0]["iv"].as_str().unwrap();
    let plaintext = decrypt(
        bodies[0]["ciphertext"].as_str().unwrap(),
        &AesKey::new("0123456789abcdef"),
        iv.as_bytes(),
    )
    .unwrap();
    let inner: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
    assert_eq!(inner["title"], "secret title");
    assert_eq!(inner["body"], "secret body");
}

#[tokio::test]
async fn dial_to_closed_port_is_connection_error() {
    // Bind then drop to get a port with nothing listening
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let source = GotifySource::new(&format!("http://{addr}"), "T", false).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), source.connect())
        .await
        .unwrap();
    assert!(matches!(result, Err(DialError::Connection(_))));
}

#[tokio::test]
async fn rejected_handshake_carries_status_and_body() {
    // Bark stub answers every request (including the upgrade) with 401
    let bark = BarkStub::start().await;
    bark.respond_next(StatusCode::UNAUTHORIZED, "{\"error\":\"Unauthorized\"}");
    let host = format!("http://{}", bark.addr.unwrap());
    let source = GotifySource::new(&host, "BAD", false).unwrap();

    match source.connect().await {
        Err(DialError::Handshake { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body.as_deref(), Some("{\"error\":\"Unauthorized\"}"));
        }
        other => panic!("expected handshake error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(bark.requests()[0].path, "/stream");
}
