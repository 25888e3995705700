//! End-to-end session tests against a local WebSocket server

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::HeaderMap;
use tokio_tungstenite::tungstenite::Message;

use kalshi_auth::{
    canonical_message, verify_signature, AuthContext, Credentials, RsaPssSigner,
    ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER, ACCESS_TIMESTAMP_HEADER,
};
use kalshi_types::{Channel, Environment, HttpMethod, StreamMessageKind, WS_PATH};
use kalshi_ws::{
    ChannelHandler, SessionState, StreamConfig, StreamEvent, StreamSession, SubscriptionState,
    NORMAL_CLOSE,
};

const TEST_KEY_PEM: &str = include_str!("../../kalshi-auth/tests/fixtures/test_key_pkcs8.pem");

struct TestServer {
    url: String,
    headers: oneshot::Receiver<HeaderMap>,
    frames: JoinHandle<Vec<Value>>,
}

/// Accepts one connection, acknowledges every subscribe and records what
/// the client sent until it closes
async fn spawn_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (headers_tx, headers_rx) = oneshot::channel();

    let frames = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let _ = headers_tx.send(req.headers().clone());
            Ok(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .unwrap();

        let mut frames = Vec::new();
        let mut next_sid = 1;
        while let Some(msg) = ws.next().await {
            match msg.unwrap() {
                Message::Text(text) => {
                    let frame: Value = serde_json::from_str(&text).unwrap();
                    if frame["cmd"] == "subscribe" {
                        let ack = json!({
                            "id": frame["id"],
                            "type": "subscribed",
                            "msg": {"channel": frame["params"]["channels"][0], "sid": next_sid},
                        });
                        next_sid += 1;
                        ws.send(Message::Text(ack.to_string())).await.unwrap();
                    }
                    frames.push(frame);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        frames
    });

    TestServer {
        url: format!("ws://{addr}{WS_PATH}"),
        headers: headers_rx,
        frames,
    }
}

async fn next_ack(events: &mut mpsc::UnboundedReceiver<StreamEvent>) -> u64 {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if let StreamEvent::Message(msg) = event {
            if msg.kind == StreamMessageKind::Subscribed {
                return msg.id.unwrap();
            }
        }
    }
}

#[tokio::test]
async fn test_signed_session_round_trip() {
    let server = spawn_server().await;
    let creds = Credentials::from_pem_str("test-key-id", TEST_KEY_PEM).unwrap();
    let public = RsaPssSigner::from_credentials(&creds).public_key();
    let auth = AuthContext::new(&creds, Environment::Sandbox);

    let (handler, mut events) = ChannelHandler::new();
    let handler = handler.with_subscriptions(vec![Channel::ticker()]);
    let mut session = StreamSession::new(auth, StreamConfig::new().with_url(&server.url));
    let handle = session.open(Arc::new(handler)).await.unwrap();

    // Default subscription from on_open
    assert_eq!(next_ack(&mut events).await, 1);
    assert_eq!(handle.channel_state(&Channel::ticker()), SubscriptionState::Active);

    assert_eq!(handle.subscribe_orderbook(&["KXHIGHNY-25JAN01-B40"]).unwrap(), 2);
    assert_eq!(next_ack(&mut events).await, 2);
    assert_eq!(handle.active_channels().len(), 2);

    session.close().await.unwrap();
    assert_eq!(handle.state(), SessionState::Closed);
    assert!(handle.channels().is_empty());

    let closed = loop {
        match events.recv().await {
            Some(StreamEvent::Closed { code, .. }) => break code,
            Some(_) => continue,
            None => panic!("no close event"),
        }
    };
    assert_eq!(closed, NORMAL_CLOSE);

    let frames = server.frames.await.unwrap();
    let ids: Vec<u64> = frames.iter().map(|f| f["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(frames[1]["params"]["channels"][0], "orderbook_delta:KXHIGHNY-25JAN01-B40");

    let headers = server.headers.await.unwrap();
    let header = |name: &str| headers.get(name).unwrap().to_str().unwrap().to_string();
    assert_eq!(header(ACCESS_KEY_HEADER), "test-key-id");
    let message = canonical_message(
        header(ACCESS_TIMESTAMP_HEADER).parse().unwrap(),
        HttpMethod::Get,
        WS_PATH,
    );
    assert!(verify_signature(&public, message.as_bytes(), &header(ACCESS_SIGNATURE_HEADER)).is_ok());
}

#[tokio::test]
async fn test_unreachable_server_fails_handshake() {
    // Bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();

    let creds = Credentials::from_pem_str("test-key-id", TEST_KEY_PEM).unwrap();
    let auth = AuthContext::new(&creds, Environment::Sandbox);
    let config = StreamConfig::new()
        .with_url(format!("ws://{addr}{WS_PATH}"))
        .with_connect_timeout(Duration::from_secs(2));
    let mut session = StreamSession::new(auth, config);
    let (handler, mut events) = ChannelHandler::new();

    let err = session.open(Arc::new(handler)).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(session.state(), SessionState::Errored);
    assert!(matches!(events.recv().await, Some(StreamEvent::Error(_))));
}
