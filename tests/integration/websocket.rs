//! Integration tests for the real-time alert stream

use std::net::SocketAddr;
use std::time::Duration;

use alertify::broadcast::CONNECTION_MESSAGE;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::helpers::{create_ingestor, spawn_test_hub, wait_for_open_subscribers};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> Client {
    let (stream, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    stream
}

/// Next text frame as JSON, panicking after one second
async fn next_event(client: &mut Client) -> Value {
    let message = tokio::time::timeout(Duration::from_secs(1), client.next())
        .await
        .expect("no event received")
        .unwrap()
        .unwrap();

    match message {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected frame: {other:?}"),
    }
}

async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected frame: {result:?}");
}

async fn submit_failure(addr: SocketAddr) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/monitor"))
        .json(&json!({ "siteId": 1, "url": "https://x.test", "statusCode": 503 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
}

#[tokio::test]
async fn test_connection_is_acknowledged() {
    let addr = spawn_test_hub(create_ingestor()).await;
    let mut client = connect(addr).await;

    let event = next_event(&mut client).await;
    assert_eq!(
        event,
        json!({ "type": "connection", "message": CONNECTION_MESSAGE })
    );
}

#[tokio::test]
async fn test_alert_fans_out_to_every_client() {
    let ingestor = create_ingestor();
    let broadcaster = ingestor.broadcaster().clone();
    let addr = spawn_test_hub(ingestor).await;

    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    next_event(&mut a).await;
    next_event(&mut b).await;
    wait_for_open_subscribers(&broadcaster, 2).await;

    submit_failure(addr).await;

    for client in [&mut a, &mut b] {
        let event = next_event(client).await;
        assert_eq!(event["type"], "alert");
        assert_eq!(event["data"]["id"], 1);
        assert_eq!(event["data"]["type"], "error");
        assert_eq!(event["data"]["message"], "HTTP 503 error at https://x.test");
    }

    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_closed_client_is_unregistered() {
    let ingestor = create_ingestor();
    let broadcaster = ingestor.broadcaster().clone();
    let addr = spawn_test_hub(ingestor).await;

    let mut staying = connect(addr).await;
    let mut leaving = connect(addr).await;
    next_event(&mut staying).await;
    next_event(&mut leaving).await;
    wait_for_open_subscribers(&broadcaster, 2).await;

    leaving.close(None).await.unwrap();
    wait_for_open_subscribers(&broadcaster, 1).await;

    submit_failure(addr).await;
    assert_eq!(next_event(&mut staying).await["type"], "alert");

    let stats: Value = reqwest::get(format!("http://{addr}/api/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["subscribers"], 1);
}

#[tokio::test]
async fn test_late_client_gets_no_backlog() {
    let ingestor = create_ingestor();
    let broadcaster = ingestor.broadcaster().clone();
    let addr = spawn_test_hub(ingestor).await;

    submit_failure(addr).await;

    let mut late = connect(addr).await;
    assert_eq!(next_event(&mut late).await["type"], "connection");
    wait_for_open_subscribers(&broadcaster, 1).await;

    assert_silent(&mut late).await;
}
