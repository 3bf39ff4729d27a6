//! Per-room broadcast channels: join, state-change notifications, claims,
//! disconnect cleanup and play fan-out, driven over real sockets.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use helpers::spawn_server;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn create_room(addr: SocketAddr, room: &str) {
    let status = reqwest::Client::new()
        .post(format!("http://{addr}/rooms/{room}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status.as_u16(), 204);
}

async fn reserve(addr: SocketAddr, room: &str, instrument: &str) {
    let status = reqwest::Client::new()
        .post(format!("http://{addr}/rooms/{room}/instruments/{instrument}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status.as_u16(), 204);
}

async fn release(addr: SocketAddr, room: &str, instrument: &str) {
    let status = reqwest::Client::new()
        .delete(format!("http://{addr}/rooms/{room}/instruments/{instrument}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status.as_u16(), 204);
}

async fn join(addr: SocketAddr, room: &str) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}/rooms/{room}/channel"))
        .await
        .expect("failed to join room channel");
    ws
}

async fn send_json(ws: &mut WsClient, msg: Value) {
    ws.send(Message::Text(msg.to_string().into()))
        .await
        .unwrap();
}

async fn next_event(ws: &mut WsClient) -> Value {
    loop {
        let msg = timeout(WAIT, ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("channel closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Skip ahead to the next event of the given type.
async fn wait_for(ws: &mut WsClient, event_type: &str) -> Value {
    loop {
        let event = next_event(ws).await;
        if event["type"] == event_type {
            return event;
        }
    }
}

#[tokio::test]
async fn joins_an_existing_room() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;

    let _client = join(addr, "asdf").await;
}

#[tokio::test]
async fn rejects_joining_a_missing_room() {
    let addr = spawn_server().await;

    let result = connect_async(format!("ws://{addr}/rooms/qwerty/channel")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn notifies_members_of_reserve_and_release() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;
    let mut client = join(addr, "asdf").await;

    reserve(addr, "asdf", "drums").await;

    assert_eq!(
        next_event(&mut client).await,
        json!({ "type": "instrumentReserved", "instrument": "drums" })
    );
    assert_eq!(
        next_event(&mut client).await,
        json!({
            "type": "instrumentsChanged",
            "instruments": { "drums": true, "bass": false, "lead": false, "rhythm": false }
        })
    );

    // Claim the reservation, then release it over HTTP
    send_json(
        &mut client,
        json!({ "type": "reservedInstrument", "instrument": "drums" }),
    )
    .await;
    release(addr, "asdf", "drums").await;

    let event = wait_for(&mut client, "instrumentReleased").await;
    assert_eq!(event["instrument"], "drums");
    let event = wait_for(&mut client, "instrumentsChanged").await;
    assert_eq!(
        event["instruments"],
        json!({ "drums": false, "bass": false, "lead": false, "rhythm": false })
    );
}

#[tokio::test]
async fn releases_the_instrument_of_a_dropped_member() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;
    let mut first = join(addr, "asdf").await;
    let mut second = join(addr, "asdf").await;

    reserve(addr, "asdf", "drums").await;
    send_json(
        &mut first,
        json!({ "type": "reservedInstrument", "instrument": "drums" }),
    )
    .await;

    // Make sure the reservation reached the remaining member first
    let event = wait_for(&mut second, "instrumentsChanged").await;
    assert_eq!(event["instruments"]["drums"], true);

    // The claim and the close frame are ordered on the same connection, so
    // the claim lands before the disconnect cleanup runs
    first.close(None).await.unwrap();
    drop(first);

    let event = wait_for(&mut second, "instrumentReleased").await;
    assert_eq!(event["instrument"], "drums");
    let event = wait_for(&mut second, "instrumentsChanged").await;
    assert_eq!(event["instruments"]["drums"], false);
}

#[tokio::test]
async fn play_commands_fan_out_to_every_member() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;
    let mut first = join(addr, "asdf").await;
    let mut second = join(addr, "asdf").await;

    send_json(
        &mut first,
        json!({
            "type": "play",
            "instrument": "drums",
            "sound": { "file": "someFile.mp3" }
        }),
    )
    .await;

    // Everyone hears it, the sender included
    for client in [&mut first, &mut second] {
        let event = wait_for(client, "instrumentPlayed").await;
        assert_eq!(event["instrument"], "drums");
        assert_eq!(event["sound"], json!({ "file": "someFile.mp3" }));
    }
}

#[tokio::test]
async fn stop_commands_fan_out_to_every_member() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;
    let mut first = join(addr, "asdf").await;
    let mut second = join(addr, "asdf").await;

    send_json(
        &mut second,
        json!({ "type": "stop", "instrument": "lead" }),
    )
    .await;

    for client in [&mut first, &mut second] {
        let event = wait_for(client, "instrumentStopped").await;
        assert_eq!(event["instrument"], "lead");
        assert_eq!(event["sound"], Value::Null);
    }
}

#[tokio::test]
async fn deleting_the_room_ends_the_channel() {
    let addr = spawn_server().await;
    create_room(addr, "asdf").await;
    let mut client = join(addr, "asdf").await;

    let status = reqwest::Client::new()
        .delete(format!("http://{addr}/rooms/asdf"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status.as_u16(), 204);

    // The channel simply stops existing: the stream ends without any event
    let msg = timeout(WAIT, client.next())
        .await
        .expect("timed out waiting for the channel to close");
    match msg {
        Some(Ok(Message::Text(text))) => panic!("unexpected event after delete: {text}"),
        _ => {}
    }
}
