//! End-to-end tests: a real server, real `tokio-tungstenite` clients,
//! and the full match flow over the wire.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_tungstenite::tungstenite::Message;

use flyhunt::ServerBuilder;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on OS-assigned ports; returns (ws addr, health addr).
async fn start_server() -> (String, std::net::SocketAddr) {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .health_bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server.local_addr().expect("should have local addr").to_string();
    let health = server.health_addr().expect("health probe is enabled");

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, health)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("client should connect");
    ws
}

async fn send(ws: &mut ClientWs, event: Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("client send should succeed");
}

/// Receives the next data frame as JSON, with a hang guard.
async fn recv(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream ended unexpectedly")
            .expect("websocket error");
        match msg {
            Message::Binary(bytes) => {
                return serde_json::from_slice(&bytes).expect("server sent JSON");
            }
            Message::Text(text) => {
                return serde_json::from_str(&text).expect("server sent JSON");
            }
            _ => continue,
        }
    }
}

/// Creates a room for `name` and returns its code.
async fn create_room(ws: &mut ClientWs, name: &str) -> String {
    send(ws, json!({"event": "create-room", "data": name})).await;
    let created = recv(ws).await;
    assert_eq!(created["event"], "room-created");
    created["data"]["roomId"].as_str().expect("roomId").to_string()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_full_match_over_websockets() {
    let (addr, _) = start_server().await;
    let mut ann = connect(&addr).await;
    let mut bo = connect(&addr).await;

    // Ann opens a room and gets a 4-character code.
    let code = create_room(&mut ann, "Ann").await;
    assert_eq!(code.len(), 4);

    // Bo joins; both sides hear about it.
    send(
        &mut bo,
        json!({"event": "join-room", "data": {"roomId": code, "playerName": "Bo"}}),
    )
    .await;
    let joined = recv(&mut bo).await;
    assert_eq!(joined["event"], "room-joined");
    assert_eq!(joined["data"]["players"].as_array().unwrap().len(), 2);
    assert_eq!(recv(&mut ann).await["event"], "player-joined");

    // Ann readies: both get the update, nothing starts.
    send(&mut ann, json!({"event": "toggle-ready"})).await;
    assert_eq!(recv(&mut ann).await["event"], "players-updated");
    assert_eq!(recv(&mut bo).await["event"], "players-updated");

    // Bo readies: update then game-start, on both connections, with a
    // campaign level.
    send(&mut bo, json!({"event": "toggle-ready"})).await;
    assert_eq!(recv(&mut ann).await["event"], "players-updated");
    let start = recv(&mut ann).await;
    assert_eq!(start["event"], "game-start");
    let level = start["data"]["levelNumber"].as_u64().expect("levelNumber");
    assert!((1..=32).contains(&level));
    assert_eq!(recv(&mut bo).await["event"], "players-updated");
    assert_eq!(recv(&mut bo).await["event"], "game-start");

    // Ann scores; only Bo hears it, verbatim.
    send(
        &mut ann,
        json!({"event": "fly-found", "data": {"score": 100, "foundCount": 1}}),
    )
    .await;
    let update = recv(&mut bo).await;
    assert_eq!(update["event"], "opponent-update");
    assert_eq!(update["data"]["playerName"], "Ann");
    assert_eq!(update["data"]["score"], 100);
    assert_eq!(update["data"]["foundCount"], 1);

    // Both finish; each hears the other, then both get one game-over.
    send(
        &mut ann,
        json!({"event": "player-finished",
               "data": {"won": true, "score": 230, "foundCount": 8, "misclicks": 1}}),
    )
    .await;
    assert_eq!(recv(&mut bo).await["event"], "opponent-finished");

    send(
        &mut bo,
        json!({"event": "player-finished",
               "data": {"won": false, "score": 180, "foundCount": 6, "misclicks": 3}}),
    )
    .await;
    assert_eq!(recv(&mut ann).await["event"], "opponent-finished");

    for ws in [&mut ann, &mut bo] {
        let over = recv(ws).await;
        assert_eq!(over["event"], "game-over");
        let results = over["data"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        let ann_row = results
            .iter()
            .find(|r| r["name"] == "Ann")
            .expect("Ann in results");
        assert_eq!(ann_row["score"], 230);
        assert_eq!(ann_row["isHost"], true);
    }
}

#[tokio::test]
async fn test_join_unknown_room_gets_error_event() {
    let (addr, _) = start_server().await;
    let mut ws = connect(&addr).await;

    send(
        &mut ws,
        json!({"event": "join-room", "data": {"roomId": "QQQQ", "playerName": "Bo"}}),
    )
    .await;

    let err = recv(&mut ws).await;
    assert_eq!(err["event"], "join-error");
    assert_eq!(err["data"], "Room not found");
}

#[tokio::test]
async fn test_disconnect_migrates_host_and_notifies_survivor() {
    let (addr, _) = start_server().await;
    let mut ann = connect(&addr).await;
    let mut bo = connect(&addr).await;

    let code = create_room(&mut ann, "Ann").await;
    send(
        &mut bo,
        json!({"event": "join-room", "data": {"roomId": code, "playerName": "Bo"}}),
    )
    .await;
    assert_eq!(recv(&mut bo).await["event"], "room-joined");
    assert_eq!(recv(&mut ann).await["event"], "player-joined");

    // Ann's socket dies without a leave-room.
    ann.close(None).await.expect("close should succeed");

    let left = recv(&mut bo).await;
    assert_eq!(left["event"], "player-left");
    assert_eq!(left["data"]["playerName"], "Ann");
    let players = left["data"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["name"], "Bo");
    assert_eq!(players[0]["isHost"], true, "Bo inherited the room");
}

#[tokio::test]
async fn test_malformed_frames_are_ignored_not_fatal() {
    let (addr, _) = start_server().await;
    let mut ws = connect(&addr).await;

    send(&mut ws, json!({"event": "no-such-event", "data": 1})).await;
    ws.send(Message::Text("not json".into())).await.unwrap();

    // The connection is still serviceable.
    let code = create_room(&mut ws, "Ann").await;
    assert_eq!(code.len(), 4);
}

#[tokio::test]
async fn test_health_probe_reports_room_count() {
    let (addr, health) = start_server().await;

    let mut ann = connect(&addr).await;
    create_room(&mut ann, "Ann").await;

    let mut stream = tokio::net::TcpStream::connect(health)
        .await
        .expect("health probe should accept");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains(r#""status":"ok""#));
    assert!(response.contains(r#""rooms":1"#));
}
