//! Integration tests for the full connection flow over real WebSockets.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use sketch_server::words::Category;
use sketch_server::{serve, GameServer, OriginPolicy, WordCatalog};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type ClientWs = WebSocketStream<MaybeTlsStream<TcpStream>>;

static DRAGON_ONLY: &[Category] = &[("fantasy", &["dragon"])];

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

// =========================================================================
// Helpers
// =========================================================================

/// Starts a server on a random port and returns the address.
async fn start_server(origins: OriginPolicy) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr").to_string();

    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    let server = GameServer::new(cmd_rx, cmd_tx.downgrade(), Duration::from_secs(60))
        .with_catalog(WordCatalog::new(DRAGON_ONLY));
    tokio::spawn(server.run());
    tokio::spawn(serve(listener, cmd_tx, Arc::new(origins)));

    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("should send");
}

async fn join(ws: &mut ClientWs, name: &str, room_id: &str) -> String {
    send(ws, json!({"type": "join-room", "name": name, "roomId": room_id})).await;
    let joined = recv_event(ws, "joined-room").await;
    assert_eq!(joined["roomId"], room_id);
    joined["playerId"].as_str().expect("playerId").to_string()
}

/// Reads events up to and including the first one of type `event`.
async fn collect_until(ws: &mut ClientWs, event: &str) -> Vec<Value> {
    let mut seen = Vec::new();
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {event}, saw {seen:?}"))
            .expect("stream ended")
            .expect("websocket error");

        let Message::Text(text) = frame else {
            continue;
        };
        let value: Value = serde_json::from_str(&text).expect("server sent invalid JSON");
        let done = value["type"] == event;
        seen.push(value);
        if done {
            return seen;
        }
    }
}

async fn recv_event(ws: &mut ClientWs, event: &str) -> Value {
    collect_until(ws, event).await.pop().expect("at least one event")
}

fn types(events: &[Value]) -> Vec<&str> {
    events.iter().filter_map(|v| v["type"].as_str()).collect()
}

// =========================================================================
// Game flow
// =========================================================================

#[tokio::test]
async fn test_full_round_over_websocket() {
    let addr = start_server(OriginPolicy::AllowAll).await;

    // Alice creates the room and draws first
    let mut alice = connect(&addr).await;
    let alice_id = join(&mut alice, "Alice", "R1").await;
    let round = recv_event(&mut alice, "round-start").await;
    assert_eq!(round["currentDrawer"], alice_id.as_str());
    assert_eq!(round["wordLength"], 6);
    assert!(round.get("secretWord").is_none());
    let word = recv_event(&mut alice, "your-word").await;
    assert_eq!(word["secretWord"], "dragon");

    // Bob joins and sees both players
    let mut bob = connect(&addr).await;
    let bob_id = join(&mut bob, "Bob", "R1").await;
    let state = recv_event(&mut bob, "room-state").await;
    assert_eq!(state["players"].as_array().unwrap().len(), 2);
    assert_eq!(state["currentDrawer"], alice_id.as_str());

    // Alice draws, Bob renders
    send(
        &mut alice,
        json!({"type": "draw-data", "x0": 0.1, "y0": 0.1, "x1": 0.3, "y1": 0.3, "color": "#ff0000", "lineWidth": 6}),
    )
    .await;
    let line = recv_event(&mut bob, "render-line").await;
    assert_eq!(line["x0"], 0.1);
    assert_eq!(line["y1"], 0.3);
    assert_eq!(line["color"], "#ff0000");
    assert_eq!(line["lineWidth"], 6.0);

    // Near miss gets a private hint
    send(&mut bob, json!({"type": "submit-guess", "guess": "dragn"})).await;
    let feedback = recv_event(&mut bob, "guess-feedback").await;
    assert_eq!(feedback["message"], "You're so close!");

    // Correct guess
    send(&mut bob, json!({"type": "submit-guess", "guess": "Dragon"})).await;
    let alice_events = collect_until(&mut alice, "correct-guess").await;
    assert!(!types(&alice_events).contains(&"render-line"));
    assert!(!types(&alice_events).contains(&"guess-feedback"));
    let correct = alice_events.last().unwrap();
    assert_eq!(correct["guesserId"], bob_id.as_str());
    assert_eq!(correct["guesserName"], "Bob");
    assert_eq!(correct["drawerId"], alice_id.as_str());
    assert_eq!(correct["secretWord"], "dragon");

    let scores = recv_event(&mut alice, "room-state").await;
    let players = scores["players"].as_array().unwrap();
    assert_eq!(players[0]["score"], 50);
    assert_eq!(players[1]["score"], 100);

    // Bob draws next
    let next_round = recv_event(&mut alice, "round-start").await;
    assert_eq!(next_round["currentDrawer"], bob_id.as_str());
    recv_event(&mut bob, "your-word").await;
}

#[tokio::test]
async fn test_incomplete_join_is_rejected_privately() {
    let addr = start_server(OriginPolicy::AllowAll).await;
    let mut alice = connect(&addr).await;

    send(&mut alice, json!({"type": "join-room", "name": "  ", "roomId": "R1"})).await;
    let error = recv_event(&mut alice, "join-error").await;
    assert_eq!(error["message"], "Both name and roomId are required.");

    // Malformed frames are ignored and the connection stays usable
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    join(&mut alice, "Alice", "R1").await;
}

#[tokio::test]
async fn test_drawer_disconnect_hands_over_turn() {
    let addr = start_server(OriginPolicy::AllowAll).await;

    let mut alice = connect(&addr).await;
    join(&mut alice, "Alice", "R1").await;
    let mut bob = connect(&addr).await;
    let bob_id = join(&mut bob, "Bob", "R1").await;

    alice.close(None).await.unwrap();

    let events = collect_until(&mut bob, "your-word").await;
    assert!(events
        .iter()
        .any(|e| e["type"] == "system-message" && e["message"] == "Alice left the room."));
    let round = events
        .iter()
        .find(|e| e["type"] == "round-start")
        .expect("new round");
    assert_eq!(round["currentDrawer"], bob_id.as_str());
}

// =========================================================================
// Origin allow-list
// =========================================================================

#[tokio::test]
async fn test_origin_allow_list() {
    let addr = start_server(OriginPolicy::parse("draw.example.com")).await;

    let mut request = format!("ws://{addr}").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("Origin", "https://evil.example.com".parse().unwrap());
    assert!(tokio_tungstenite::connect_async(request).await.is_err());

    let mut request = format!("ws://{addr}").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("Origin", "https://draw.example.com".parse().unwrap());
    let (mut ws, _) = tokio_tungstenite::connect_async(request)
        .await
        .expect("allowed origin should connect");
    join(&mut ws, "Alice", "R1").await;
}

// =========================================================================
// Health check
// =========================================================================

async fn get_health(addr: &str) -> Value {
    let mut stream = TcpStream::connect(addr).await.expect("should connect");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut raw = String::new();
    tokio::time::timeout(RECV_TIMEOUT, stream.read_to_string(&mut raw))
        .await
        .expect("timed out reading health response")
        .unwrap();

    assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "got {raw:?}");
    let (_, body) = raw.split_once("\r\n\r\n").expect("response body");
    serde_json::from_str(body).expect("health body should be JSON")
}

#[tokio::test]
async fn test_health_reports_live_rooms() {
    let addr = start_server(OriginPolicy::AllowAll).await;
    assert_eq!(get_health(&addr).await, json!({"ok": true, "rooms": 0}));

    let mut alice = connect(&addr).await;
    join(&mut alice, "Alice", "R1").await;
    assert_eq!(get_health(&addr).await, json!({"ok": true, "rooms": 1}));

    // WebSocket clients on the same port are unaffected
    let mut bob = connect(&addr).await;
    join(&mut bob, "Bob", "R2").await;
    assert_eq!(get_health(&addr).await["rooms"], 2);
}
