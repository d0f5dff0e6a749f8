//! WebSocket connection handler
//!
//! Handles individual client connections: health probes, origin check
//! during the WebSocket handshake, message parsing and validation, and bidirectional
//! communication with the GameServer.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{header::ORIGIN, StatusCode};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, warn};

use crate::config::OriginPolicy;
use crate::error::AppError;
use crate::health;
use crate::message::{ClientMessage, ServerMessage};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Accept connections forever, one handler task each
pub async fn serve(
    listener: TcpListener,
    cmd_tx: mpsc::Sender<ServerCommand>,
    origins: Arc<OriginPolicy>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();
                let origins = Arc::clone(&origins);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    match handle_connection(stream, cmd_tx, origins).await {
                        Ok(()) => {}
                        Err(e @ AppError::OriginRejected(_)) => warn!("{}", e),
                        Err(e) => error!("Connection handler error: {}", e),
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake (refusing disallowed origins), sets up
/// bidirectional communication, and manages the connection lifecycle.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    origins: Arc<OriginPolicy>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    if health::is_health_check(&stream).await? {
        return health::answer(stream, &cmd_tx).await;
    }

    // WebSocket handshake
    let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, origin_check(origins)).await
    {
        Ok(ws) => ws,
        Err(WsError::Http(response)) if response.status() == StatusCode::FORBIDDEN => {
            return Err(AppError::OriginRejected(peer_addr));
        }
        Err(e) => return Err(e.into()),
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Generate client ID
    let client_id = ClientId::new();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Create channel for server -> client messages
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Register with GameServer
    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        let Some(cmd) = client_message_to_command(client_id, client_msg) else {
                            continue;
                        };
                        if cmd_tx_read.send(cmd).await.is_err() {
                            debug!("Server closed, ending read task for {}", client_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Invalid JSON from {}: {}", client_id, e);
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(_) => {
                    // Binary, ping and pong frames - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (ServerMessage -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                }
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    // Send disconnect command
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Build the handshake callback enforcing the origin allow-list
fn origin_check(
    origins: Arc<OriginPolicy>,
) -> impl FnOnce(&Request, Response) -> Result<Response, ErrorResponse> {
    move |request: &Request, response: Response| {
        let origin = request
            .headers()
            .get(ORIGIN)
            .and_then(|value| value.to_str().ok());

        if origins.allows(origin) {
            return Ok(response);
        }

        warn!("Refusing handshake from origin {:?}", origin);
        let mut rejection = ErrorResponse::new(Some("Origin not allowed".to_string()));
        *rejection.status_mut() = StatusCode::FORBIDDEN;
        Err(rejection)
    }
}

/// Convert a ClientMessage to a ServerCommand
///
/// Returns None for payloads that fail validation.
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> Option<ServerCommand> {
    let cmd = match msg {
        ClientMessage::JoinRoom { name, room_id } => ServerCommand::JoinRoom {
            client_id,
            name,
            room_id,
        },
        ClientMessage::DrawData(segment) => {
            if !segment.is_valid() {
                debug!("Dropping invalid stroke from {}", client_id);
                return None;
            }
            ServerCommand::Draw { client_id, segment }
        }
        ClientMessage::SubmitGuess { guess } => ServerCommand::Guess { client_id, guess },
        ClientMessage::RequestNewWord => ServerCommand::RequestNewWord { client_id },
    };
    Some(cmd)
}
