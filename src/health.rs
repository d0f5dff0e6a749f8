//! Health check endpoint
//!
//! A plain `GET /health` on the game port is answered with a small JSON
//! report instead of a WebSocket upgrade. The room count comes from the
//! GameServer actor through a reply channel.

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::AppError;
use crate::server::ServerCommand;

/// Request line prefix that selects the health report
const HEALTH_REQUEST: &[u8] = b"GET /health ";
/// Largest request head read before answering
const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Body of the health response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub rooms: usize,
}

/// Check whether the connection opens with a health request
///
/// Only peeks, so a WebSocket handshake can still read the full request.
pub async fn is_health_check(stream: &TcpStream) -> Result<bool, AppError> {
    let mut buf = [0u8; HEALTH_REQUEST.len()];
    let n = stream.peek(&mut buf).await?;
    Ok(&buf[..n] == HEALTH_REQUEST)
}

/// Ask the GameServer for a report
pub async fn request_report(
    cmd_tx: &mpsc::Sender<ServerCommand>,
) -> Result<HealthReport, AppError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::Health { reply: reply_tx })
        .await
        .map_err(|_| AppError::ChannelSend)?;
    reply_rx.await.map_err(|_| AppError::ChannelSend)
}

/// Answer a health request and close the connection
pub async fn answer(
    mut stream: TcpStream,
    cmd_tx: &mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    // Consume the request head so closing does not reset the connection
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < MAX_REQUEST_HEAD {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
    }

    let report = request_report(cmd_tx).await?;
    let body = serde_json::to_string(&report)?;
    debug!("Health check: {}", body);

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialize() {
        let report = HealthReport { ok: true, rooms: 3 };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"ok":true,"rooms":3}"#
        );
    }

    #[tokio::test]
    async fn test_request_report_fails_without_server() {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        drop(cmd_rx);
        assert!(matches!(
            request_report(&cmd_tx).await,
            Err(AppError::ChannelSend)
        ));
    }
}
