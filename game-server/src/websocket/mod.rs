use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::session::{GameSession, SessionSettings};
use game_core::PreferenceStore;
use game_types::{ClientMessage, GameError, ServerMessage};

pub async fn handle_connection(
    websocket: WebSocket,
    settings: Arc<SessionSettings>,
    store: Arc<dyn PreferenceStore>,
    prefers_light: Option<bool>,
) {
    let session = GameSession::open(&settings, store, prefers_light).await;
    let session_id = session.id();
    info!("New WebSocket connection: {}", session_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let session_task = tokio::spawn(session.run(inbound_rx, outbound_tx.clone()));

    // Handle incoming messages
    let incoming_handler = async move {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(msg) if msg.is_close() => break,
                Ok(msg) => match parse_message(&msg) {
                    Ok(Some(message)) => {
                        if inbound_tx.send(message).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(error) => {
                        warn!("Bad message from {}: {}", session_id, error);
                        if outbound_tx.send(ServerMessage::Error { error }).is_err() {
                            break;
                        }
                    }
                },
                Err(e) => {
                    warn!("WebSocket error for {}: {}", session_id, e);
                    break;
                }
            }
        }
    };

    // Handle outgoing messages
    let outgoing_handler = async move {
        while let Some(message) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", session_id, e);
                break;
            }
        }
    };

    // Run both handlers concurrently
    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    // Both channel ends are gone now, so the session tears itself down.
    if let Err(e) = session_task.await {
        error!("Session {} task failed: {}", session_id, e);
    }
    info!("Connection {} disconnected", session_id);
}

/// Decode a client frame. Non-text frames carry no game input.
pub fn parse_message(msg: &Message) -> Result<Option<ClientMessage>, GameError> {
    if !msg.is_text() {
        return Ok(None);
    }

    let text = msg.to_str().map_err(|_| GameError::InvalidMessage {
        reason: "Invalid text message".to_string(),
    })?;

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| GameError::InvalidMessage {
            reason: format!("Invalid JSON message: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::Choice;

    #[test]
    fn test_parse_select_choice() {
        let msg = Message::text(r#"{"SelectChoice":{"choice":"rock"}}"#);
        let parsed = parse_message(&msg).unwrap();
        assert!(matches!(
            parsed,
            Some(ClientMessage::SelectChoice {
                choice: Choice::Rock
            })
        ));
    }

    #[test]
    fn test_parse_ignores_binary() {
        let msg = Message::binary(vec![1, 2, 3]);
        assert!(parse_message(&msg).unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let msg = Message::text("{not json");
        let err = parse_message(&msg).unwrap_err();
        assert!(matches!(err, GameError::InvalidMessage { .. }));

        let msg = Message::text(r#"{"SelectChoice":{"choice":"lizard"}}"#);
        assert!(parse_message(&msg).is_err());
    }
}
