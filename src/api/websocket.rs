//! WebSocket endpoint for the frame-in, message-out measurement loop.
//!
//! ## Protocol
//!
//! Clients connect to `/ws` and stream frames; the server answers every
//! frame with exactly one JSON message, in order.
//!
//! ### Client -> server
//!
//! - `{"type": "image", "data": "<base64>"}` - one encoded camera frame
//! - `{"type": "reset"}` - discard calibration and filter state
//! - a raw binary message is treated as an encoded frame directly
//!
//! ### Server -> client
//!
//! - `calibrating` - sample collection progress plus guidance
//! - `height_update` - smoothed, confidence-scored reading
//! - `no_person` - calibrated but no usable geometry this frame
//! - `reset_ack` - reset acknowledged
//! - `error` - unusable frame or malformed command; state unaffected

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use base64::prelude::{Engine, BASE64_STANDARD};
use tracing::{debug, info, warn};

use super::dto::{ClientMessage, ServerMessage};
use super::state::AppState;
use crate::session::Session;

/// WebSocket upgrade handler.
#[tracing::instrument(skip(state, ws))]
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one session for the lifetime of one connection.
///
/// Processing is strictly sequential: calibration and filtering are
/// order-dependent, so frames are never handled concurrently within a
/// session.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut session = state.new_session();
    info!(session = %session.id(), "measurement session opened");

    while let Some(Ok(msg)) = socket.recv().await {
        let reply = match msg {
            Message::Text(text) => handle_text(&mut session, &text),
            // Raw binary frames skip the base64 detour.
            Message::Binary(bytes) => Some(session.process_frame(&bytes).into()),
            Message::Ping(_) | Message::Pong(_) => None,
            Message::Close(_) => {
                debug!(session = %session.id(), "client closed connection");
                break;
            }
        };

        if let Some(reply) = reply {
            match serde_json::to_string(&reply) {
                Ok(json) => {
                    if socket.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(session = %session.id(), error = %err, "reply serialization failed");
                    break;
                }
            }
        }
    }

    info!(
        session = %session.id(),
        frames = session.frames_processed(),
        "measurement session closed"
    );
    state.session_closed(session.frames_processed());
}

/// Handle one text command; `None` means nothing to send.
fn handle_text(session: &mut Session, text: &str) -> Option<ServerMessage> {
    let command = match serde_json::from_str::<ClientMessage>(text) {
        Ok(command) => command,
        Err(err) => {
            debug!(session = %session.id(), error = %err, "malformed client message");
            return Some(ServerMessage::Error {
                code: "malformed_message",
                message: err.to_string(),
            });
        }
    };

    match command {
        ClientMessage::Image { data } => {
            // Tolerate browser-style data URLs.
            let payload = data.rsplit(',').next().unwrap_or(&data);
            match BASE64_STANDARD.decode(payload.trim()) {
                Ok(bytes) => Some(session.process_frame(&bytes).into()),
                Err(err) => Some(ServerMessage::Error {
                    code: "undecodable_frame",
                    message: format!("invalid base64 image payload: {err}"),
                }),
            }
        }
        ClientMessage::Reset => {
            session.reset();
            Some(ServerMessage::ResetAck { progress: 0 })
        }
    }
}
