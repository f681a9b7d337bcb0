//! Envelope dispatch: validate a frame, run the matching handler, answer the
//! sender, and fan out the lobby-wide broadcasts.
//!
//! The relay never interprets in-match payloads. `GAME_EVENT` data is
//! forwarded verbatim to the sender's room peer; the rule engine on each end
//! is what gives it meaning.

use tracing::{info, warn};
use uuid::Uuid;

use crate::rooms::SharedRegistry;
use shared::{ClientAction, Envelope, ErrorReply, ProtocolError, ServerMessage};

/// Handle one text frame from `client_id`.
pub fn dispatch(registry: &SharedRegistry, client_id: Uuid, text: &str) {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(_) => {
            warn!(client = %client_id, "unparseable frame");
            send_error(registry, client_id, ErrorReply::new(None, "invalid request"));
            return;
        }
    };

    let action = match ClientAction::parse(&envelope) {
        Ok(action) => action,
        Err(err) => {
            warn!(client = %client_id, action = %envelope.action, %err, "rejected frame");
            let reason = match err {
                ProtocolError::UnknownAction { .. } => "invalid action",
                ProtocolError::InvalidData { .. } => "invalid input data",
                ProtocolError::InvalidRequest => "invalid request",
            };
            send_error(
                registry,
                client_id,
                ErrorReply::new(Some(envelope.action), reason),
            );
            return;
        }
    };

    let mut registry = registry.lock().unwrap();
    let reply = match action {
        ClientAction::CreateRoom => match registry.create_room(client_id) {
            Ok(room_id) => {
                info!(client = %client_id, room = %room_id, "room created");
                registry.broadcast(&ServerMessage::NewRoom {
                    room_id: room_id.clone(),
                });
                ServerMessage::CreateRoom {
                    success: true,
                    room_id: Some(room_id),
                    err: None,
                }
            }
            Err(err) => ServerMessage::CreateRoom {
                success: false,
                room_id: None,
                err: Some(err.to_string()),
            },
        },

        ClientAction::JoinRoom { room_id } => match registry.join_room(client_id, &room_id) {
            Ok(()) => {
                info!(client = %client_id, room = %room_id, "joined room");
                registry.broadcast(&ServerMessage::PlusRoomMember {
                    room_id: room_id.clone(),
                });
                ServerMessage::JoinRoom {
                    success: true,
                    room_id: Some(room_id),
                    err: None,
                }
            }
            Err(err) => ServerMessage::JoinRoom {
                success: false,
                room_id: None,
                err: Some(err.to_string()),
            },
        },

        ClientAction::LeaveRoom => match registry.leave_room(client_id) {
            Ok(Some(room_id)) => {
                info!(client = %client_id, room = %room_id, "left room");
                registry.broadcast(&ServerMessage::MinusRoomMember {
                    room_id: room_id.clone(),
                });
                ServerMessage::LeaveRoom {
                    success: true,
                    room_id: Some(room_id),
                    err: None,
                }
            }
            Ok(None) => ServerMessage::LeaveRoom {
                success: true,
                room_id: None,
                err: None,
            },
            Err(err) => ServerMessage::LeaveRoom {
                success: false,
                room_id: None,
                err: Some(err.to_string()),
            },
        },

        ClientAction::FetchRoom => ServerMessage::FetchRoom {
            success: true,
            data: registry.fetch(),
        },

        ClientAction::SetNick { nickname } => ServerMessage::SetNick {
            success: registry.set_nick(client_id, nickname),
        },

        ClientAction::GameEvent { payload } => match registry.peer_of(client_id) {
            Ok(peer) => {
                peer.send(&ServerMessage::GameEvent { payload });
                ServerMessage::GameEventReply {
                    success: true,
                    err: None,
                }
            }
            Err(err) => ServerMessage::GameEventReply {
                success: false,
                err: Some(err.to_string()),
            },
        },
    };

    if let Some(client) = registry.client(client_id) {
        client.send(&reply);
    }
}

/// Socket closed: implicit leave, then forget the client.
pub fn disconnect(registry: &SharedRegistry, client_id: Uuid) {
    let mut registry = registry.lock().unwrap();
    if let Some(room_id) = registry.unregister(client_id) {
        info!(client = %client_id, room = %room_id, "client left room on disconnect");
        registry.broadcast(&ServerMessage::MinusRoomMember { room_id });
    }
}

fn send_error(registry: &SharedRegistry, client_id: Uuid, reply: ErrorReply) {
    let registry = registry.lock().unwrap();
    if let Some(client) = registry.client(client_id) {
        match serde_json::to_string(&reply) {
            Ok(text) => client.send_raw(text),
            Err(err) => warn!(client = %client_id, %err, "failed to encode error reply"),
        }
    }
}
