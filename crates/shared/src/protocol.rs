//! JSON wire protocol for the lobby and relay service.
//!
//! Clients send an envelope `{"action": "...", "data": {...}}`. Validation
//! is two-stage so every failure mode gets its own reply: an unparseable
//! frame is an invalid request, a recognized envelope with an unknown
//! `action` is an invalid action, and a known action whose `data` does not
//! match its schema is invalid input data. Only a fully validated action
//! reaches a handler.
//!
//! Replies and broadcasts are one tagged enum, so the serialized `action`
//! field can never drift from the variant handling it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Raw client frame, before action-specific validation.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Envelope {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

/// A validated client request.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientAction {
    CreateRoom,
    JoinRoom { room_id: String },
    LeaveRoom,
    FetchRoom,
    SetNick { nickname: String },
    /// Opaque in-match payload, forwarded to the sender's room peer without
    /// interpretation.
    GameEvent { payload: Value },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomData {
    room_id: String,
}

#[derive(Deserialize)]
struct SetNickData {
    nickname: String,
}

#[derive(Deserialize)]
struct GameEventData {
    payload: Value,
}

impl ClientAction {
    /// Validate an envelope's `data` against the schema of its `action`.
    pub fn parse(envelope: &Envelope) -> Result<ClientAction, ProtocolError> {
        let invalid = |_| ProtocolError::InvalidData {
            action: envelope.action.clone(),
        };
        match envelope.action.as_str() {
            "CREATE_ROOM" => Ok(ClientAction::CreateRoom),
            "LEAVE_ROOM" => Ok(ClientAction::LeaveRoom),
            "FETCH_ROOM" => Ok(ClientAction::FetchRoom),
            "JOIN_ROOM" => {
                let data: JoinRoomData =
                    serde_json::from_value(envelope.data.clone()).map_err(invalid)?;
                Ok(ClientAction::JoinRoom {
                    room_id: data.room_id,
                })
            }
            "SET_NICK" => {
                let data: SetNickData =
                    serde_json::from_value(envelope.data.clone()).map_err(invalid)?;
                Ok(ClientAction::SetNick {
                    nickname: data.nickname,
                })
            }
            "GAME_EVENT" => {
                let data: GameEventData =
                    serde_json::from_value(envelope.data.clone()).map_err(invalid)?;
                Ok(ClientAction::GameEvent {
                    payload: data.payload,
                })
            }
            _ => Err(ProtocolError::UnknownAction {
                action: envelope.action.clone(),
            }),
        }
    }

    /// The wire name of this action, echoed in replies.
    pub fn name(&self) -> &'static str {
        match self {
            ClientAction::CreateRoom => "CREATE_ROOM",
            ClientAction::JoinRoom { .. } => "JOIN_ROOM",
            ClientAction::LeaveRoom => "LEAVE_ROOM",
            ClientAction::FetchRoom => "FETCH_ROOM",
            ClientAction::SetNick { .. } => "SET_NICK",
            ClientAction::GameEvent { .. } => "GAME_EVENT",
        }
    }
}

/// Envelope-level failures, each mapped to an error reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("invalid request")]
    InvalidRequest,
    #[error("invalid action")]
    UnknownAction { action: String },
    #[error("invalid input data")]
    InvalidData { action: String },
}

/// Lobby state of a room.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomStatus {
    #[serde(rename = "wait")]
    Waiting,
    #[serde(rename = "play")]
    Playing,
}

/// One row of the lobby listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    /// Member nicknames in join order; `None` for members that never set one.
    pub members: Vec<Option<String>>,
    pub status: RoomStatus,
}

/// Payload of the `FETCH_ROOM` reply.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomList {
    pub room_list: Vec<RoomSummary>,
}

/// Everything the server sends: replies, per-room notifications and
/// lobby-wide broadcasts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action")]
pub enum ServerMessage {
    /// Reply to `CREATE_ROOM`.
    #[serde(rename = "CREATE_ROOM")]
    CreateRoom {
        success: bool,
        #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        err: Option<String>,
    },

    /// Reply to `JOIN_ROOM`.
    #[serde(rename = "JOIN_ROOM")]
    JoinRoom {
        success: bool,
        #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        err: Option<String>,
    },

    /// Reply to `LEAVE_ROOM`.
    #[serde(rename = "LEAVE_ROOM")]
    LeaveRoom {
        success: bool,
        #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        err: Option<String>,
    },

    /// Reply to `FETCH_ROOM`.
    #[serde(rename = "FETCH_ROOM")]
    FetchRoom { success: bool, data: RoomList },

    /// Reply to `SET_NICK`.
    #[serde(rename = "SET_NICK")]
    SetNick { success: bool },

    /// Reply to `GAME_EVENT` for a sender who is not in a room.
    #[serde(rename = "GAME_EVENT")]
    GameEventReply {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        err: Option<String>,
    },

    /// In-match payload forwarded from the room peer.
    #[serde(rename = "GAME_EVENT_RELAY")]
    GameEvent { payload: Value },

    /// Lobby-wide: a room appeared.
    #[serde(rename = "NEW_ROOM")]
    NewRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    /// Lobby-wide: someone joined a room.
    #[serde(rename = "PLUS_ROOM_MEMBER")]
    PlusRoomMember {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    /// Lobby-wide: someone left a room (or disconnected out of one).
    #[serde(rename = "MINUS_ROOM_MEMBER")]
    MinusRoomMember {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    /// Per-room: sent to existing members when a member joins.
    #[serde(rename = "MEMBER_JOINED")]
    MemberJoined { id: String },

    /// Per-room: sent to remaining members when a member leaves.
    #[serde(rename = "MEMBER_LEFT")]
    MemberLeft { id: String },
}

/// Fallback reply for frames that never resolved to a known action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub success: bool,
    pub err: String,
}

impl ErrorReply {
    pub fn new(action: Option<String>, err: impl Into<String>) -> ErrorReply {
        ErrorReply {
            action,
            success: false,
            err: err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_room_envelope_parses() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"action":"CREATE_ROOM","data":{}}"#).expect("valid frame");
        assert_eq!(
            ClientAction::parse(&envelope),
            Ok(ClientAction::CreateRoom)
        );
    }

    #[test]
    fn test_join_room_requires_room_id() {
        let ok: Envelope =
            serde_json::from_str(r#"{"action":"JOIN_ROOM","data":{"roomId":"abc"}}"#)
                .expect("valid frame");
        assert_eq!(
            ClientAction::parse(&ok),
            Ok(ClientAction::JoinRoom {
                room_id: "abc".to_string()
            })
        );

        let missing: Envelope =
            serde_json::from_str(r#"{"action":"JOIN_ROOM","data":{}}"#).expect("valid frame");
        assert_eq!(
            ClientAction::parse(&missing),
            Err(ProtocolError::InvalidData {
                action: "JOIN_ROOM".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"action":"EXPLODE","data":{}}"#).expect("valid frame");
        assert_eq!(
            ClientAction::parse(&envelope),
            Err(ProtocolError::UnknownAction {
                action: "EXPLODE".to_string()
            })
        );
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        // The original clients sometimes omit `data` entirely on actions
        // that take none.
        let envelope: Envelope =
            serde_json::from_str(r#"{"action":"LEAVE_ROOM"}"#).expect("valid frame");
        assert_eq!(ClientAction::parse(&envelope), Ok(ClientAction::LeaveRoom));
    }

    #[test]
    fn test_set_nick_round_trip() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"action":"SET_NICK","data":{"nickname":"kim"}}"#)
                .expect("valid frame");
        assert_eq!(
            ClientAction::parse(&envelope),
            Ok(ClientAction::SetNick {
                nickname: "kim".to_string()
            })
        );
    }

    #[test]
    fn test_game_event_payload_is_opaque() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"action":"GAME_EVENT","data":{"payload":{"cmd":"move","data":{"src":4,"dest":7,"turn":"mine"}}}}"#,
        )
        .expect("valid frame");
        match ClientAction::parse(&envelope).expect("valid action") {
            ClientAction::GameEvent { payload } => {
                assert_eq!(payload["cmd"], "move");
                assert_eq!(payload["data"]["src"], 4);
            }
            other => panic!("wrong action: {other:?}"),
        }
    }

    #[test]
    fn test_reply_serialization_shape() {
        let reply = ServerMessage::CreateRoom {
            success: true,
            room_id: Some("room-1".to_string()),
            err: None,
        };
        assert_eq!(
            serde_json::to_value(&reply).expect("serializes"),
            json!({"action": "CREATE_ROOM", "success": true, "roomId": "room-1"})
        );

        let failure = ServerMessage::JoinRoom {
            success: false,
            room_id: None,
            err: Some("full".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&failure).expect("serializes"),
            json!({"action": "JOIN_ROOM", "success": false, "err": "full"})
        );
    }

    #[test]
    fn test_room_list_serialization() {
        let list = RoomList {
            room_list: vec![RoomSummary {
                room_id: "room-1".to_string(),
                members: vec![Some("kim".to_string()), None],
                status: RoomStatus::Waiting,
            }],
        };
        let json = serde_json::to_value(&ServerMessage::FetchRoom {
            success: true,
            data: list,
        })
        .expect("serializes");
        assert_eq!(json["data"]["roomList"][0]["roomId"], "room-1");
        assert_eq!(json["data"]["roomList"][0]["status"], "wait");
        assert_eq!(json["data"]["roomList"][0]["members"][1], Value::Null);
    }

    #[test]
    fn test_broadcast_round_trip() {
        let msg = ServerMessage::MinusRoomMember {
            room_id: "room-9".to_string(),
        };
        let text = serde_json::to_string(&msg).expect("serializes");
        let back: ServerMessage = serde_json::from_str(&text).expect("deserializes");
        assert_eq!(back, msg);
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = ErrorReply::new(None, "invalid request");
        assert_eq!(
            serde_json::to_value(&reply).expect("serializes"),
            json!({"success": false, "err": "invalid request"})
        );
    }
}
