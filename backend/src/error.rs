//! Relay service errors. Every variant maps to a structured error reply to
//! the requesting socket; none of them ever tears down the process or other
//! rooms.

use shared::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Referenced room does not exist, or the requester is in no room.
    #[error("no room")]
    RoomNotFound,

    /// Room already has its two players.
    #[error("full")]
    RoomFull,

    /// Requester is already a member of a room.
    #[error("already in a room")]
    AlreadyInRoom,

    /// Frame failed envelope validation; the reason is the reply text.
    #[error("{reason}")]
    InvalidEnvelope { reason: String },

    /// Room exists but the requester is its only member.
    #[error("no peer in room")]
    PeerUnavailable,
}

impl From<ProtocolError> for RelayError {
    fn from(err: ProtocolError) -> RelayError {
        RelayError::InvalidEnvelope {
            reason: err.to_string(),
        }
    }
}
