//! Wire types shared by the relay service and its clients.

pub mod protocol;

pub use protocol::{
    ClientAction, Envelope, ErrorReply, ProtocolError, RoomList, RoomStatus, RoomSummary,
    ServerMessage,
};
