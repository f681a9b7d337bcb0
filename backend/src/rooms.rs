//! Room registry: connected clients, two-player rooms, membership lookups.
//!
//! The registry is plain data behind one mutex in the app state, mutated
//! only from socket handlers. Join and leave on the same room are therefore
//! linearized, which is what keeps the "at most 2 members" invariant.
//! Outbound traffic goes through each client's channel sender, so the
//! registry never touches a socket directly and tests can drive it with
//! plain channels.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::RelayError;
use shared::{RoomList, RoomStatus, RoomSummary, ServerMessage};

/// Registry handle shared by all connection handlers.
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// One connected socket, addressable by id.
pub struct Client {
    pub id: Uuid,
    pub nickname: Option<String>,
    outbound: UnboundedSender<String>,
}

impl Client {
    pub fn new(id: Uuid, outbound: UnboundedSender<String>) -> Client {
        Client {
            id,
            nickname: None,
            outbound,
        }
    }

    /// Serialize and queue a message. A closed channel means the socket is
    /// on its way out; the frame is dropped.
    pub fn send(&self, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => {
                let _ = self.outbound.send(text);
            }
            Err(err) => warn!(client = %self.id, %err, "failed to encode outbound message"),
        }
    }

    pub fn send_raw(&self, text: String) {
        let _ = self.outbound.send(text);
    }
}

/// A two-player room.
pub struct Room {
    pub id: String,
    pub master: Uuid,
    pub members: Vec<Uuid>,
    pub status: RoomStatus,
}

const ROOM_CAPACITY: usize = 2;

#[derive(Default)]
pub struct Registry {
    clients: HashMap<Uuid, Client>,
    rooms: HashMap<String, Room>,
    member_rooms: HashMap<Uuid, String>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register(&mut self, client: Client) {
        debug!(client = %client.id, "client registered");
        self.clients.insert(client.id, client);
    }

    /// Drop a client, leaving its room first. Returns the id of the room it
    /// was in, for the lobby-wide member-count broadcast.
    pub fn unregister(&mut self, client_id: Uuid) -> Option<String> {
        let left = self.leave_room(client_id).ok().flatten();
        self.clients.remove(&client_id);
        left
    }

    pub fn set_nick(&mut self, client_id: Uuid, nickname: String) -> bool {
        match self.clients.get_mut(&client_id) {
            Some(client) => {
                client.nickname = Some(nickname);
                true
            }
            None => false,
        }
    }

    pub fn client(&self, client_id: Uuid) -> Option<&Client> {
        self.clients.get(&client_id)
    }

    /// Create a room with the requester as sole member and master.
    pub fn create_room(&mut self, client_id: Uuid) -> Result<String, RelayError> {
        if self.member_rooms.contains_key(&client_id) {
            return Err(RelayError::AlreadyInRoom);
        }
        let room_id = Uuid::new_v4().to_string();
        self.rooms.insert(
            room_id.clone(),
            Room {
                id: room_id.clone(),
                master: client_id,
                members: vec![client_id],
                status: RoomStatus::Waiting,
            },
        );
        self.member_rooms.insert(client_id, room_id.clone());
        Ok(room_id)
    }

    /// Join an existing room. Existing members are notified; the room flips
    /// to `Playing` once its second member is in.
    pub fn join_room(&mut self, client_id: Uuid, room_id: &str) -> Result<(), RelayError> {
        if self.member_rooms.contains_key(&client_id) {
            return Err(RelayError::AlreadyInRoom);
        }
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or(RelayError::RoomNotFound)?;
        if room.members.len() >= ROOM_CAPACITY {
            return Err(RelayError::RoomFull);
        }

        let existing = room.members.clone();
        room.members.push(client_id);
        if room.members.len() == ROOM_CAPACITY {
            room.status = RoomStatus::Playing;
        }
        self.member_rooms.insert(client_id, room_id.to_string());

        let joined = ServerMessage::MemberJoined {
            id: client_id.to_string(),
        };
        for member in existing {
            if let Some(client) = self.clients.get(&member) {
                client.send(&joined);
            }
        }
        Ok(())
    }

    /// Remove the client from whichever room contains it. An empty room is
    /// destroyed, otherwise remaining members are notified and the room
    /// reopens for a new opponent. Not being in a room is not an error:
    /// the reply is a success with no room id, mirroring a no-op leave.
    pub fn leave_room(&mut self, client_id: Uuid) -> Result<Option<String>, RelayError> {
        let Some(room_id) = self.member_rooms.remove(&client_id) else {
            return Ok(None);
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Ok(None);
        };

        room.members.retain(|&member| member != client_id);
        if room.members.is_empty() {
            self.rooms.remove(&room_id);
            debug!(room = %room_id, "room destroyed");
            return Ok(Some(room_id));
        }

        room.status = RoomStatus::Waiting;
        if room.master == client_id {
            room.master = room.members[0];
        }
        let left = ServerMessage::MemberLeft {
            id: client_id.to_string(),
        };
        let remaining = room.members.clone();
        for member in remaining {
            if let Some(client) = self.clients.get(&member) {
                client.send(&left);
            }
        }
        Ok(Some(room_id))
    }

    /// Lobby snapshot for display.
    pub fn fetch(&self) -> RoomList {
        let room_list = self
            .rooms
            .values()
            .map(|room| RoomSummary {
                room_id: room.id.clone(),
                members: room
                    .members
                    .iter()
                    .map(|member| {
                        self.clients
                            .get(member)
                            .and_then(|client| client.nickname.clone())
                    })
                    .collect(),
                status: room.status,
            })
            .collect();
        RoomList { room_list }
    }

    /// The other member of the requester's room.
    pub fn peer_of(&self, client_id: Uuid) -> Result<&Client, RelayError> {
        let room_id = self
            .member_rooms
            .get(&client_id)
            .ok_or(RelayError::RoomNotFound)?;
        let room = self.rooms.get(room_id).ok_or(RelayError::RoomNotFound)?;
        room.members
            .iter()
            .find(|&&member| member != client_id)
            .and_then(|member| self.clients.get(member))
            .ok_or(RelayError::PeerUnavailable)
    }

    /// Lobby-wide broadcast to every connected socket.
    pub fn broadcast(&self, message: &ServerMessage) {
        for client in self.clients.values() {
            client.send(message);
        }
    }
}
