//! Typed match events and the per-role channel they travel on.
//!
//! The wire shape is `{"cmd": ..., "data": {...}}` with one concrete payload
//! per tag, so receivers match exhaustively instead of probing untyped
//! fields. Events always carry coordinates in the emitter's own frame; the
//! receiving side calls [`MatchEvent::mirrored`] before applying them.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::board::mirror;
use crate::game::EndReason;
use crate::types::{Owner, Piece, Square};

/// A subscriber role on the match channel. Events are routed to explicit
/// roles, never broadcast blindly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The local presentation layer.
    LocalUi,
    /// The in-process random adversary.
    Adversary,
    /// The network peer (via the relay service).
    Network,
}

/// Events flowing between match participants.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "cmd", content = "data", rename_all = "lowercase")]
pub enum MatchEvent {
    /// Match begins; `first` names the side to move, in the emitter's frame.
    Start { first: Owner },
    /// An accepted move. `turn` is the mover, in the emitter's frame.
    Move {
        src: Square,
        dest: Square,
        turn: Owner,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        captured: Option<Piece>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        promoted: bool,
    },
    /// Match is over.
    End { winner: Owner, reason: EndReason },
}

impl MatchEvent {
    /// Translate the event into the peer's frame: squares reflect, owners
    /// flip. Applying it twice returns the original event.
    pub fn mirrored(self) -> MatchEvent {
        match self {
            MatchEvent::Start { first } => MatchEvent::Start {
                first: first.opponent(),
            },
            MatchEvent::Move {
                src,
                dest,
                turn,
                captured,
                promoted,
            } => MatchEvent::Move {
                src: mirror(src),
                dest: mirror(dest),
                turn: turn.opponent(),
                captured: captured.map(|piece| Piece::new(piece.kind, piece.owner.opponent())),
                promoted,
            },
            MatchEvent::End { winner, reason } => MatchEvent::End {
                winner: winner.opponent(),
                reason,
            },
        }
    }
}

/// Fan-out channel with explicit subscriber roles.
///
/// Each subscriber gets its own unbounded receiver; `emit` routes an event
/// to exactly the listed roles. A subscriber that dropped its receiver is
/// skipped silently.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(Role, Sender<MatchEvent>)>,
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus::default()
    }

    pub fn subscribe(&mut self, role: Role) -> Receiver<MatchEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push((role, tx));
        rx
    }

    pub fn emit(&self, roles: &[Role], event: MatchEvent) {
        for (role, tx) in &self.subscribers {
            if roles.contains(role) {
                let _ = tx.send(event);
            }
        }
    }
}
