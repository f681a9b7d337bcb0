//! Core data types shared across the engine.
//!
//! The board identifies positions by a flat `Square` index. Two coordinate
//! spaces share it and must be kept apart:
//!
//! - board squares `0..12`: the 3-wide, 4-deep grid, row major
//!   (`index = row * 3 + col`), row 0 being the local side's back rank;
//! - store squares `12..24`: two banks of six holding slots for captured
//!   pieces, `12..18` owned by [`Owner::Mine`], `18..24` by [`Owner::Enemy`].
//!
//! Every client simulates the match from its own frame, in which it is
//! always `Mine` on rows 0 and 1. Translation between the two frames is a
//! pure coordinate transform, see [`crate::board::mirror`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat square index covering both the board (`0..12`) and the two store
/// banks (`12..24`).
pub type Square = u8;

/// Piece kind. `Rooster` is the promoted form of `Chick` and demotes back to
/// `Chick` when captured.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Chick,
    Rooster,
    Lion,
    Elephant,
    Giraffe,
}

impl Kind {
    /// The kind a captured piece takes when it enters a store bank.
    pub fn demoted(self) -> Kind {
        match self {
            Kind::Rooster => Kind::Chick,
            other => other,
        }
    }
}

/// Which side a piece belongs to, in the local frame.
///
/// The names are symbolic, not "white/black": each client calls itself
/// `Mine`, and the mirror transform flips the label when a move crosses to
/// the peer's frame.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Mine,
    Enemy,
}

impl Owner {
    pub fn opponent(self) -> Owner {
        match self {
            Owner::Mine => Owner::Enemy,
            Owner::Enemy => Owner::Mine,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Mine => write!(f, "mine"),
            Owner::Enemy => write!(f, "enemy"),
        }
    }
}

/// A piece on the board or in a store bank.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: Kind,
    pub owner: Owner,
}

impl Piece {
    pub fn new(kind: Kind, owner: Owner) -> Self {
        Piece { kind, owner }
    }
}

/// What happens to a captured piece.
///
/// The two reference rule sets differ here: the tournament rules return
/// captures to play through the capturer's store bank, the simplified rules
/// remove them from the game. The rule is fixed for the lifetime of a match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureRule {
    /// Captured piece switches sides, demotes, and waits in the capturer's
    /// store bank until redeployed.
    #[default]
    Store,
    /// Captured piece leaves the game.
    Discard,
}
