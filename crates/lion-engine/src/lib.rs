//! Rule engine for "Catch the Lion", the 12-square shogi variant.
//!
//! The crate is split the same way the game is: board state and coordinate
//! mirroring ([`board`]), the static per-kind route tables ([`constants`],
//! [`routes`]), legality and move application ([`moves`]), the turn/state
//! machine that owns a match ([`game`]), the random adversary ([`ai`]) and
//! the typed event channel connecting them ([`events`]).
//!
//! Everything here is synchronous and allocation-light. The board is a plain
//! value type and [`moves::apply_move`] returns a new board instead of
//! mutating in place, so callers can preview, replay or discard positions
//! freely.

pub mod ai;
pub mod board;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod moves;
pub mod routes;
pub mod types;

pub use ai::{PlannedMove, RandomAdversary};
pub use board::{mirror, Board};
pub use error::{EngineError, EngineResult};
pub use events::{EventBus, MatchEvent, Role};
pub use game::{EndReason, GameOutcome, Match, MatchStatus};
pub use moves::{apply_move, legal_destinations, MoveOutcome};
pub use types::{CaptureRule, Kind, Owner, Piece, Square};
