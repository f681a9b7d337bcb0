//! Error types for the rule engine and match controller.

use thiserror::Error;

use crate::types::{Owner, Square};

/// Errors that can occur while querying or advancing a match.
///
/// All of these are recoverable from the caller's point of view: a rejected
/// move is reported back synchronously and leaves the board untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Square index out of range, or no piece on it where one is required.
    #[error("invalid square {square}: out of range or empty")]
    InvalidSquare { square: Square },

    /// Destination is not among the legal destinations of the source piece.
    #[error("illegal move: from square {from} to square {to}")]
    IllegalMove { from: Square, to: Square },

    /// A move was submitted by the side whose turn it is not.
    #[error("not {mover}'s turn")]
    NotYourTurn { mover: Owner },

    /// No empty slot left in the capturing side's store bank.
    #[error("{owner}'s store bank is full")]
    StoreFull { owner: Owner },

    /// The side to move has no legal move at all.
    #[error("{owner} has no legal move")]
    NoLegalMoves { owner: Owner },

    /// A move arrived before the match was started.
    #[error("match has not started")]
    MatchNotStarted,

    /// Start was requested on a match that is already under way or finished.
    #[error("match already started")]
    AlreadyStarted,

    /// A move arrived after the match finished.
    #[error("match is already over")]
    MatchOver,
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
