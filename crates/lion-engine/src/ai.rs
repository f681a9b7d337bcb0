//! The random adversary.
//!
//! The adversary keeps its own board in its own frame, where it is always
//! `Mine`. Peer moves arrive in the peer's frame and are mirrored before
//! bookkeeping; planned moves are mirrored back on the way out, so the wire
//! never sees the adversary's internal frame.
//!
//! Think time is returned as data, not slept here: the driver schedules the
//! delay on its own timer and hands the move back to the match controller,
//! which discards it if the epoch moved on in the meantime.

use rand::Rng;

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::moves::{all_moves, apply_move, mirror_move};
use crate::types::{CaptureRule, Owner, Square};

/// Reference think-time range, milliseconds.
const THINK_TIME_MS: std::ops::Range<u64> = 1_000..3_000;

/// A move the adversary intends to play after its think time elapses.
///
/// Coordinates are already in the peer's frame. `epoch` pins the move to the
/// match generation it was planned against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedMove {
    pub src: Square,
    pub dest: Square,
    pub delay_ms: u64,
    pub epoch: u64,
}

/// Uniformly random legal-move player.
pub struct RandomAdversary {
    board: Board,
    rule: CaptureRule,
}

impl RandomAdversary {
    pub fn new(rule: CaptureRule) -> RandomAdversary {
        RandomAdversary {
            board: Board::initial(),
            rule,
        }
    }

    /// The adversary's private view of the position, in its own frame.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Record a move played by the peer, given in the peer's frame.
    pub fn observe_peer_move(&mut self, src: Square, dest: Square) -> EngineResult<()> {
        let (src, dest) = mirror_move(src, dest);
        self.board = apply_move(&self.board, src, dest, self.rule)?.board;
        Ok(())
    }

    /// Pick a move uniformly at random among all legal ones, apply it to the
    /// private board, and return it mirrored into the peer's frame together
    /// with a randomized think time.
    ///
    /// Errors with [`EngineError::NoLegalMoves`] when nothing is playable;
    /// the caller resolves that as a loss rather than crashing or passing.
    pub fn plan(&mut self, epoch: u64) -> EngineResult<PlannedMove> {
        let candidates = all_moves(&self.board, Owner::Mine);
        if candidates.is_empty() {
            return Err(EngineError::NoLegalMoves { owner: Owner::Mine });
        }

        let mut rng = rand::rng();
        let (src, dest) = candidates[rng.random_range(0..candidates.len())];
        self.board = apply_move(&self.board, src, dest, self.rule)?.board;

        let (src, dest) = mirror_move(src, dest);
        Ok(PlannedMove {
            src,
            dest,
            delay_ms: rng.random_range(THINK_TIME_MS),
            epoch,
        })
    }

    /// Forget the game and return to the starting position.
    pub fn reset(&mut self) {
        self.board = Board::initial();
    }
}
