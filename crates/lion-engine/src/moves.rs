//! Legality queries and move application.
//!
//! Both entry points are pure functions over a [`Board`] value:
//! [`legal_destinations`] never touches state and is safe to call for
//! "show valid moves" highlighting, [`apply_move`] returns the successor
//! position and leaves its input untouched.

use crate::board::{drop_zone, is_board_square, is_store_square, mirror, Board};
use crate::error::{EngineError, EngineResult};
use crate::routes::reachable;
use crate::types::{CaptureRule, Kind, Owner, Piece, Square};

/// Result of applying one move: the successor board plus the side effects a
/// caller may want to surface (captured piece for animation, promotion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    /// The piece that stood on the destination, as it stood there. Under the
    /// `Store` rule its demoted, converted form is in the mover's bank.
    pub captured: Option<Piece>,
    /// Whether the moved Chick promoted to Rooster on arrival.
    pub promoted: bool,
}

/// Legal destination squares for the piece on `square`.
///
/// For a board square this is the piece's route table filtered against
/// friendly occupancy; squares held by the opponent stay in and imply a
/// capture. For a store slot it is the drop rule instead: every empty board
/// square in the owner's home half.
///
/// Errors with [`EngineError::InvalidSquare`] when `square` is out of range
/// or empty.
pub fn legal_destinations(board: &Board, square: Square) -> EngineResult<Vec<Square>> {
    let piece = board
        .piece_at(square)
        .ok_or(EngineError::InvalidSquare { square })?;

    if is_store_square(square) {
        return Ok(drop_zone(piece.owner)
            .filter(|&dest| board.piece_at(dest).is_none())
            .collect());
    }

    Ok(reachable(piece.kind, piece.owner, square)
        .into_iter()
        .filter(|&dest| {
            board
                .piece_at(dest)
                .is_none_or(|occupant| occupant.owner != piece.owner)
        })
        .collect())
}

/// Apply the move `src -> dest`, returning the successor position.
///
/// `dest` must be in `legal_destinations(board, src)`; anything else is an
/// [`EngineError::IllegalMove`], never silently ignored. Effects, in order:
/// capture (occupant demotes, switches sides and goes to the mover's first
/// free store slot, or leaves the game under `Discard`), relocation, then
/// the promotion check. A Chick promotes only when moved from the board onto
/// the opponent's farthest rank; a drop onto that rank does not promote.
pub fn apply_move(
    board: &Board,
    src: Square,
    dest: Square,
    rule: CaptureRule,
) -> EngineResult<MoveOutcome> {
    let mover = board
        .piece_at(src)
        .ok_or(EngineError::InvalidSquare { square: src })?;

    if !legal_destinations(board, src)?.contains(&dest) {
        return Err(EngineError::IllegalMove {
            from: src,
            to: dest,
        });
    }

    let mut next = *board;
    let captured = next.piece_at(dest);

    if let Some(victim) = captured {
        if rule == CaptureRule::Store {
            let slot = next
                .free_store_slot(mover.owner)
                .ok_or(EngineError::StoreFull { owner: mover.owner })?;
            next.set(slot, Some(Piece::new(victim.kind.demoted(), mover.owner)));
        }
    }

    next.set(dest, Some(mover));
    next.set(src, None);

    let mut promoted = false;
    if mover.kind == Kind::Chick
        && is_board_square(src)
        && crate::board::is_far_rank(mover.owner, dest)
    {
        next.set(dest, Some(Piece::new(Kind::Rooster, mover.owner)));
        promoted = true;
    }

    Ok(MoveOutcome {
        board: next,
        captured,
        promoted,
    })
}

/// Every legal `(src, dest)` pair for `owner`, flattened in square order.
pub fn all_moves(board: &Board, owner: Owner) -> Vec<(Square, Square)> {
    board
        .squares_of(owner)
        .flat_map(|src| {
            legal_destinations(board, src)
                .unwrap_or_default()
                .into_iter()
                .map(move |dest| (src, dest))
        })
        .collect()
}

/// Mirror a move into the peer's coordinate frame.
#[inline]
pub fn mirror_move(src: Square, dest: Square) -> (Square, Square) {
    (mirror(src), mirror(dest))
}
