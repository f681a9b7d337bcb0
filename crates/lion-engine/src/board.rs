//! Board state and coordinate helpers.
//!
//! [`Board`] is a plain `Copy` value: 24 optional piece slots, board squares
//! first, then the two store banks. Move application copies the value and
//! returns the new position, so no caller ever observes an intermediate
//! state.

use crate::constants::*;
use crate::types::{Kind, Owner, Piece, Square};

/// Check that a square addresses the playable grid.
#[inline]
pub fn is_board_square(square: Square) -> bool {
    square < BOARD_SQUARES
}

/// Check that a square addresses one of the two store banks.
#[inline]
pub fn is_store_square(square: Square) -> bool {
    (MINE_STORE_START..TOTAL_SQUARES).contains(&square)
}

/// First slot of `owner`'s store bank.
#[inline]
pub fn store_start(owner: Owner) -> Square {
    match owner {
        Owner::Mine => MINE_STORE_START,
        Owner::Enemy => ENEMY_STORE_START,
    }
}

/// Board squares a stored piece of `owner` may be dropped on: the owner's
/// home half of the grid. Dropping into the opponent's half is not allowed.
#[inline]
pub fn drop_zone(owner: Owner) -> std::ops::Range<Square> {
    match owner {
        Owner::Mine => 0..STORE_SLOTS,
        Owner::Enemy => STORE_SLOTS..BOARD_SQUARES,
    }
}

/// The opponent's farthest rank for `owner`: reaching it promotes a Chick.
#[inline]
pub fn is_far_rank(owner: Owner, square: Square) -> bool {
    match owner {
        Owner::Mine => (9..12).contains(&square),
        Owner::Enemy => square < 3,
    }
}

/// Translate a square between the two players' local frames.
///
/// Board squares reflect through the grid center, store slots swap banks.
/// The transform is its own inverse: `mirror(mirror(s)) == s` for every
/// valid square.
#[inline]
pub fn mirror(square: Square) -> Square {
    debug_assert!(square < TOTAL_SQUARES, "square {square} out of range");
    if square < BOARD_SQUARES {
        11 - square
    } else if square < ENEMY_STORE_START {
        square + STORE_SLOTS
    } else {
        square - STORE_SLOTS
    }
}

/// The full position: grid plus store banks, at most one piece per slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Board {
    slots: [Option<Piece>; TOTAL_SQUARES as usize],
}

impl Board {
    /// A board with no pieces at all.
    pub fn empty() -> Board {
        Board {
            slots: [None; TOTAL_SQUARES as usize],
        }
    }

    /// The starting position, in the local frame.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for (kind, owner, square) in INITIAL_SETUP {
            board.slots[square as usize] = Some(Piece::new(kind, owner));
        }
        board
    }

    /// Piece at `square`, if any. Out-of-range squares read as empty.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.slots.get(square as usize).copied().flatten()
    }

    #[inline]
    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.slots[square as usize] = piece;
    }

    /// First empty slot in `owner`'s store bank.
    pub fn free_store_slot(&self, owner: Owner) -> Option<Square> {
        let start = store_start(owner);
        (start..start + STORE_SLOTS).find(|&slot| self.piece_at(slot).is_none())
    }

    /// Squares holding a piece of `owner`, over the board and the owner's
    /// own store bank.
    pub fn squares_of(&self, owner: Owner) -> impl Iterator<Item = Square> + '_ {
        let bank = store_start(owner);
        (0..BOARD_SQUARES)
            .chain(bank..bank + STORE_SLOTS)
            .filter(move |&square| {
                self.piece_at(square)
                    .is_some_and(|piece| piece.owner == owner)
            })
    }

    /// Whether `owner`'s Lion stands on the opponent's farthest rank.
    pub fn lion_holds_far_rank(&self, owner: Owner) -> bool {
        (0..BOARD_SQUARES).any(|square| {
            is_far_rank(owner, square)
                && self.piece_at(square) == Some(Piece::new(Kind::Lion, owner))
        })
    }

    /// Total pieces on the board and in both banks. Conserved under the
    /// `Store` capture rule, decreases by one per capture under `Discard`.
    pub fn material_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// True if any store slot holds a Rooster. Never true for a board the
    /// engine produced: captures demote before storing.
    pub fn rooster_in_store(&self) -> bool {
        (MINE_STORE_START..TOTAL_SQUARES)
            .any(|slot| self.piece_at(slot).is_some_and(|p| p.kind == Kind::Rooster))
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}
