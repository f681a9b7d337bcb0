//! Route lookup and the geometric rule each table row derives from.
//!
//! The static tables in [`crate::constants`] are authoritative at runtime.
//! [`generate_routes`] rebuilds a row from the kind's step vectors; the test
//! suite diffs the two so a typo in either one fails loudly.

use crate::board::mirror;
use crate::constants::route_table;
use crate::types::{Kind, Owner, Square};

/// One-step offsets per kind as `(dcol, drow)`, in the `Mine` frame where
/// forward is `+row`.
fn steps(kind: Kind) -> &'static [(i8, i8)] {
    match kind {
        Kind::Chick => &[(0, 1)],
        Kind::Rooster => &[(0, 1), (0, -1), (-1, 0), (1, 0), (-1, 1), (1, 1)],
        Kind::Lion => &[
            (0, 1),
            (0, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (1, 1),
            (-1, -1),
            (1, -1),
        ],
        Kind::Elephant => &[(-1, 1), (1, 1), (-1, -1), (1, -1)],
        Kind::Giraffe => &[(0, 1), (0, -1), (-1, 0), (1, 0)],
    }
}

/// Rebuild the reachable set for `kind` at a board square from its step
/// vectors, sorted ascending. Mirrors the static table row for the same
/// arguments.
pub fn generate_routes(kind: Kind, square: Square) -> Vec<Square> {
    let col = (square % 3) as i8;
    let row = (square / 3) as i8;
    let mut out: Vec<Square> = steps(kind)
        .iter()
        .filter_map(|&(dcol, drow)| {
            let (c, r) = (col + dcol, row + drow);
            if (0..3).contains(&c) && (0..4).contains(&r) {
                Some((r * 3 + c) as Square)
            } else {
                None
            }
        })
        .collect();
    out.sort_unstable();
    out
}

/// Destinations reachable in one step by a piece of `kind` and `owner`
/// standing on a board square, ignoring occupancy.
///
/// Tables are stored in the `Mine` frame; an `Enemy` piece reads the row for
/// the mirrored square and mirrors each destination back. For the symmetric
/// kinds the two reads agree, for Chick and Rooster this flips "forward".
pub fn reachable(kind: Kind, owner: Owner, square: Square) -> Vec<Square> {
    match owner {
        Owner::Mine => route_table(kind, square).to_vec(),
        Owner::Enemy => route_table(kind, mirror(square))
            .iter()
            .map(|&dest| mirror(dest))
            .collect(),
    }
}
