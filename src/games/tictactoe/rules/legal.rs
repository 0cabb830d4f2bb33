//! Move legality.

use super::super::{Board, Position};

/// True iff `index` names a square on the board and that square is empty.
///
/// Accepts any integer type; negative and out-of-range values are simply
/// illegal, never a panic.
pub fn is_legal_move<I>(board: &Board, index: I) -> bool
where
    I: TryInto<usize>,
{
    index
        .try_into()
        .ok()
        .and_then(Position::from_index)
        .is_some_and(|pos| board.is_empty(pos))
}
