//! Random legal-move fallback shared by all policies and the engine.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::Proposal;
use crate::games::tictactoe::{Board, is_legal_move};

/// Picks a uniformly random empty square, or [`Proposal::NoMove`] on a full
/// board.
pub fn random_legal_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Proposal {
    match board.empty_positions().choose(rng) {
        Some(pos) => {
            debug!(index = pos.to_index(), "Random legal move chosen");
            Proposal::Move(pos.to_index())
        }
        None => Proposal::NoMove,
    }
}

/// Accepts `candidate` if it is a legal index on `board`, otherwise falls
/// back to [`random_legal_move`].
pub fn sanitize<R: Rng + ?Sized>(board: &Board, candidate: Option<i64>, rng: &mut R) -> Proposal {
    match candidate {
        Some(index) if is_legal_move(board, index) => match usize::try_from(index) {
            Ok(index) => Proposal::Move(index),
            Err(_) => random_legal_move(board, rng),
        },
        Some(index) => {
            warn!(index, board = %board, "Illegal move proposed, falling back to random");
            random_legal_move(board, rng)
        }
        None => random_legal_move(board, rng),
    }
}
