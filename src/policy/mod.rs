//! Move policies: the capability that chooses the AI's move.
//!
//! The engine treats every policy as unreliable. A policy answers with a
//! board index or [`Proposal::NoMove`], and the engine re-checks legality
//! before applying anything.

mod fallback;
mod llm;
mod prompt;
mod random;

pub use fallback::{random_legal_move, sanitize};
pub use llm::LlmPolicy;
pub use prompt::{USER_MESSAGE, parse_move, system_instruction, temperature};
pub use random::RandomPolicy;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::games::tictactoe::{Board, Difficulty};

/// A policy's answer for one AI turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proposal {
    /// Play at this board index (0-8).
    Move(usize),
    /// No move is available or none could be produced.
    NoMove,
}

impl Proposal {
    /// The proposed index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Proposal::Move(index) => Some(index),
            Proposal::NoMove => None,
        }
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proposal::Move(index) => write!(f, "move {}", index),
            Proposal::NoMove => write!(f, "no move"),
        }
    }
}

/// Asynchronously proposes the AI's next move.
///
/// Implementations should return a legal index, or [`Proposal::NoMove`] when
/// the board is full. Failures are never surfaced as errors.
#[async_trait]
pub trait MovePolicy: Send + Sync {
    /// Proposes a move for the AI (`O`) on `board`.
    async fn propose_move(&self, board: &Board, difficulty: Difficulty) -> Proposal;

    /// Short name for logs and the status panel.
    fn name(&self) -> &str;
}
