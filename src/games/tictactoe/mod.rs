//! Tic-tac-toe board, positions, and rules.

mod position;
mod rules;
mod types;

pub use position::Position;
pub use rules::{Win, WinLine, check_winner, evaluate, is_draw, is_full, is_legal_move};
pub use types::{Board, BoardParseError, Difficulty, GameStatus, Player, Square};
