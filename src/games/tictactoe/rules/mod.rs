//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board): win and draw detection
//! plus move legality. Nothing here holds state.

mod draw;
mod legal;
mod win;

pub use draw::{is_draw, is_full};
pub use legal::is_legal_move;
pub use win::{Win, WinLine, check_winner, evaluate};
