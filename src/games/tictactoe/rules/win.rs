//! Win detection logic for tic-tac-toe.

use super::super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the eight winning triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinLine([Position; 3]);

impl WinLine {
    /// All lines in scan order: rows, columns, then diagonals.
    pub const ALL: [WinLine; 8] = [
        // Rows
        WinLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
        WinLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
        WinLine([Position::BottomLeft, Position::BottomCenter, Position::BottomRight]),
        // Columns
        WinLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
        WinLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
        WinLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
        // Diagonals
        WinLine([Position::TopLeft, Position::Center, Position::BottomRight]),
        WinLine([Position::TopRight, Position::Center, Position::BottomLeft]),
    ];

    /// Positions making up this line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// Board indices making up this line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Whether `pos` lies on this line.
    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }
}

/// A completed line and its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win {
    winner: Player,
    line: WinLine,
}

impl Win {
    /// The player owning the completed line.
    pub fn winner(&self) -> Player {
        self.winner
    }

    /// The completed line.
    pub fn line(&self) -> WinLine {
        self.line
    }
}

/// Scans the eight lines in order and returns the first one whose three
/// squares are occupied by the same player.
#[instrument(skip(board), fields(board = %board))]
pub fn evaluate(board: &Board) -> Option<Win> {
    WinLine::ALL.into_iter().find_map(|line| {
        let [a, b, c] = line.positions();
        match board.get(a) {
            Square::Occupied(player) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
                Some(Win { winner: player, line })
            }
            _ => None,
        }
    })
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player has three in a row,
/// `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    evaluate(board).map(|win| win.winner())
}
