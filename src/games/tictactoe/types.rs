//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::position::Position;
use super::rules::WinLine;

/// Participant in the game.
///
/// The human always plays `X` and the AI always plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The human player (moves first, marks with `X`).
    Human,
    /// The AI opponent (marks with `O`).
    Ai,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }

    /// Returns the board mark for this player.
    pub fn mark(self) -> char {
        match self {
            Player::Human => 'X',
            Player::Ai => 'O',
        }
    }

    /// Parses a board mark back into a player.
    pub fn from_mark(mark: char) -> Option<Self> {
        match mark {
            'X' | 'x' => Some(Player::Human),
            'O' | 'o' => Some(Player::Ai),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Human => write!(f, "Human"),
            Player::Ai => write!(f, "AI"),
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the mark shown for this square, `-` when empty.
    pub fn mark(self) -> char {
        match self {
            Square::Empty => '-',
            Square::Occupied(player) => player.mark(),
        }
    }

    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Gets the square at a raw index, `None` when out of range.
    pub fn get_index(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns the empty positions in index order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::valid_moves(self)
    }

    /// Counts the marks placed by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Whether the mark counts are consistent with strict alternation,
    /// Human moving first.
    pub fn has_valid_turn_balance(&self) -> bool {
        let human = self.count(Player::Human);
        let ai = self.count(Player::Ai);
        human == ai || human == ai + 1
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact nine-character form: `X`, `O`, and `-` for empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in &self.squares {
            write!(f, "{}", square.mark())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses the compact form. `-`, `.`, and space all mean empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(BoardParseError::new(format!(
                "expected 9 squares, found {}",
                chars.len()
            )));
        }

        let mut board = Board::new();
        for (index, c) in chars.into_iter().enumerate() {
            let square = match c {
                '-' | '.' | ' ' => Square::Empty,
                other => Square::Occupied(Player::from_mark(other).ok_or_else(|| {
                    BoardParseError::new(format!("invalid mark '{}' at {}", other, index))
                })?),
            };
            board.squares[index] = square;
        }
        Ok(board)
    }
}

/// Error parsing the compact board form.
#[derive(Debug, Clone, Display, Error)]
#[display("Board parse error: {}", message)]
pub struct BoardParseError {
    /// Error message.
    pub message: String,
}

impl BoardParseError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    Playing,
    /// Game ended with three in a row.
    Won {
        /// The player who completed the line.
        winner: Player,
        /// The completed line.
        line: WinLine,
    },
    /// Board filled with no winner.
    Draw,
}

impl GameStatus {
    /// Whether the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    /// Returns the winner if the game was won.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// Returns the winning line if the game was won.
    pub fn line(&self) -> Option<WinLine> {
        match self {
            GameStatus::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Instruction level sent to the move policy.
///
/// The engine never interprets this; it is passed through to whatever
/// policy chooses the AI's moves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    /// Random valid moves.
    Easy,
    /// Win or block when possible, otherwise center then corners.
    #[default]
    Medium,
    /// Optimal play.
    Hard,
}

impl Difficulty {
    /// Cycles Easy → Medium → Hard → Easy.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}
