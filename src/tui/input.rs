//! Keyboard mapping for the terminal UI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use strictly_tictactoe_ai::Position;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor one square.
    MoveCursor(KeyCode),
    /// Click the square under the cursor.
    Select,
    /// Click a specific square (digit keys 1-9).
    Click(Position),
    /// Cycle Easy -> Medium -> Hard.
    CycleDifficulty,
    /// Start a new game.
    ResetGame,
    /// Zero the stats.
    ResetStats,
    /// Leave the app.
    Quit,
}

/// Maps a key event to an action. Releases and unbound keys map to `None`.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            Some(Action::MoveCursor(key.code))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .and_then(|digit| Position::from_index(digit as usize - 1))
            .map(Action::Click),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::CycleDifficulty),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::ResetGame),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::ResetStats),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Moves cursor based on arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Up => row.checked_sub(1).map(|row| (row, col)),
        KeyCode::Down => Some((row + 1, col)),
        KeyCode::Left => col.checked_sub(1).map(|col| (row, col)),
        KeyCode::Right => Some((row, col + 1)),
        _ => None,
    };
    target
        .and_then(|(row, col)| Position::from_row_col(row, col))
        .unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Up), Position::TopLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Left), Position::TopLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Right), Position::TopCenter);
        assert_eq!(move_cursor(Position::Center, KeyCode::Down), Position::BottomCenter);
        assert_eq!(move_cursor(Position::BottomRight, KeyCode::Down), Position::BottomRight);
        assert_eq!(move_cursor(Position::MiddleRight, KeyCode::Right), Position::MiddleRight);
    }

    #[test]
    fn test_digit_keys_click_squares() {
        let key = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        assert_eq!(action_for(key), Some(Action::Click(Position::TopLeft)));
        let key = KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE);
        assert_eq!(action_for(key), Some(Action::Click(Position::BottomRight)));
        let key = KeyEvent::new(KeyCode::Char('0'), KeyModifiers::NONE);
        assert_eq!(action_for(key), None);
    }
}
