//! Application state and logic.

use strictly_tictactoe_ai::{Orchestrator, Position};
use tracing::{debug, info};

use super::input::{Action, move_cursor};

/// Main application state.
pub struct App {
    orchestrator: Orchestrator,
    cursor: Position,
    should_quit: bool,
}

impl App {
    /// Creates a new application.
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            cursor: Position::Center,
            should_quit: false,
        }
    }

    /// Game driver.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Square under the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies a keyboard action.
    pub fn handle_action(&mut self, action: Action) {
        debug!(?action, "Handling action");
        match action {
            Action::MoveCursor(key) => self.cursor = move_cursor(self.cursor, key),
            Action::Select => {
                self.orchestrator.click_square(self.cursor.to_index());
            }
            Action::Click(pos) => {
                self.cursor = pos;
                self.orchestrator.click_square(pos.to_index());
            }
            Action::CycleDifficulty => {
                let next = self.orchestrator.engine().difficulty().next();
                self.orchestrator.set_difficulty(next);
            }
            Action::ResetGame => self.orchestrator.reset(),
            Action::ResetStats => self.orchestrator.reset_stats(),
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
        }
    }

    /// Feeds every queued AI resolution to the engine.
    pub fn drain_events(&mut self) {
        while let Some(event) = self.orchestrator.try_next_event() {
            self.orchestrator.handle_event(event);
        }
    }
}
