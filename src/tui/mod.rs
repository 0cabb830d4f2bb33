//! Terminal UI for Strictly Tic-Tac-Toe AI.

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use strictly_tictactoe_ai::Orchestrator;
use tracing::{error, info, instrument};

use app::App;
use input::action_for;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the interactive game until the user quits.
pub async fn run(orchestrator: Orchestrator) -> Result<()> {
    info!("Starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, App::new(orchestrator)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action_for(key) {
                    app.handle_action(action);
                }
            }
        } else {
            // Let spawned AI tasks make progress between polls.
            tokio::task::yield_now().await;
        }

        if app.should_quit() {
            info!("Leaving game loop");
            return Ok(());
        }
    }
}
