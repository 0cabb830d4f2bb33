//! Async driver around the synchronous [`GameEngine`].

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::engine::{AiMoveOutcome, GameEngine, MoveRequest, MoveResolution};
use crate::games::tictactoe::Difficulty;
use crate::policy::{MovePolicy, Proposal};

/// Messages sent from spawned policy tasks back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A policy answered (or failed) for the tagged request.
    AiResolved(MoveResolution),
}

/// Runs AI turns as background tasks and feeds their answers to the engine.
///
/// Commands must be issued from inside a tokio runtime: whenever a command
/// leaves the AI to move, a task is spawned that waits out the think delay,
/// asks the policy, and sends the tagged resolution over the event channel.
pub struct Orchestrator {
    engine: GameEngine,
    policy: Arc<dyn MovePolicy>,
    think_delay: Duration,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl Orchestrator {
    /// Creates an orchestrator.
    #[instrument(skip(engine, policy), fields(policy = policy.name()))]
    pub fn new(engine: GameEngine, policy: Arc<dyn MovePolicy>, think_delay: Duration) -> Self {
        info!("Creating orchestrator");
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            policy,
            think_delay,
            event_tx,
            event_rx,
        }
    }

    /// The engine state.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Name of the policy choosing AI moves.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Forwards a click; starts the AI turn if the click handed it over.
    pub fn click_square(&mut self, index: usize) -> bool {
        let applied = self.engine.click_square(index);
        self.drive();
        applied
    }

    /// Starts a new game.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.drive();
    }

    /// Zeroes persisted stats.
    pub fn reset_stats(&mut self) {
        self.engine.reset_stats();
    }

    /// Changes the difficulty for future requests.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.engine.set_difficulty(difficulty);
    }

    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    /// Returns an event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Applies an event to the engine.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: EngineEvent) -> AiMoveOutcome {
        match event {
            EngineEvent::AiResolved(resolution) => {
                let outcome = self.engine.resolve_ai_move(resolution);
                debug!(?outcome, "AI resolution handled");
                self.drive();
                outcome
            }
        }
    }

    /// Processes events until no AI request is outstanding. Returns the
    /// outcome of the last event handled.
    pub async fn settle(&mut self) -> Option<AiMoveOutcome> {
        let mut last = None;
        while self.engine.is_thinking() {
            match self.next_event().await {
                Some(event) => last = Some(self.handle_event(event)),
                None => break,
            }
        }
        last
    }

    /// Issues an AI request if the engine has one due.
    fn drive(&mut self) {
        if let Some(request) = self.engine.begin_ai_turn() {
            self.spawn_request(request);
        }
    }

    #[instrument(skip(self), fields(generation = request.generation()))]
    fn spawn_request(&self, request: MoveRequest) {
        let policy = Arc::clone(&self.policy);
        let event_tx = self.event_tx.clone();
        let think_delay = self.think_delay;

        debug!(policy = policy.name(), "Spawning AI request");
        tokio::spawn(async move {
            if !think_delay.is_zero() {
                tokio::time::sleep(think_delay).await;
            }

            let board = *request.board();
            let difficulty = request.difficulty();
            let proposal = match tokio::spawn(async move {
                policy.propose_move(&board, difficulty).await
            })
            .await
            {
                Ok(proposal) => proposal,
                Err(e) => {
                    warn!(error = %e, "Policy task failed, resolving with no move");
                    Proposal::NoMove
                }
            };

            if event_tx
                .send(EngineEvent::AiResolved(request.resolve(proposal)))
                .is_err()
            {
                debug!("Orchestrator dropped before AI resolution arrived");
            }
        });
    }
}
