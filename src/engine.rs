//! Turn sequencing, terminal detection, and stats recording for one
//! human-vs-AI game.
//!
//! The engine is synchronous. An AI turn is split into
//! [`GameEngine::begin_ai_turn`], which hands out a generation-tagged
//! [`MoveRequest`], and [`GameEngine::resolve_ai_move`], which applies the
//! matching [`MoveResolution`]. Whoever runs the policy in between (see the
//! orchestrator) needs no access to the engine.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::games::tictactoe::{
    Board, Difficulty, GameStatus, Player, Position, Square, WinLine, evaluate, is_full,
    is_legal_move,
};
use crate::policy::{Proposal, random_legal_move};
use crate::stats::{GameOutcome, GameStats, StatsStore};

/// A pending AI move: what the policy should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    generation: u64,
    board: Board,
    difficulty: Difficulty,
}

impl MoveRequest {
    /// Game generation the request belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Board snapshot at request time.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Difficulty at request time.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Pairs this request with the policy's answer.
    pub fn resolve(&self, proposal: Proposal) -> MoveResolution {
        MoveResolution {
            generation: self.generation,
            proposal,
        }
    }
}

/// A policy answer tagged with the generation it was requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResolution {
    generation: u64,
    proposal: Proposal,
}

impl MoveResolution {
    /// Creates a resolution directly.
    pub fn new(generation: u64, proposal: Proposal) -> Self {
        Self {
            generation,
            proposal,
        }
    }

    /// Generation tag.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The policy's answer.
    pub fn proposal(&self) -> Proposal {
        self.proposal
    }
}

/// What [`GameEngine::resolve_ai_move`] did with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMoveOutcome {
    /// The proposed index was legal and played.
    Applied(usize),
    /// The proposal was unusable; a random legal index was played instead.
    Substituted {
        /// What the policy proposed, `None` for [`Proposal::NoMove`].
        proposed: Option<usize>,
        /// Index actually played.
        played: usize,
    },
    /// Nothing to play; the terminal status was re-derived.
    Settled,
    /// Tagged with an older generation; dropped.
    Discarded,
    /// No request is outstanding for this generation.
    Ignored,
}

/// Short text for a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// Headline.
    pub title: &'static str,
    /// Flavour line.
    pub message: &'static str,
}

/// Game state machine for the human (`X`) against the AI (`O`).
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    turn: Player,
    status: GameStatus,
    difficulty: Difficulty,
    generation: u64,
    thinking: bool,
    recorded: bool,
    stats: GameStats,
    store: StatsStore,
    rng: ChaCha20Rng,
}

impl GameEngine {
    /// Creates an engine, loading stats from `store`.
    #[instrument(skip(store), fields(key = store.key()))]
    pub fn new(store: StatsStore, difficulty: Difficulty) -> Self {
        let stats = store.load();
        info!(played = stats.played(), %difficulty, "Creating game engine");
        Self {
            board: Board::new(),
            turn: Player::Human,
            status: GameStatus::Playing,
            difficulty,
            generation: 0,
            thinking: false,
            recorded: false,
            stats,
            store,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Seeds the fallback RNG used when a proposal is unusable.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    // Queries

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winner, if the game was won.
    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    /// Winning line, if the game was won.
    pub fn winning_line(&self) -> Option<WinLine> {
        self.status.line()
    }

    /// Player to move.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Whether an AI request is outstanding.
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Persisted stats as of the last update.
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Difficulty passed to the policy.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Game generation, bumped on every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The stats store backing this engine.
    pub fn store(&self) -> &StatsStore {
        &self.store
    }

    /// One-line status for presenters.
    pub fn status_message(&self) -> &'static str {
        match self.status {
            GameStatus::Won {
                winner: Player::Human,
                ..
            } => "You win!",
            GameStatus::Won {
                winner: Player::Ai, ..
            } => "AI wins!",
            GameStatus::Draw => "It's a draw!",
            GameStatus::Playing if self.thinking => "AI is thinking...",
            GameStatus::Playing => match self.turn {
                Player::Human => "Your turn",
                Player::Ai => "AI's turn",
            },
        }
    }

    /// Game-over text, `None` while playing.
    pub fn summary(&self) -> Option<GameSummary> {
        match self.status {
            GameStatus::Playing => None,
            GameStatus::Won {
                winner: Player::Human,
                ..
            } => Some(GameSummary {
                title: "You Won!",
                message: "Excellent move! You've outsmarted the AI.",
            }),
            GameStatus::Won {
                winner: Player::Ai, ..
            } => Some(GameSummary {
                title: "You Lost!",
                message: "The AI was too strong this time. Better luck next game!",
            }),
            GameStatus::Draw => Some(GameSummary {
                title: "It's a Draw!",
                message: "A hard-fought battle ends in a stalemate.",
            }),
        }
    }

    // Commands

    /// Plays the human's mark at `index`.
    ///
    /// Silently ignored (returns `false`) unless the game is playing, it is
    /// the human's turn, no AI request is outstanding, and the square is
    /// legal.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn click_square(&mut self, index: usize) -> bool {
        if self.status.is_terminal() || self.turn != Player::Human || self.thinking {
            debug!(status = ?self.status, turn = %self.turn, thinking = self.thinking, "Click ignored");
            return false;
        }
        let Some(pos) = Position::from_index(index).filter(|_| is_legal_move(&self.board, index))
        else {
            debug!("Click on illegal square ignored");
            return false;
        };

        self.place(Player::Human, pos);
        true
    }

    /// Starts the AI's turn if one is due and none is outstanding.
    ///
    /// Sets the deciding indicator and returns the request to hand to a
    /// policy.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn begin_ai_turn(&mut self) -> Option<MoveRequest> {
        if self.status.is_terminal() || self.turn != Player::Ai || self.thinking {
            return None;
        }
        self.thinking = true;
        debug!(board = %self.board, "AI turn requested");
        Some(MoveRequest {
            generation: self.generation,
            board: self.board,
            difficulty: self.difficulty,
        })
    }

    /// Applies a policy answer and clears the deciding indicator.
    ///
    /// Stale generations are discarded without touching state. An unusable
    /// proposal is replaced by a random legal move; with no legal move left
    /// the terminal status is re-derived from the board.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn resolve_ai_move(&mut self, resolution: MoveResolution) -> AiMoveOutcome {
        if resolution.generation != self.generation {
            warn!(stale = resolution.generation, "Discarding stale AI resolution");
            return AiMoveOutcome::Discarded;
        }
        if !self.thinking {
            debug!("No outstanding AI request, resolution ignored");
            return AiMoveOutcome::Ignored;
        }
        self.thinking = false;

        if self.status.is_terminal() || self.turn != Player::Ai {
            return AiMoveOutcome::Settled;
        }

        let proposed = resolution.proposal.index();
        let legal = proposed
            .filter(|index| is_legal_move(&self.board, *index))
            .and_then(Position::from_index);
        if let Some(pos) = legal {
            self.place(Player::Ai, pos);
            return AiMoveOutcome::Applied(pos.to_index());
        }

        match random_legal_move(&self.board, &mut self.rng) {
            Proposal::Move(played) => match Position::from_index(played) {
                Some(pos) => {
                    warn!(?proposed, played, "Unusable AI proposal, playing random legal move");
                    self.place(Player::Ai, pos);
                    AiMoveOutcome::Substituted { proposed, played }
                }
                None => AiMoveOutcome::Settled,
            },
            Proposal::NoMove => {
                self.refresh_status();
                AiMoveOutcome::Settled
            }
        }
    }

    /// Starts a fresh game. Any outstanding AI request becomes stale.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Player::Human;
        self.status = GameStatus::Playing;
        self.thinking = false;
        self.recorded = false;
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "Game reset");
    }

    /// Zeroes and persists the stats. Game state is untouched.
    #[instrument(skip(self))]
    pub fn reset_stats(&mut self) {
        self.stats = self.store.reset();
    }

    /// Changes the difficulty used for future AI requests.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(%difficulty, "Difficulty changed");
        self.difficulty = difficulty;
    }

    fn place(&mut self, player: Player, pos: Position) {
        self.board.set(pos, Square::Occupied(player));
        info!(%player, position = %pos, board = %self.board, "Move applied");
        self.refresh_status();
        if !self.status.is_terminal() {
            self.turn = player.opponent();
        }
    }

    /// Re-derives the status from the board and records a newly finished
    /// game.
    fn refresh_status(&mut self) {
        self.status = match evaluate(&self.board) {
            Some(win) => GameStatus::Won {
                winner: win.winner(),
                line: win.line(),
            },
            None if is_full(&self.board) => GameStatus::Draw,
            None => GameStatus::Playing,
        };
        if let Some(outcome) = GameOutcome::from_status(&self.status) {
            self.record_result(outcome);
        }
    }

    fn record_result(&mut self, outcome: GameOutcome) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        self.stats.record(outcome);
        info!(?outcome, played = self.stats.played(), "Game over");
        if let Err(e) = self.store.save(&self.stats) {
            warn!(error = %e, "Failed to persist stats");
        }
    }
}
