//! Move policy backed by a remote language model.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{MovePolicy, Proposal, USER_MESSAGE, parse_move, sanitize, system_instruction, temperature};
use crate::games::tictactoe::{Board, Difficulty};
use crate::llm_client::{LlmClient, LlmConfig, REQUEST_TIMEOUT, TextGenerator};

/// Asks a language model for the AI's move.
///
/// Any transport, schema, legality, or timeout failure degrades to a uniform
/// random legal move. A full board answers [`Proposal::NoMove`] without a
/// request.
pub struct LlmPolicy<G = LlmClient> {
    generator: G,
    name: String,
    timeout: Duration,
    rng: Mutex<ChaCha20Rng>,
}

impl LlmPolicy<LlmClient> {
    /// Creates a policy talking to the configured provider.
    #[instrument(skip(config), fields(provider = ?config.provider(), model = %config.model()))]
    pub fn from_config(config: LlmConfig) -> Self {
        let name = format!("{}/{}", config.provider(), config.model());
        info!(%name, "Creating LLM move policy");
        Self::new(LlmClient::new(config), name)
    }
}

impl<G: TextGenerator> LlmPolicy<G> {
    /// Creates a policy over any text generator.
    pub fn new(generator: G, name: impl Into<String>) -> Self {
        Self {
            generator,
            name: name.into(),
            timeout: REQUEST_TIMEOUT,
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Caps how long one model call may take before falling back.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Seeds the fallback RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha20Rng::seed_from_u64(seed));
        self
    }

    /// The underlying generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl<G> std::fmt::Debug for LlmPolicy<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmPolicy").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<G: TextGenerator> MovePolicy for LlmPolicy<G> {
    #[instrument(skip(self, board), fields(policy = %self.name, board = %board))]
    async fn propose_move(&self, board: &Board, difficulty: Difficulty) -> Proposal {
        if board.empty_positions().is_empty() {
            debug!("Board full, no request sent");
            return Proposal::NoMove;
        }

        let system = system_instruction(difficulty, board);
        let request = self
            .generator
            .generate(&system, USER_MESSAGE, temperature(difficulty));
        let candidate = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => {
                warn!(timeout = ?self.timeout, "Model request timed out, falling back to random");
                None
            }
            Ok(Ok(text)) => match parse_move(&text) {
                Ok(index) => Some(index),
                Err(e) => {
                    warn!(error = %e, "Unparseable model response, falling back to random");
                    None
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Model request failed, falling back to random");
                None
            }
        };

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let proposal = sanitize(board, candidate, &mut *rng);
        info!(?candidate, %proposal, "LLM policy proposal");
        proposal
    }

    fn name(&self) -> &str {
        &self.name
    }
}
