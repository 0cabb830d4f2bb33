//! Offline policy choosing uniformly among empty squares.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::{MovePolicy, Proposal, random_legal_move};
use crate::games::tictactoe::{Board, Difficulty};

/// Uniform random legal moves, ignoring difficulty.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomPolicy {
    /// Creates a policy seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Creates a reproducible policy.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovePolicy for RandomPolicy {
    #[instrument(skip(self, board), fields(board = %board))]
    async fn propose_move(&self, board: &Board, _difficulty: Difficulty) -> Proposal {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let proposal = random_legal_move(board, &mut *rng);
        debug!(%proposal, "Random policy proposal");
        proposal
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_random_policy_plays_legal_moves() {
        let policy = RandomPolicy::with_seed(42);
        let board: Board = "XO-XO----".parse().unwrap();
        for _ in 0..20 {
            let index = policy
                .propose_move(&board, Difficulty::Hard)
                .await
                .index()
                .expect("move");
            assert!(board.get_index(index).is_some_and(|s| s.player().is_none()));
        }
    }

    #[tokio::test]
    async fn test_random_policy_full_board() {
        let policy = RandomPolicy::new();
        let board: Board = "XOXXOOOXX".parse().unwrap();
        assert_eq!(
            policy.propose_move(&board, Difficulty::Easy).await,
            Proposal::NoMove
        );
    }
}
