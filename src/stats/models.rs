//! Stats record and storage row types.

use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::games::tictactoe::{GameStatus, Player};
use crate::stats::schema;

/// Game outcome from the human player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Human won the game.
    Win,
    /// AI won the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

impl GameOutcome {
    /// Maps a terminal status to an outcome. `None` while still playing.
    pub fn from_status(status: &GameStatus) -> Option<Self> {
        match status {
            GameStatus::Playing => None,
            GameStatus::Won {
                winner: Player::Human,
                ..
            } => Some(Self::Win),
            GameStatus::Won {
                winner: Player::Ai, ..
            } => Some(Self::Loss),
            GameStatus::Draw => Some(Self::Draw),
        }
    }
}

/// Persisted win/loss/draw counters for the human player.
///
/// Serialized as a flat JSON object:
/// `{"played":0,"wins":0,"losses":0,"draws":0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GameStats {
    played: u32,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl GameStats {
    /// Creates stats from raw counters.
    pub fn new(played: u32, wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            played,
            wins,
            losses,
            draws,
        }
    }

    /// Games completed.
    pub fn played(&self) -> u32 {
        self.played
    }

    /// Games the human won.
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Games the AI won.
    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Games drawn.
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Counts one completed game.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: GameOutcome) {
        self.played = self.played.saturating_add(1);
        match outcome {
            GameOutcome::Win => self.wins = self.wins.saturating_add(1),
            GameOutcome::Loss => self.losses = self.losses.saturating_add(1),
            GameOutcome::Draw => self.draws = self.draws.saturating_add(1),
        }
    }

    /// `played` equals the sum of the three outcome counters.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.played)
            == u64::from(self.wins) + u64::from(self.losses) + u64::from(self.draws)
    }

    /// Win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            (self.wins as f64 / self.played as f64) * 100.0
        }
    }
}

/// Row of the key-value table backing the SQLite storage.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::kv_store)]
pub struct KvEntry {
    key: String,
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::WinLine;

    #[test]
    fn test_record_keeps_counters_consistent() {
        let mut stats = GameStats::default();
        stats.record(GameOutcome::Win);
        stats.record(GameOutcome::Loss);
        stats.record(GameOutcome::Draw);
        stats.record(GameOutcome::Win);
        assert_eq!(stats, GameStats::new(4, 2, 1, 1));
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(GameStats::default().win_rate(), 0.0);
        assert_eq!(GameStats::new(4, 1, 2, 1).win_rate(), 25.0);
    }

    #[test]
    fn test_outcome_from_status() {
        let line = WinLine::ALL[0];
        assert_eq!(GameOutcome::from_status(&GameStatus::Playing), None);
        assert_eq!(
            GameOutcome::from_status(&GameStatus::Won {
                winner: Player::Human,
                line
            }),
            Some(GameOutcome::Win)
        );
        assert_eq!(
            GameOutcome::from_status(&GameStatus::Won {
                winner: Player::Ai,
                line
            }),
            Some(GameOutcome::Loss)
        );
        assert_eq!(
            GameOutcome::from_status(&GameStatus::Draw),
            Some(GameOutcome::Draw)
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&GameStats::new(3, 1, 1, 1)).unwrap();
        assert_eq!(json, r#"{"played":3,"wins":1,"losses":1,"draws":1}"#);
    }
}
