//! Orchestrator tests with scripted, gated, and failing policies.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use strictly_tictactoe_ai::{
    AiMoveOutcome, Board, Difficulty, EngineEvent, GameEngine, MemoryStorage, MovePolicy,
    Orchestrator, Player, Proposal, RandomPolicy, StatsStore,
};

/// Answers with a fixed proposal once the gate opens.
struct GatedPolicy {
    gate: Arc<Notify>,
    answer: Proposal,
}

#[async_trait]
impl MovePolicy for GatedPolicy {
    async fn propose_move(&self, _board: &Board, _difficulty: Difficulty) -> Proposal {
        self.gate.notified().await;
        self.answer
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Always proposes the same index and counts calls.
struct FixedPolicy {
    answer: Proposal,
    calls: AtomicUsize,
}

#[async_trait]
impl MovePolicy for FixedPolicy {
    async fn propose_move(&self, _board: &Board, _difficulty: Difficulty) -> Proposal {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct PanickingPolicy;

#[async_trait]
impl MovePolicy for PanickingPolicy {
    async fn propose_move(&self, _board: &Board, _difficulty: Difficulty) -> Proposal {
        panic!("policy exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

fn orchestrator(policy: Arc<dyn MovePolicy>) -> Orchestrator {
    let engine = GameEngine::new(StatsStore::new(MemoryStorage::new()), Difficulty::Medium).with_seed(5);
    Orchestrator::new(engine, policy, Duration::ZERO)
}

#[tokio::test]
async fn test_ai_move_applied_after_click() {
    let policy = Arc::new(FixedPolicy {
        answer: Proposal::Move(8),
        calls: AtomicUsize::new(0),
    });
    let mut game = orchestrator(policy.clone());

    assert!(game.click_square(4));
    assert!(game.engine().is_thinking());

    assert_eq!(game.settle().await, Some(AiMoveOutcome::Applied(8)));
    assert!(!game.engine().is_thinking());
    assert_eq!(game.engine().turn(), Player::Human);
    assert_eq!(game.engine().board().to_string(), "----X---O");
    assert_eq!(policy.calls.load(Ordering::SeqCst), 1);
    assert_eq!(game.policy_name(), "fixed");
}

#[tokio::test]
async fn test_occupied_answer_is_substituted() {
    let mut game = orchestrator(Arc::new(FixedPolicy {
        answer: Proposal::Move(4),
        calls: AtomicUsize::new(0),
    }));

    game.click_square(4);
    match game.settle().await {
        Some(AiMoveOutcome::Substituted { proposed, played }) => {
            assert_eq!(proposed, Some(4));
            assert_ne!(played, 4);
        }
        other => panic!("expected substitution, got {:?}", other),
    }
    assert_eq!(game.engine().board().count(Player::Ai), 1);
}

#[tokio::test]
async fn test_reset_before_resolution_discards_it() {
    let gate = Arc::new(Notify::new());
    let mut game = orchestrator(Arc::new(GatedPolicy {
        gate: gate.clone(),
        answer: Proposal::Move(8),
    }));

    game.click_square(0);
    assert!(game.engine().is_thinking());
    game.reset();
    assert!(!game.engine().is_thinking());

    gate.notify_one();
    let event = game.next_event().await.expect("event");
    assert!(matches!(event, EngineEvent::AiResolved(r) if r.generation() == 0));
    assert_eq!(game.handle_event(event), AiMoveOutcome::Discarded);
    assert_eq!(game.engine().board().to_string(), "---------");
    assert_eq!(game.engine().turn(), Player::Human);

    // The next game still works.
    game.click_square(4);
    gate.notify_one();
    assert_eq!(game.settle().await, Some(AiMoveOutcome::Applied(8)));
}

#[tokio::test]
async fn test_panicking_policy_still_clears_indicator() {
    let mut game = orchestrator(Arc::new(PanickingPolicy));
    game.click_square(0);

    match game.settle().await {
        Some(AiMoveOutcome::Substituted { proposed: None, .. }) => {}
        other => panic!("expected random substitution, got {:?}", other),
    }
    assert!(!game.engine().is_thinking());
    assert_eq!(game.engine().turn(), Player::Human);
}

#[tokio::test]
async fn test_think_delay_precedes_policy_call() {
    let policy = Arc::new(FixedPolicy {
        answer: Proposal::Move(8),
        calls: AtomicUsize::new(0),
    });
    let engine = GameEngine::new(StatsStore::new(MemoryStorage::new()), Difficulty::Easy);
    let mut game = Orchestrator::new(engine, policy.clone(), Duration::from_millis(200));

    game.click_square(0);
    assert!(game.try_next_event().is_none());
    assert_eq!(policy.calls.load(Ordering::SeqCst), 0);

    game.settle().await;
    assert_eq!(policy.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_full_game_against_random_policy() {
    let storage = MemoryStorage::new();
    let engine = GameEngine::new(StatsStore::new(storage.clone()), Difficulty::Hard);
    let mut game = Orchestrator::new(engine, Arc::new(RandomPolicy::with_seed(3)), Duration::ZERO);

    while !game.engine().status().is_terminal() {
        let next = game.engine().board().empty_positions()[0].to_index();
        assert!(game.click_square(next));
        game.settle().await;
    }

    let stats = game.engine().stats();
    assert_eq!(stats.played(), 1);
    assert!(stats.is_consistent());
    assert_eq!(StatsStore::new(storage).load(), stats);
    assert!(game.engine().summary().is_some());
}
