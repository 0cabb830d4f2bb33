//! Game engine scenarios: turn order, terminal states, stats recording,
//! and generation-tagged AI resolutions.

use strictly_tictactoe_ai::{
    AiMoveOutcome, Difficulty, GameEngine, GameStats, GameStatus, KeyValueStorage, MemoryStorage,
    MoveResolution, Player, Proposal, Square, StatsError, StatsStore,
};

fn engine_with(storage: &MemoryStorage) -> GameEngine {
    GameEngine::new(StatsStore::new(storage.clone()), Difficulty::Medium).with_seed(11)
}

fn ai_plays(engine: &mut GameEngine, proposal: Proposal) -> AiMoveOutcome {
    let request = engine.begin_ai_turn().expect("AI turn should be due");
    engine.resolve_ai_move(request.resolve(proposal))
}

fn human_plays(engine: &mut GameEngine, index: usize) {
    assert!(engine.click_square(index), "click on {} rejected", index);
}

#[derive(Debug)]
struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StatsError> {
        Err(StatsError::new("disk unavailable"))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StatsError> {
        Err(StatsError::new("disk unavailable"))
    }
}

#[test]
fn test_initial_state() {
    let engine = engine_with(&MemoryStorage::new());
    assert_eq!(engine.board().to_string(), "---------");
    assert_eq!(engine.status(), GameStatus::Playing);
    assert_eq!(engine.turn(), Player::Human);
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.winning_line(), None);
    assert!(!engine.is_thinking());
    assert_eq!(engine.difficulty(), Difficulty::Medium);
    assert_eq!(engine.status_message(), "Your turn");
    assert_eq!(engine.summary(), None);
}

#[test]
fn test_human_completes_top_row() {
    let storage = MemoryStorage::new();
    let mut engine = engine_with(&storage);

    human_plays(&mut engine, 0);
    assert_eq!(ai_plays(&mut engine, Proposal::Move(3)), AiMoveOutcome::Applied(3));
    human_plays(&mut engine, 1);
    assert_eq!(ai_plays(&mut engine, Proposal::Move(4)), AiMoveOutcome::Applied(4));
    assert_eq!(engine.board().to_string(), "XX-OO----");

    human_plays(&mut engine, 2);
    assert_eq!(engine.winner(), Some(Player::Human));
    assert_eq!(engine.winning_line().map(|l| l.indices()), Some([0, 1, 2]));
    assert_eq!(engine.status_message(), "You win!");
    assert_eq!(engine.summary().map(|s| s.title), Some("You Won!"));
    assert_eq!(engine.stats(), GameStats::new(1, 1, 0, 0));

    // Persisted, not just in memory.
    assert_eq!(StatsStore::new(storage).load(), GameStats::new(1, 1, 0, 0));
}

#[test]
fn test_ai_completes_middle_row() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 0);
    ai_plays(&mut engine, Proposal::Move(3));
    human_plays(&mut engine, 1);
    ai_plays(&mut engine, Proposal::Move(4));
    human_plays(&mut engine, 8);
    assert_eq!(ai_plays(&mut engine, Proposal::Move(5)), AiMoveOutcome::Applied(5));

    assert_eq!(engine.winner(), Some(Player::Ai));
    assert_eq!(engine.winning_line().map(|l| l.indices()), Some([3, 4, 5]));
    assert_eq!(engine.status_message(), "AI wins!");
    assert_eq!(engine.summary().map(|s| s.title), Some("You Lost!"));
    assert_eq!(engine.stats(), GameStats::new(1, 0, 1, 0));
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut engine = engine_with(&MemoryStorage::new());
    for (human, ai) in [(0, 1), (2, 4), (3, 5), (7, 6)] {
        human_plays(&mut engine, human);
        ai_plays(&mut engine, Proposal::Move(ai));
    }
    human_plays(&mut engine, 8);

    assert_eq!(engine.board().to_string(), "XOXXOOOXX");
    assert_eq!(engine.status(), GameStatus::Draw);
    assert_eq!(engine.status_message(), "It's a draw!");
    assert_eq!(engine.stats(), GameStats::new(1, 0, 0, 1));
    assert_eq!(engine.begin_ai_turn(), None);
}

#[test]
fn test_turns_alternate() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 4);
    assert_eq!(engine.turn(), Player::Ai);
    assert_eq!(engine.status_message(), "AI's turn");

    // Human cannot move twice.
    assert!(!engine.click_square(0));

    ai_plays(&mut engine, Proposal::Move(0));
    assert_eq!(engine.turn(), Player::Human);
    assert!(engine.board().has_valid_turn_balance());
}

#[test]
fn test_input_rejected_while_thinking() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 4);
    let request = engine.begin_ai_turn().expect("AI turn");
    assert!(engine.is_thinking());
    assert_eq!(engine.status_message(), "AI is thinking...");

    // Single flight.
    assert_eq!(engine.begin_ai_turn(), None);
    assert!(!engine.click_square(0));

    engine.resolve_ai_move(request.resolve(Proposal::Move(0)));
    assert!(!engine.is_thinking());
    assert!(engine.click_square(8));
}

#[test]
fn test_illegal_clicks_are_ignored() {
    let mut engine = engine_with(&MemoryStorage::new());
    assert!(!engine.click_square(9));
    assert!(!engine.click_square(usize::MAX));
    human_plays(&mut engine, 4);
    ai_plays(&mut engine, Proposal::Move(0));
    assert!(!engine.click_square(4));
    assert!(!engine.click_square(0));
    assert_eq!(engine.board().count(Player::Human), 1);
}

#[test]
fn test_occupied_proposal_is_replaced() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 4);

    match ai_plays(&mut engine, Proposal::Move(4)) {
        AiMoveOutcome::Substituted { proposed, played } => {
            assert_eq!(proposed, Some(4));
            assert_ne!(played, 4);
            assert_eq!(
                engine.board().get_index(played),
                Some(Square::Occupied(Player::Ai))
            );
        }
        other => panic!("expected substitution, got {:?}", other),
    }
    assert_eq!(engine.board().get_index(4), Some(Square::Occupied(Player::Human)));
    assert_eq!(engine.board().count(Player::Ai), 1);
    assert_eq!(engine.turn(), Player::Human);
}

#[test]
fn test_out_of_range_and_missing_proposals_are_replaced() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 0);
    assert!(matches!(
        ai_plays(&mut engine, Proposal::Move(42)),
        AiMoveOutcome::Substituted { proposed: Some(42), .. }
    ));

    let next = engine.board().empty_positions()[0].to_index();
    human_plays(&mut engine, next);
    assert!(matches!(
        ai_plays(&mut engine, Proposal::NoMove),
        AiMoveOutcome::Substituted { proposed: None, .. }
    ));
    assert_eq!(engine.board().count(Player::Ai), 2);
}

#[test]
fn test_reset_discards_late_resolution() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 0);
    let request = engine.begin_ai_turn().expect("AI turn");

    engine.reset();
    assert_eq!(engine.generation(), 1);
    assert!(!engine.is_thinking());
    assert_eq!(engine.turn(), Player::Human);

    let outcome = engine.resolve_ai_move(request.resolve(Proposal::Move(4)));
    assert_eq!(outcome, AiMoveOutcome::Discarded);
    assert_eq!(engine.board().to_string(), "---------");
    assert_eq!(engine.turn(), Player::Human);
}

#[test]
fn test_stale_resolution_leaves_new_request_outstanding() {
    let mut engine = engine_with(&MemoryStorage::new());
    human_plays(&mut engine, 0);
    let stale = engine.begin_ai_turn().expect("AI turn");
    engine.reset();

    human_plays(&mut engine, 8);
    let fresh = engine.begin_ai_turn().expect("AI turn");
    assert_eq!(fresh.generation(), 1);

    assert_eq!(
        engine.resolve_ai_move(stale.resolve(Proposal::Move(4))),
        AiMoveOutcome::Discarded
    );
    assert!(engine.is_thinking());
    assert_eq!(
        engine.resolve_ai_move(fresh.resolve(Proposal::Move(4))),
        AiMoveOutcome::Applied(4)
    );
}

#[test]
fn test_unrequested_resolution_is_ignored() {
    let mut engine = engine_with(&MemoryStorage::new());
    let outcome = engine.resolve_ai_move(MoveResolution::new(0, Proposal::Move(4)));
    assert_eq!(outcome, AiMoveOutcome::Ignored);
    assert_eq!(engine.board().to_string(), "---------");
}

#[test]
fn test_result_recorded_once_per_game() {
    let storage = MemoryStorage::new();
    let mut engine = engine_with(&storage);
    let win = |engine: &mut GameEngine| {
        human_plays(engine, 0);
        ai_plays(engine, Proposal::Move(3));
        human_plays(engine, 1);
        ai_plays(engine, Proposal::Move(4));
        human_plays(engine, 2);
    };

    win(&mut engine);
    assert!(!engine.click_square(5));
    assert_eq!(engine.begin_ai_turn(), None);
    assert_eq!(
        engine.resolve_ai_move(MoveResolution::new(0, Proposal::Move(5))),
        AiMoveOutcome::Ignored
    );
    assert_eq!(engine.stats(), GameStats::new(1, 1, 0, 0));

    engine.reset();
    win(&mut engine);
    assert_eq!(engine.stats(), GameStats::new(2, 2, 0, 0));
    assert!(engine.stats().is_consistent());
}

#[test]
fn test_reset_stats_persists_zero() {
    let storage = MemoryStorage::new();
    StatsStore::new(storage.clone())
        .save(&GameStats::new(5, 2, 2, 1))
        .unwrap();

    let mut engine = engine_with(&storage);
    assert_eq!(engine.stats(), GameStats::new(5, 2, 2, 1));
    human_plays(&mut engine, 4);

    engine.reset_stats();
    assert_eq!(engine.stats(), GameStats::default());
    assert_eq!(StatsStore::new(storage).load(), GameStats::default());
    // Game state is untouched.
    assert_eq!(engine.turn(), Player::Ai);
}

#[test]
fn test_storage_failure_keeps_in_memory_stats() {
    let mut engine = GameEngine::new(StatsStore::new(FailingStorage), Difficulty::Easy);
    assert_eq!(engine.stats(), GameStats::default());

    human_plays(&mut engine, 0);
    ai_plays(&mut engine, Proposal::Move(3));
    human_plays(&mut engine, 1);
    ai_plays(&mut engine, Proposal::Move(4));
    human_plays(&mut engine, 2);
    assert_eq!(engine.stats(), GameStats::new(1, 1, 0, 0));

    engine.reset_stats();
    assert_eq!(engine.stats(), GameStats::default());
}

#[test]
fn test_difficulty_flows_into_requests() {
    let mut engine = engine_with(&MemoryStorage::new());
    engine.set_difficulty(Difficulty::Hard);
    human_plays(&mut engine, 0);
    let request = engine.begin_ai_turn().expect("AI turn");
    assert_eq!(request.difficulty(), Difficulty::Hard);
    assert_eq!(request.board().to_string(), "X--------");
}
