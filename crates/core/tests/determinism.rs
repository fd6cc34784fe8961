use burrow_core::{Direction, DungeonSettings, Game, PlayerAction, StartingStats};

fn small() -> DungeonSettings {
    DungeonSettings { root_width: 10, root_height: 12, child_width: 16, child_height: 20 }
}

fn scripted_actions() -> Vec<PlayerAction> {
    let pattern = [
        PlayerAction::Move(Direction::East),
        PlayerAction::Move(Direction::East),
        PlayerAction::Move(Direction::South),
        PlayerAction::Wait,
        PlayerAction::Move(Direction::North),
        PlayerAction::Move(Direction::West),
    ];
    pattern.iter().copied().cycle().take(60).collect()
}

fn run_trace(seed: u64) -> (u64, Vec<String>) {
    let stats = StartingStats::default();
    let mut game = Game::with_settings(seed, 4, "tester", &stats, small());
    for action in scripted_actions() {
        if game.advance(action).outcome.is_some() {
            break;
        }
    }
    let trace = game.log().iter().map(|event| format!("{event:?}")).collect();
    (game.snapshot_hash(), trace)
}

#[test]
fn test_determinism_identical_seeds_produce_same_hash() {
    let stats = StartingStats::default();
    let left = Game::with_settings(12345, 5, "left", &stats, small());
    let right = Game::with_settings(12345, 5, "right", &stats, small());
    assert_eq!(left.snapshot_hash(), right.snapshot_hash(), "player name never feeds the hash");
}

#[test]
fn test_determinism_different_seeds_produce_different_hashes() {
    let stats = StartingStats::default();
    let left = Game::with_settings(123, 5, "tester", &stats, small());
    let right = Game::with_settings(456, 5, "tester", &stats, small());
    assert_ne!(left.snapshot_hash(), right.snapshot_hash());
}

#[test]
fn test_deterministic_smoke_fixed_seed_stable_log_sequence() {
    let (left_hash, left_trace) = run_trace(777);
    let (right_hash, right_trace) = run_trace(777);
    assert_eq!(left_hash, right_hash);
    assert_eq!(left_trace, right_trace);
}

#[test]
fn test_difficulty_changes_the_dungeon() {
    let stats = StartingStats::default();
    let easy = Game::with_settings(99, 1, "tester", &stats, small());
    let hard = Game::with_settings(99, 10, "tester", &stats, small());
    assert_ne!(easy.tree().fingerprint(), hard.tree().fingerprint());
    assert!(easy.tree().map_count() <= 7 + 1);
}

#[test]
fn test_stats_json_round_trip_builds_the_same_dungeon() {
    let stats = StartingStats::default();
    let text = serde_json::to_string(&stats).expect("stats serialize");
    let parsed: StartingStats = serde_json::from_str(&text).expect("stats parse");
    let a = Game::with_settings(5, 3, "tester", &stats, small());
    let b = Game::with_settings(5, 3, "tester", &parsed, small());
    assert_eq!(a.snapshot_hash(), b.snapshot_hash());
}
