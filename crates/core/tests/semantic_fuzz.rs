use burrow_core::{
    Cell, Direction, DungeonSettings, Game, HallwayRef, Occupant, PlayerAction, StartingStats,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

fn small() -> DungeonSettings {
    DungeonSettings { root_width: 10, root_height: 12, child_width: 14, child_height: 18 }
}

fn random_action(rng: &mut ChaCha8Rng) -> PlayerAction {
    match rng.next_u64() % 5 {
        4 => PlayerAction::Wait,
        roll => PlayerAction::Move(Direction::ALL[roll as usize]),
    }
}

fn check_invariants(game: &Game) -> Result<(), String> {
    let tree = game.tree();
    let player = tree.player();
    let map = tree.active_map();

    if !(0.0..=player.max_health).contains(&player.health) {
        return Err(format!("health {} out of bounds", player.health));
    }
    if tree.outcome().is_none() && map.cell(player.pos) != Some(&Cell::Actor(Occupant::Player)) {
        return Err(format!("player record at {:?} disagrees with the grid", player.pos));
    }
    for id in tree.preorder() {
        let map = tree.map(id).ok_or("preorder named a missing map")?;
        for &pos in map.child_hallways().iter().chain(map.parent_hallway().iter()) {
            let here = HallwayRef { map: id, pos };
            let paired = tree.hallway(here).and_then(|h| h.paired).ok_or("unpaired hallway")?;
            if tree.hallway(paired).and_then(|h| h.paired) != Some(here) {
                return Err(format!("pairing at {here:?} is not mutual"));
            }
        }
        for (enemy_id, enemy) in map.enemies() {
            if map.cell(enemy.pos) != Some(&Cell::Actor(Occupant::Enemy(enemy_id))) {
                return Err(format!("enemy {enemy_id:?} lost its tile"));
            }
        }
    }
    Ok(())
}

fn run_fuzz_simulation(map_seed: u64, action_seed: u64, turns: u32) -> Result<(), String> {
    let stats = StartingStats::default();
    let mut game = Game::with_settings(map_seed, 6, "fuzzer", &stats, small());
    let mut rng = ChaCha8Rng::seed_from_u64(action_seed);

    check_invariants(&game)?;
    for _ in 0..turns {
        let result = game.advance(random_action(&mut rng));
        check_invariants(&game)?;
        if result.outcome.is_some() {
            break;
        }
    }
    Ok(())
}

#[test]
fn test_semantic_fuzz_random_walks_keep_invariants() {
    let mut runner = TestRunner::new(ProptestConfig { cases: 16, ..ProptestConfig::default() });
    runner
        .run(&(any::<u64>(), any::<u64>()), |(map_seed, action_seed)| {
            run_fuzz_simulation(map_seed, action_seed, 300).map_err(TestCaseError::fail)
        })
        .expect("fuzzed runs should keep dungeon invariants");
}
