//! Shared test fixtures for the map and tree test suites.
//! It does not own production gameplay logic.

use crate::content::{DungeonSettings, StartingStats};
use crate::map::Map;
use crate::rng::GameRng;
use crate::tree::MapTree;
use crate::types::MapId;

/// Bordered map with a fully open `width` by `height` interior.
pub(crate) fn open_map(width: usize, height: usize) -> Map {
    Map::generate(MapId::default(), width, height, 0, 0, &mut GameRng::new(0))
}

/// Small dungeon that generates quickly in unit tests.
pub(crate) fn compact_settings() -> DungeonSettings {
    DungeonSettings { root_width: 10, root_height: 12, child_width: 14, child_height: 18 }
}

pub(crate) fn compact_tree(seed: u64, difficulty: i32) -> MapTree {
    let mut rng = GameRng::new(seed);
    MapTree::with_settings(
        compact_settings(),
        difficulty,
        "tester",
        &StartingStats::default(),
        &mut rng,
    )
}
