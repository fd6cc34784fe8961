mod hash;

use crate::content::{DungeonSettings, StartingStats};
use crate::rng::GameRng;
use crate::tree::MapTree;
use crate::types::{LogEvent, PlayerAction, TurnResult};

/// One run: a dungeon built from a seed plus a turn counter.
pub struct Game {
    seed: u64,
    turn: u64,
    tree: MapTree,
}

impl Game {
    pub fn new(seed: u64, difficulty: i32, player_name: &str, stats: &StartingStats) -> Self {
        Self::with_settings(seed, difficulty, player_name, stats, DungeonSettings::default())
    }

    pub fn with_settings(
        seed: u64,
        difficulty: i32,
        player_name: &str,
        stats: &StartingStats,
        settings: DungeonSettings,
    ) -> Self {
        let mut rng = GameRng::new(seed);
        let tree = MapTree::with_settings(settings, difficulty, player_name, stats, &mut rng);
        Self { seed, turn: 0, tree }
    }

    /// Plays one action. Once the run is decided the turn counter stops moving.
    pub fn advance(&mut self, action: PlayerAction) -> TurnResult {
        if let Some(outcome) = self.tree.outcome() {
            return TurnResult { turn: self.turn, outcome: Some(outcome) };
        }
        self.turn += 1;
        let outcome = self.tree.update(action);
        TurnResult { turn: self.turn, outcome }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_turn(&self) -> u64 {
        self.turn
    }

    pub fn tree(&self) -> &MapTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MapTree {
        &mut self.tree
    }

    pub fn log(&self) -> &[LogEvent] {
        self.tree.log()
    }
}
