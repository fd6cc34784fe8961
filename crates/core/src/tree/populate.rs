use log::{debug, warn};

use super::MapTree;
use crate::content::StartingStats;
use crate::rng::GameRng;

/// Hostiles per map never exceed this, whatever the depth and difficulty.
const MAX_ENEMIES_PER_MAP: usize = 6;

/// `min(1 + depth / 2 + difficulty / 4, 6)`.
pub(crate) fn enemy_count(depth: u8, difficulty: u8) -> usize {
    (1 + usize::from(depth) / 2 + usize::from(difficulty) / 4).min(MAX_ENEMIES_PER_MAP)
}

impl MapTree {
    /// Places hostiles, the win marker and the player once the layout is fixed,
    /// then releases hostile locks on maps that ended up empty.
    pub(super) fn populate(&mut self, stats: &StartingStats, rng: &mut GameRng) {
        for id in self.preorder() {
            if id == self.root {
                continue;
            }
            let map = &mut self.maps[id];
            let depth = map.depth();
            let wanted = enemy_count(depth, self.difficulty);
            let spawned = map.spawn_enemies(wanted, &stats.enemies_for_depth(depth), rng);
            if spawned < wanted {
                debug!("map at depth {depth} holds {spawned} of {wanted} enemies");
            }
        }

        if self.maps[self.last_map].place_win_marker(rng).is_none() {
            warn!("no free tile left for the win marker");
        }

        for id in self.preorder() {
            if self.maps[id].enemies().is_empty() {
                self.release_enemy_locks(id);
            }
        }

        let root = &mut self.maps[self.root];
        let start = root.random_free_tile(rng).expect("root map always keeps open floor");
        root.place_player(start).expect("free tile accepts the player");
        self.player.pos = start;
        root.explore_from(start, self.player.explore_range);
    }
}
