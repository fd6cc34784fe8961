//! Putting keys, hostiles, and the win marker onto free floor.

use log::{debug, trace};

use super::Map;
use crate::actor::Enemy;
use crate::cell::{Cell, Key, Occupant};
use crate::content::EnemyStats;
use crate::error::KeyPlacementError;
use crate::hallway::Hallway;
use crate::pathfinding::distances_within;
use crate::rng::GameRng;
use crate::types::Pos;

/// Keys start this far from child hallways and move closer only when the map is too cramped.
const KEY_CLEARANCE_MAX: u32 = 15;
const KEY_CLEARANCE_MIN: u32 = 6;
/// Hostiles never spawn within this many steps of the hallway the player arrives through.
const ENEMY_CLEARANCE: u32 = 5;
const WIN_MARKER_CLEARANCE: u32 = 6;

impl Map {
    /// Open floor tiles farther than `radius` steps from every origin.
    fn free_tiles_beyond(&self, origins: &[Pos], radius: u32) -> Vec<Pos> {
        let near = distances_within(self, origins, radius);
        self.positions().filter(|&pos| self.is_empty_at(pos) && !near.contains_key(&pos)).collect()
    }

    fn child_spawns(&self) -> Vec<Pos> {
        self.children.iter().filter_map(|&pos| self.hallway(pos)).map(|h| h.spawn).collect()
    }

    fn parent_spawn(&self) -> Vec<Pos> {
        self.parent.and_then(|pos| self.hallway(pos)).map(|h| h.spawn).into_iter().collect()
    }

    /// Locks `hallway` with `lock_id` and drops the matching key somewhere on this map.
    ///
    /// The key keeps as far from this map's own child hallways as the layout allows.
    /// On failure the lock is taken back off, leaving `hallway` as it was.
    pub fn add_key(
        &mut self,
        lock_id: &str,
        hidden: bool,
        hallway: &mut Hallway,
        rng: &mut GameRng,
    ) -> Result<Pos, KeyPlacementError> {
        if !hallway.is_parent_side {
            return Err(KeyPlacementError::NotParentSide);
        }
        hallway.add_lock(lock_id)?;

        let origins = self.child_spawns();
        for radius in (KEY_CLEARANCE_MIN..=KEY_CLEARANCE_MAX).rev() {
            let candidates = self.free_tiles_beyond(&origins, radius);
            if candidates.is_empty() {
                continue;
            }
            let pos = candidates[rng.pick_index(candidates.len())];
            self.set_cell(pos, Cell::Key(Key { lock_id: lock_id.to_string(), hidden }));
            trace!("key {lock_id} placed at {pos:?} with clearance {radius}");
            return Ok(pos);
        }

        hallway.unlock(lock_id);
        debug!("no room for key {lock_id} on map at depth {}", self.depth);
        Err(KeyPlacementError::NoCandidate)
    }

    /// Spawns up to `count` hostiles drawn from `archetypes`; returns how many fit.
    pub fn spawn_enemies(
        &mut self,
        count: usize,
        archetypes: &[&EnemyStats],
        rng: &mut GameRng,
    ) -> usize {
        if archetypes.is_empty() {
            return 0;
        }
        let mut candidates = self.free_tiles_beyond(&self.parent_spawn(), ENEMY_CLEARANCE);
        let mut spawned = 0;
        while spawned < count && !candidates.is_empty() {
            let pos = candidates.swap_remove(rng.pick_index(candidates.len()));
            let stats = archetypes[rng.pick_index(archetypes.len())];
            let id = self.enemies.insert_with_key(|id| {
                let mut enemy = Enemy::new(pos, stats);
                enemy.id = id;
                enemy
            });
            self.set_cell(pos, Cell::Actor(Occupant::Enemy(id)));
            spawned += 1;
        }
        spawned
    }

    /// Hides the run's goal on free floor, away from the arrival hallway when possible.
    pub fn place_win_marker(&mut self, rng: &mut GameRng) -> Option<Pos> {
        let mut candidates = self.free_tiles_beyond(&self.parent_spawn(), WIN_MARKER_CLEARANCE);
        if candidates.is_empty() {
            candidates = self.free_tiles_beyond(&[], 0);
        }
        if candidates.is_empty() {
            return None;
        }
        let pos = candidates[rng.pick_index(candidates.len())];
        self.set_cell(pos, Cell::WinMarker { hidden: true });
        Some(pos)
    }

    /// Random open floor tile, used for the player's first placement.
    pub fn random_free_tile(&self, rng: &mut GameRng) -> Option<Pos> {
        let candidates = self.free_tiles_beyond(&[], 0);
        (!candidates.is_empty()).then(|| candidates[rng.pick_index(candidates.len())])
    }
}
