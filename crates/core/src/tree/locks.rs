//! Lock and key distribution across the tree, and the unlock propagation used in play.

use log::debug;

use super::{MAX_DIFFICULTY, MapTree};
use crate::hallway::{ENEMY_LOCK, HallwayRef};
use crate::rng::GameRng;
use crate::types::MapId;

impl MapTree {
    /// Pre-order pass that may lock each parent-side hallway below `current`.
    ///
    /// `eligible` holds the maps visited so far, root excluded. A key is only ever
    /// hidden in one of them, so it always sits behind the player, never past its lock.
    /// Returns how many locks ended up with a key.
    pub(super) fn generate_locks(
        &mut self,
        current: MapId,
        eligible: &mut Vec<MapId>,
        rng: &mut GameRng,
    ) -> usize {
        let mut placed = 0;
        for pos in self.maps[current].child_hallways().to_vec() {
            let handle = HallwayRef { map: current, pos };
            let Some(destination) = self.hallway(handle).map(|h| h.destination) else {
                continue;
            };

            let roll = rng.next_int(0, i32::from(MAX_DIFFICULTY) * 2);
            if !eligible.is_empty()
                && roll < i32::from(MAX_DIFFICULTY - 1 + self.difficulty)
                && self.hide_key(handle, eligible, rng)
            {
                placed += 1;
            }

            eligible.push(destination);
            placed += self.generate_locks(destination, eligible, rng);
        }
        placed
    }

    /// Locks the hallway behind a fresh id and hides the key in one of `eligible`,
    /// trying each candidate map once. Reports whether a key was placed.
    fn hide_key(&mut self, handle: HallwayRef, eligible: &[MapId], rng: &mut GameRng) -> bool {
        let Some(mut hallway) = self.hallway(handle).cloned() else {
            return false;
        };
        self.lock_serial += 1;
        let lock_id = format!("lock-{}", self.lock_serial);

        let mut candidates = eligible.to_vec();
        let mut placed = false;
        while !candidates.is_empty() {
            let key_map = candidates.swap_remove(rng.pick_index(candidates.len()));
            match self.maps[key_map].add_key(&lock_id, true, &mut hallway, rng) {
                Ok(pos) => {
                    debug!("{lock_id} guards {handle:?}; key at {pos:?} on {key_map:?}");
                    placed = true;
                    break;
                }
                Err(err) => debug!("{lock_id} could not go on {key_map:?}: {err}"),
            }
        }

        if let Some(slot) = self.maps[handle.map].hallway_mut(handle.pos) {
            *slot = hallway;
        }
        if !placed {
            debug!("{lock_id} rolled back; {handle:?} stays open to keys");
        }
        placed
    }

    /// Removes `key_id` from every hallway in the tree; returns how many it opened up.
    pub fn unlock_hallways(&mut self, key_id: &str) -> usize {
        let mut unlocked = 0;
        for handle in self.parent_side_hallways() {
            if let Some(hallway) = self.maps[handle.map].hallway_mut(handle.pos)
                && hallway.unlock(key_id)
            {
                unlocked += 1;
            }
        }
        unlocked
    }

    /// Drops the implicit hostile lock from the hallways leading out of `map`.
    pub(super) fn release_enemy_locks(&mut self, map: MapId) -> usize {
        let map = &mut self.maps[map];
        let mut released = 0;
        for pos in map.child_hallways().to_vec() {
            if map.hallway_mut(pos).is_some_and(|hallway| hallway.unlock(ENEMY_LOCK)) {
                released += 1;
            }
        }
        released
    }
}
