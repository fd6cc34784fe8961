use log::{debug, warn};

use super::{MapTree, WALL_SEGMENT_FACTOR};
use crate::content::DungeonSettings;
use crate::hallway::{HallwayRef, connect};
use crate::map::Map;
use crate::rng::GameRng;
use crate::types::MapId;

/// Below this depth the attachment walk may stop at any node.
const MAX_RANDOM_DEPTH: usize = 4;
/// Hard ceiling for the single-file descent past `MAX_RANDOM_DEPTH`.
const MAX_ACTUAL_DEPTH: usize = 7;
const MAX_CHILDREN: usize = 4;
const MAX_FAILS: usize = 20;

impl MapTree {
    /// Grows the tree towards `5 + 2 * difficulty` maps, giving up after too many soft failures.
    pub(super) fn generate_all_maps(&mut self, settings: &DungeonSettings, rng: &mut GameRng) {
        let target = 5 + 2 * usize::from(self.difficulty);
        let mut remaining = target;
        let mut fails = 0;

        while remaining > 0 && fails < MAX_FAILS {
            let Some(parent) = self.pick_attachment(rng) else {
                debug!("attachment walk hit the depth ceiling");
                fails += 1;
                continue;
            };
            if self.attach_child(parent, settings, rng) {
                remaining -= 1;
            } else {
                fails += 1;
            }
        }

        if remaining > 0 {
            let built = target - remaining;
            warn!("generated {built} of {target} maps before running out of retries");
        }
    }

    fn child_destinations(&self, id: MapId) -> Vec<MapId> {
        let map = &self.maps[id];
        map.child_hallways()
            .iter()
            .filter_map(|&pos| map.hallway(pos))
            .map(|h| h.destination)
            .collect()
    }

    /// Biased walk from the root: shallow nodes with few children tend to keep the new map,
    /// deep ones pass it on. Past the random zone the walk goes single file.
    fn pick_attachment(&self, rng: &mut GameRng) -> Option<MapId> {
        let mut parent = self.root;
        let mut children = self.child_destinations(parent);
        let mut depth = 0;

        while depth < MAX_RANDOM_DEPTH {
            let room = MAX_CHILDREN - depth;
            let stop = children.is_empty()
                || (children.len() < room
                    && rng.next_int(0, (MAX_RANDOM_DEPTH * room) as i32)
                        > (depth * children.len()) as i32);
            if stop {
                return Some(parent);
            }
            depth += 1;
            parent = children[rng.pick_index(children.len())];
            children = self.child_destinations(parent);
        }

        while !children.is_empty() && depth < MAX_ACTUAL_DEPTH {
            depth += 1;
            parent = children[rng.pick_index(children.len())];
            children = self.child_destinations(parent);
        }
        children.is_empty().then_some(parent)
    }

    /// Creates one child under `parent` and pairs the two new hallways.
    /// A placement failure discards the new map and leaves `parent` untouched.
    fn attach_child(
        &mut self,
        parent: MapId,
        settings: &DungeonSettings,
        rng: &mut GameRng,
    ) -> bool {
        let depth = self.maps[parent].depth() + 1;
        let segments = usize::from(depth) * WALL_SEGMENT_FACTOR;
        let child = self.maps.insert_with_key(|id| {
            Map::generate(id, settings.child_width, settings.child_height, depth, segments, rng)
        });

        let child_side = match self.maps[child].create_hallway(parent, false, rng) {
            Ok(pos) => pos,
            Err(err) => {
                debug!("child at depth {depth} rejected: {err}");
                self.maps.remove(child);
                return false;
            }
        };
        let parent_side = match self.maps[parent].create_hallway(child, true, rng) {
            Ok(pos) => pos,
            Err(err) => {
                debug!("parent at depth {} rejected a new child: {err}", depth - 1);
                self.maps.remove(child);
                return false;
            }
        };

        let down = HallwayRef { map: parent, pos: parent_side };
        let up = HallwayRef { map: child, pos: child_side };
        connect(&mut self.maps, down, up).expect("freshly created hallways always pair");
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::cell::{Cell, Occupant};
    use crate::content::StartingStats;
    use crate::test_support::{compact_settings, compact_tree};

    #[test]
    fn map_count_never_exceeds_the_target() {
        for difficulty in [1, 4, 10] {
            let tree = compact_tree(40 + difficulty as u64, difficulty);
            let target = 5 + 2 * difficulty as usize;
            assert!(tree.map_count() <= target + 1, "root plus at most {target} children");
            assert!(tree.map_count() > 1);
        }
    }

    #[test]
    fn exhausted_retries_leave_a_playable_root_only_dungeon() {
        let settings = DungeonSettings { child_height: 0, ..compact_settings() };
        for seed in 0..5 {
            let mut rng = GameRng::new(seed);
            let stats = StartingStats::default();
            let tree = MapTree::with_settings(settings, 10, "tester", &stats, &mut rng);

            assert_eq!(tree.map_count(), 1, "flat children never fit a hallway");
            assert_eq!(tree.last_map(), tree.root());
            let root = tree.map(tree.root()).expect("root");
            assert!(root.child_hallways().is_empty());
            let markers = root
                .positions()
                .filter(|&pos| matches!(root.cell(pos), Some(Cell::WinMarker { .. })))
                .count();
            assert_eq!(markers, 1);
            let player = tree.player().pos;
            assert_eq!(root.cell(player), Some(&Cell::Actor(Occupant::Player)));
        }
    }

    #[test]
    fn every_child_has_one_mutually_paired_parent_hallway() {
        let tree = compact_tree(17, 6);
        for id in tree.preorder().into_iter().skip(1) {
            let map = tree.map(id).expect("map");
            let up = map.parent_hallway().expect("non-root maps have a parent hallway");
            let up_ref = HallwayRef { map: id, pos: up };
            let hallway = tree.hallway(up_ref).expect("hallway cell");
            assert!(!hallway.is_parent_side);
            let down_ref = hallway.paired.expect("paired");
            assert_eq!(tree.hallway(down_ref).and_then(|h| h.paired), Some(up_ref));
            assert_eq!(map.depth(), tree.map(down_ref.map).expect("parent").depth() + 1);
        }
        assert!(tree.map(tree.root()).expect("root").parent_hallway().is_none());
    }

    #[test]
    fn depth_never_passes_the_ceiling() {
        let tree = compact_tree(5, 10);
        let deepest =
            tree.preorder().iter().filter_map(|&id| tree.map(id)).map(|m| m.depth()).max();
        assert!(deepest.is_some_and(|depth| depth <= 8));
        let distinct: BTreeSet<_> = tree.preorder().into_iter().collect();
        assert_eq!(distinct.len(), tree.map_count(), "no map is reachable twice");
    }
}
