//! The whole dungeon: maps joined by paired hallways, the lock and key layout
//! spread across them, and the player moving between them.

mod locks;
mod populate;
mod topology;
mod turn;

use log::info;
use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::actor::Player;
use crate::content::{DungeonSettings, StartingStats};
use crate::hallway::{Hallway, HallwayRef};
use crate::map::Map;
use crate::rng::GameRng;
use crate::types::{LogEvent, MapId, RunOutcome};

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
/// Wall-segment attempts per level of depth.
pub const WALL_SEGMENT_FACTOR: usize = 50;

pub struct MapTree {
    maps: SlotMap<MapId, Map>,
    root: MapId,
    active: MapId,
    last_map: MapId,
    difficulty: u8,
    player: Player,
    victory: bool,
    log: Vec<LogEvent>,
    lock_serial: u32,
}

impl MapTree {
    pub fn new(
        difficulty: i32,
        player_name: &str,
        stats: &StartingStats,
        rng: &mut GameRng,
    ) -> Self {
        Self::with_settings(DungeonSettings::default(), difficulty, player_name, stats, rng)
    }

    /// Builds every map, hallway, lock and hostile up front; nothing is generated lazily.
    pub fn with_settings(
        settings: DungeonSettings,
        difficulty: i32,
        player_name: &str,
        stats: &StartingStats,
        rng: &mut GameRng,
    ) -> Self {
        let stats = stats.clone().normalized();
        let difficulty =
            difficulty.clamp(i32::from(MIN_DIFFICULTY), i32::from(MAX_DIFFICULTY)) as u8;

        let mut maps = SlotMap::with_key();
        let root = maps.insert_with_key(|id| {
            Map::generate(id, settings.root_width, settings.root_height, 0, 0, rng)
        });

        let mut tree = Self {
            maps,
            root,
            active: root,
            last_map: root,
            difficulty,
            player: Player::new(player_name, &stats.player),
            victory: false,
            log: Vec::new(),
            lock_serial: 0,
        };

        tree.generate_all_maps(&settings, rng);
        let mut eligible = Vec::new();
        let locks = tree.generate_locks(root, &mut eligible, rng);
        tree.last_map = eligible.last().copied().unwrap_or(root);
        tree.populate(&stats, rng);

        info!(
            "dungeon ready: {} maps, {locks} key locks, difficulty {}, goal at depth {}",
            tree.maps.len(),
            tree.difficulty,
            tree.maps[tree.last_map].depth()
        );
        tree
    }

    pub fn root(&self) -> MapId {
        self.root
    }

    pub fn active_map_id(&self) -> MapId {
        self.active
    }

    pub fn active_map(&self) -> &Map {
        &self.maps[self.active]
    }

    pub fn active_map_mut(&mut self) -> &mut Map {
        &mut self.maps[self.active]
    }

    /// Map that holds the win marker.
    pub fn last_map(&self) -> MapId {
        self.last_map
    }

    pub fn map(&self, id: MapId) -> Option<&Map> {
        self.maps.get(id)
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn hallway(&self, handle: HallwayRef) -> Option<&Hallway> {
        self.maps.get(handle.map).and_then(|map| map.hallway(handle.pos))
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        if self.victory {
            Some(RunOutcome::Victory)
        } else if self.player.is_dead() {
            Some(RunOutcome::Defeat)
        } else {
            None
        }
    }

    /// Maps in pre-order: a parent before its children, children in hallway creation order.
    pub fn preorder(&self) -> Vec<MapId> {
        let mut order = Vec::with_capacity(self.maps.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let map = &self.maps[id];
            for &pos in map.child_hallways().iter().rev() {
                if let Some(hallway) = map.hallway(pos) {
                    stack.push(hallway.destination);
                }
            }
        }
        order
    }

    /// Parent-side hallways in pre-order, each paired with the map it leads into.
    pub fn parent_side_hallways(&self) -> Vec<HallwayRef> {
        self.preorder()
            .into_iter()
            .flat_map(|id| {
                self.maps[id].child_hallways().iter().map(move |&pos| HallwayRef { map: id, pos })
            })
            .collect()
    }

    /// Hash of every map's canonical bytes in pre-order plus the player's standing.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for id in self.preorder() {
            hasher.update(&self.maps[id].canonical_bytes());
        }
        hasher.update(&self.player.pos.x.to_le_bytes());
        hasher.update(&self.player.pos.y.to_le_bytes());
        hasher.update(&self.player.health.to_bits().to_le_bytes());
        hasher.update(&[u8::from(self.victory)]);
        hasher.digest()
    }
}

#[cfg(test)]
impl MapTree {
    pub(crate) fn force_victory(&mut self) {
        self.victory = true;
    }
}
