//! Doorway cells linking two maps, their lock sets, and mutual pairing.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::error::{HallwayError, LockError};
use crate::map::Map;
use crate::types::{Color, MapId, Pos};

/// Lock every parent-side hallway starts with; released once its map is cleared of hostiles.
pub const ENEMY_LOCK: &str = "enemy";

/// Stable handle to a hallway: the map it sits on plus its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HallwayRef {
    pub map: MapId,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hallway {
    pub pos: Pos,
    pub destination: MapId,
    pub paired: Option<HallwayRef>,
    /// True when this hallway sits on the parent map and leads down to a child.
    pub is_parent_side: bool,
    /// Tile a traveller arriving through this hallway is placed on.
    pub spawn: Pos,
    pub used: bool,
    locks: BTreeSet<String>,
}

impl Hallway {
    pub fn new(pos: Pos, destination: MapId, is_parent_side: bool) -> Self {
        let mut locks = BTreeSet::new();
        if is_parent_side {
            locks.insert(ENEMY_LOCK.to_string());
        }
        Self {
            pos,
            destination,
            paired: None,
            is_parent_side,
            spawn: pos + inward_shift(is_parent_side),
            used: false,
            locks,
        }
    }

    pub fn add_lock(&mut self, lock_id: &str) -> Result<(), LockError> {
        if !self.locks.insert(lock_id.to_string()) {
            return Err(LockError::Duplicate(lock_id.to_string()));
        }
        Ok(())
    }

    /// Removes `lock_id`; reports whether it was present.
    pub fn unlock(&mut self, lock_id: &str) -> bool {
        self.locks.remove(lock_id)
    }

    pub fn is_locked(&self) -> bool {
        !self.locks.is_empty()
    }

    pub fn has_lock(&self, lock_id: &str) -> bool {
        self.locks.contains(lock_id)
    }

    pub fn locks(&self) -> impl Iterator<Item = &str> {
        self.locks.iter().map(String::as_str)
    }

    pub fn glyph(&self) -> char {
        if self.is_locked() { '+' } else { '/' }
    }

    pub fn color(&self) -> Color {
        if self.is_locked() {
            Color::Red
        } else if self.used {
            Color::DarkGray
        } else {
            Color::Yellow
        }
    }
}

/// Step from a hallway into its own map's play area.
/// Parent-side hallways are cut into the right border, child-side ones into the left.
pub fn inward_shift(is_parent_side: bool) -> Pos {
    if is_parent_side { Pos { y: 0, x: -1 } } else { Pos { y: 0, x: 1 } }
}

/// Links two hallways so each names the other as its pair.
pub fn connect(
    maps: &mut SlotMap<MapId, Map>,
    a: HallwayRef,
    b: HallwayRef,
) -> Result<(), HallwayError> {
    let (a_destination, a_parent_side) = hallway_summary(maps, a)?;
    let (b_destination, b_parent_side) = hallway_summary(maps, b)?;
    if a_destination != b.map || b_destination != a.map || a_parent_side == b_parent_side {
        return Err(HallwayError::PairingMismatch);
    }

    if let Some(hallway) = maps.get_mut(a.map).and_then(|map| map.hallway_mut(a.pos)) {
        hallway.paired = Some(b);
    }
    if let Some(hallway) = maps.get_mut(b.map).and_then(|map| map.hallway_mut(b.pos)) {
        hallway.paired = Some(a);
    }
    Ok(())
}

fn hallway_summary(
    maps: &SlotMap<MapId, Map>,
    handle: HallwayRef,
) -> Result<(MapId, bool), HallwayError> {
    maps.get(handle.map)
        .and_then(|map| map.hallway(handle.pos))
        .map(|hallway| (hallway.destination, hallway.is_parent_side))
        .ok_or(HallwayError::Missing { map: handle.map, pos: handle.pos })
}
