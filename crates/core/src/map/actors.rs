//! Per-turn actor movement on a single map.

use std::mem::{replace, take};

use super::Map;
use crate::cell::{Cell, Item, Occupant};
use crate::error::SwitchError;
use crate::pathfinding::distances_within;
use crate::types::{EntityId, Pos};

/// What a player step into a neighbouring tile turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerStep {
    Blocked,
    Moved { pickup: Option<Item> },
    Attack(EntityId),
    EnterHallway(Pos),
}

/// A hostile that ended its move next to the player and struck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyHit {
    pub enemy: EntityId,
    pub amount: f64,
}

impl Map {
    /// Puts the player on `pos`, picking up whatever item lies there.
    pub fn place_player(&mut self, pos: Pos) -> Result<Option<Item>, SwitchError> {
        let pickup = match self.cell(pos) {
            Some(Cell::Empty { .. }) => None,
            Some(cell @ (Cell::Key(_) | Cell::WinMarker { .. })) => cell.as_item(),
            _ => return Err(SwitchError::ArrivalBlocked(pos)),
        };
        self.set_cell(pos, Cell::Actor(Occupant::Player));
        Ok(pickup)
    }

    pub fn remove_player(&mut self, pos: Pos) {
        if matches!(self.cell(pos), Some(Cell::Actor(Occupant::Player))) {
            self.set_cell(pos, Cell::Empty { explored: true });
        }
    }

    /// Resolves a player step from `from` into `to` without touching anything off this map.
    pub fn step_player(&mut self, from: Pos, to: Pos) -> PlayerStep {
        match self.cell(to) {
            None | Some(Cell::Wall(_) | Cell::Actor(Occupant::Player)) => PlayerStep::Blocked,
            Some(Cell::Hallway(_)) => PlayerStep::EnterHallway(to),
            Some(Cell::Actor(Occupant::Enemy(id))) => PlayerStep::Attack(*id),
            Some(Cell::Empty { .. } | Cell::Key(_) | Cell::WinMarker { .. }) => {
                let Ok(pickup) = self.place_player(to) else {
                    return PlayerStep::Blocked;
                };
                self.remove_player(from);
                PlayerStep::Moved { pickup }
            }
        }
    }

    /// Deals `amount` to an enemy; returns `Some(true)` when the blow killed it.
    pub fn damage_enemy(&mut self, id: EntityId, amount: f64) -> Option<bool> {
        let enemy = self.enemies.get_mut(id)?;
        enemy.take_damage(amount);
        if !enemy.is_dead() {
            return Some(false);
        }
        if let Some(enemy) = self.enemies.remove(id) {
            self.set_cell(enemy.pos, enemy.underfoot);
        }
        Some(true)
    }

    /// Marks floor within `range` steps as explored and uncovers hidden items there.
    pub fn explore_from(&mut self, origin: Pos, range: u32) {
        for pos in distances_within(self, &[origin], range).into_keys() {
            let Some(cell) = self.cell(pos) else { continue };
            let revealed = match cell {
                Cell::Empty { explored: false } => Cell::Empty { explored: true },
                Cell::Key(key) if key.hidden => {
                    let mut key = key.clone();
                    key.hidden = false;
                    Cell::Key(key)
                }
                Cell::WinMarker { hidden: true } => Cell::WinMarker { hidden: false },
                _ => continue,
            };
            self.set_cell(pos, revealed);
        }
    }

    /// Flags every hostile within `range` steps as hunting; returns how many were newly drawn in.
    pub fn attract_from(&mut self, origin: Pos, range: u32) -> usize {
        let mut drawn = 0;
        for pos in distances_within(self, &[origin], range).into_keys() {
            let Some(Cell::Actor(Occupant::Enemy(id))) = self.cell(pos) else { continue };
            let id = *id;
            if let Some(enemy) = self.enemies.get_mut(id)
                && !enemy.attracted
            {
                enemy.attracted = true;
                drawn += 1;
            }
        }
        drawn
    }

    /// Moves every hunting hostile one step towards `player` and collects the blows landed.
    ///
    /// An enemy whose next step is the player attacks instead of moving. A step into a
    /// tile that is no longer free is abandoned and the cached path is dropped.
    pub fn run_enemy_turns(&mut self, player: Pos) -> Vec<EnemyHit> {
        let mut hits = Vec::new();
        let ids: Vec<EntityId> = self.enemies.keys().collect();
        for id in ids {
            let Some(enemy) = self.enemies.get_mut(id) else { continue };
            if !enemy.attracted {
                continue;
            }
            let from = enemy.pos;
            let mut pathfinder = take(&mut enemy.pathfinder);

            match pathfinder.choose_move(self, from, player) {
                Some(step) if step == player => {
                    let amount = self.enemies[id].strength;
                    hits.push(EnemyHit { enemy: id, amount });
                }
                Some(step) => {
                    if !self.move_enemy(id, step) {
                        pathfinder.invalidate();
                    }
                }
                None => {}
            }
            if let Some(enemy) = self.enemies.get_mut(id) {
                enemy.pathfinder = pathfinder;
            }
        }
        hits
    }

    fn move_enemy(&mut self, id: EntityId, to: Pos) -> bool {
        let Some(target) = self.cell(to) else { return false };
        if !matches!(target, Cell::Empty { .. } | Cell::Key(_) | Cell::WinMarker { .. }) {
            return false;
        }
        let entering = target.clone();
        let Some(enemy) = self.enemies.get_mut(id) else { return false };
        let from = replace(&mut enemy.pos, to);
        let left_behind = replace(&mut enemy.underfoot, entering);
        self.set_cell(from, left_behind);
        self.set_cell(to, Cell::Actor(Occupant::Enemy(id)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Enemy;
    use crate::cell::Key;
    use crate::content::EnemyStats;
    use crate::test_support::open_map;

    fn brute() -> EnemyStats {
        EnemyStats { glyph: 'b', max_health: 3, strength: 0.5, min_depth: 0 }
    }

    fn spawn_at(map: &mut Map, pos: Pos) -> EntityId {
        let stats = brute();
        let id = map.enemies.insert_with_key(|id| {
            let mut enemy = Enemy::new(pos, &stats);
            enemy.id = id;
            enemy
        });
        map.set_cell(pos, Cell::Actor(Occupant::Enemy(id)));
        id
    }

    #[test]
    fn player_steps_resolve_by_target_cell() {
        let mut map = open_map(5, 5);
        map.place_player(Pos::new(2, 2)).expect("free");
        let enemy = spawn_at(&mut map, Pos::new(3, 2));

        assert_eq!(map.step_player(Pos::new(2, 2), Pos::new(2, 0)), PlayerStep::Blocked);
        assert_eq!(map.step_player(Pos::new(2, 2), Pos::new(3, 2)), PlayerStep::Attack(enemy));
        assert_eq!(
            map.step_player(Pos::new(2, 2), Pos::new(2, 3)),
            PlayerStep::Moved { pickup: None }
        );
        assert_eq!(map.find_player(), Some(Pos::new(2, 3)));
        assert_eq!(map.cell(Pos::new(2, 2)), Some(&Cell::Empty { explored: true }));
    }

    #[test]
    fn stepping_onto_a_key_picks_it_up() {
        let mut map = open_map(5, 5);
        map.place_player(Pos::new(1, 1)).expect("free");
        let key = Key { lock_id: "lock-4".to_string(), hidden: false };
        map.set_cell(Pos::new(2, 1), Cell::Key(key.clone()));

        assert_eq!(
            map.step_player(Pos::new(1, 1), Pos::new(2, 1)),
            PlayerStep::Moved { pickup: Some(Item::Key(key)) }
        );
        assert!(map.keys().is_empty());
    }

    #[test]
    fn exploring_reveals_hidden_items_in_range() {
        let mut map = open_map(9, 3);
        map.set_cell(Pos::new(3, 2), Cell::Key(Key { lock_id: "a".to_string(), hidden: true }));
        map.set_cell(Pos::new(8, 2), Cell::WinMarker { hidden: true });

        map.explore_from(Pos::new(1, 2), 3);
        assert!(matches!(map.cell(Pos::new(3, 2)), Some(Cell::Key(key)) if !key.hidden));
        assert_eq!(map.cell(Pos::new(8, 2)), Some(&Cell::WinMarker { hidden: true }));
        assert_eq!(map.cell(Pos::new(1, 1)), Some(&Cell::Empty { explored: true }));
        assert_eq!(map.cell(Pos::new(9, 2)), Some(&Cell::EMPTY));
    }

    #[test]
    fn attracted_enemy_closes_in_then_strikes() {
        let mut map = open_map(8, 3);
        let player = Pos::new(1, 2);
        map.place_player(player).expect("free");
        let id = spawn_at(&mut map, Pos::new(5, 2));

        assert!(map.run_enemy_turns(player).is_empty(), "idle until attracted");
        assert_eq!(map.enemies[id].pos, Pos::new(5, 2));

        assert_eq!(map.attract_from(player, 10), 1);
        for _ in 0..3 {
            assert!(map.run_enemy_turns(player).is_empty());
        }
        assert_eq!(map.enemies[id].pos, Pos::new(2, 2));
        assert_eq!(map.run_enemy_turns(player), vec![EnemyHit { enemy: id, amount: 0.5 }]);
        assert_eq!(map.enemies[id].pos, Pos::new(2, 2), "attacking does not move");
    }

    #[test]
    fn enemies_restore_items_they_walk_over() {
        let mut map = open_map(6, 1);
        let player = Pos::new(1, 1);
        map.place_player(player).expect("free");
        let key = Cell::Key(Key { lock_id: "lock-1".to_string(), hidden: false });
        map.set_cell(Pos::new(4, 1), key.clone());
        let id = spawn_at(&mut map, Pos::new(5, 1));
        map.attract_from(player, 10);

        map.run_enemy_turns(player);
        assert_eq!(map.enemies[id].underfoot, key);
        assert_eq!(map.keys().len(), 1, "covered key still counts");

        map.run_enemy_turns(player);
        assert_eq!(map.cell(Pos::new(4, 1)), Some(&key));
    }

    #[test]
    fn killing_an_enemy_frees_its_tile() {
        let mut map = open_map(4, 4);
        let id = spawn_at(&mut map, Pos::new(2, 2));
        assert_eq!(map.damage_enemy(id, 1.0), Some(false));
        assert_eq!(map.damage_enemy(id, 5.0), Some(true));
        assert!(map.enemies().is_empty());
        assert_eq!(map.cell(Pos::new(2, 2)), Some(&Cell::EMPTY));
        assert_eq!(map.damage_enemy(id, 1.0), None);
    }

    #[test]
    fn blocked_step_invalidates_the_cached_path() {
        let mut map = open_map(8, 1);
        let player = Pos::new(1, 1);
        map.place_player(player).expect("free");
        let id = spawn_at(&mut map, Pos::new(6, 1));
        map.attract_from(player, 10);
        map.run_enemy_turns(player);
        assert_eq!(map.enemies[id].pos, Pos::new(5, 1));

        spawn_at(&mut map, Pos::new(4, 1));
        map.run_enemy_turns(player);
        assert_eq!(map.enemies[id].pos, Pos::new(5, 1));
        assert!(map.enemies[id].pathfinder.current_path().is_empty());
    }
}
