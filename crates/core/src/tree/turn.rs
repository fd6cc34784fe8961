//! One turn of play and the map switches it can trigger.

use log::debug;

use super::MapTree;
use crate::cell::Item;
use crate::error::SwitchError;
use crate::hallway::HallwayRef;
use crate::map::PlayerStep;
use crate::types::{Direction, LogEvent, MapId, PlayerAction, RunOutcome};

impl MapTree {
    /// Advances the dungeon by one player action and returns the outcome once the run is over.
    ///
    /// The player acts first. Unless that took them to another map, the active map is
    /// explored, nearby hostiles are drawn in, and every hunting hostile moves or strikes.
    pub fn update(&mut self, action: PlayerAction) -> Option<RunOutcome> {
        if let Some(outcome) = self.outcome() {
            return Some(outcome);
        }

        let switched = match action {
            PlayerAction::Move(direction) => self.move_player(direction),
            PlayerAction::Wait => false,
        };

        if !switched && !self.victory {
            let origin = self.player.pos;
            let (explore, attract) = (self.player.explore_range, self.player.attract_range);
            let map = &mut self.maps[self.active];
            map.explore_from(origin, explore);
            map.attract_from(origin, attract);
            for hit in map.run_enemy_turns(origin) {
                self.player.take_damage(hit.amount);
                self.log
                    .push(LogEvent::PlayerDamaged { amount: hit.amount, health: self.player.health });
            }
        }

        if !self.player.is_dead() {
            self.player.regenerate();
        }
        let pos = self.player.pos;
        self.maps[self.active].mark_changed(pos);

        let outcome = self.outcome();
        if let Some(outcome) = outcome {
            self.log.push(LogEvent::RunFinished { outcome });
        }
        outcome
    }

    /// Resolves the player's step; reports whether it moved them onto another map.
    fn move_player(&mut self, direction: Direction) -> bool {
        let from = self.player.pos;
        let to = from + direction.offset();
        match self.maps[self.active].step_player(from, to) {
            PlayerStep::Blocked => false,
            PlayerStep::Moved { pickup } => {
                self.player.pos = to;
                if let Some(item) = pickup {
                    self.collect(item);
                }
                false
            }
            PlayerStep::Attack(enemy) => {
                self.player.mark_interacted();
                let map = self.active;
                if self.maps[map].damage_enemy(enemy, self.player.strength) == Some(true) {
                    self.log.push(LogEvent::EnemyDefeated { map, enemy });
                    if self.maps[map].enemies().is_empty() {
                        let released = self.release_enemy_locks(map);
                        debug!("map {map:?} cleared, {released} hallways released");
                        self.log.push(LogEvent::MapCleared { map });
                    }
                }
                false
            }
            PlayerStep::EnterHallway(pos) => {
                match self.switch_active_map(HallwayRef { map: self.active, pos }) {
                    Ok(_) => true,
                    Err(err) => {
                        debug!("hallway at {pos:?} refused the player: {err}");
                        false
                    }
                }
            }
        }
    }

    fn collect(&mut self, item: Item) {
        match item {
            Item::Key(key) => {
                self.log.push(LogEvent::KeyCollected { lock_id: key.lock_id.clone() });
                let count = self.unlock_hallways(&key.lock_id);
                self.log.push(LogEvent::HallwaysUnlocked { lock_id: key.lock_id.clone(), count });
                self.player.keys.push(key.lock_id);
            }
            Item::WinMarker { .. } => self.victory = true,
        }
    }

    /// Moves the player through `handle` onto the spawn tile beside its paired hallway.
    ///
    /// # Panics
    /// If `handle` is not a hallway or was never paired: generation pairs every hallway it makes.
    pub fn switch_active_map(&mut self, handle: HallwayRef) -> Result<MapId, SwitchError> {
        let Some(hallway) = self.hallway(handle) else {
            panic!("no hallway at {handle:?}");
        };
        let Some(paired) = hallway.paired else {
            panic!("hallway at {handle:?} was never paired");
        };
        assert_eq!(paired.map, hallway.destination, "hallway pair disagrees with its destination");

        if handle.map != self.active {
            return Err(SwitchError::NotOnActiveMap);
        }
        if hallway.is_locked() {
            return Err(SwitchError::Locked);
        }

        let arrival = self
            .hallway(paired)
            .unwrap_or_else(|| panic!("paired hallway {paired:?} is missing"))
            .spawn;
        let pickup = self.maps[paired.map].place_player(arrival)?;

        let from = self.active;
        let old_pos = self.player.pos;
        self.maps[from].remove_player(old_pos);
        for end in [handle, paired] {
            if let Some(hallway) = self.maps[end.map].hallway_mut(end.pos) {
                hallway.used = true;
            }
        }
        self.player.pos = arrival;
        self.active = paired.map;
        self.log.push(LogEvent::MapSwitched { from, to: paired.map });

        if let Some(item) = pickup {
            self.collect(item);
        }
        Ok(paired.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::hallway::ENEMY_LOCK;
    use crate::pathfinding::astar_path;
    use crate::test_support::compact_tree;

    fn first_root_hallway(tree: &MapTree) -> HallwayRef {
        let root = tree.root();
        let pos = tree.map(root).expect("root").child_hallways()[0];
        HallwayRef { map: root, pos }
    }

    #[test]
    fn locked_hallway_refuses_the_switch() {
        let mut tree = compact_tree(2, 5);
        let handle = first_root_hallway(&tree);
        let root = tree.root();
        let hallway = tree.maps[root].hallway_mut(handle.pos).expect("hallway");
        hallway.add_lock("lock-x").expect("fresh");
        let fingerprint = tree.fingerprint();

        assert_eq!(tree.switch_active_map(handle), Err(SwitchError::Locked));
        assert_eq!(tree.active_map_id(), root);
        assert_eq!(tree.fingerprint(), fingerprint);
    }

    #[test]
    fn unlocked_hallway_moves_the_player_to_the_paired_spawn() {
        let mut tree = compact_tree(2, 5);
        let handle = first_root_hallway(&tree);
        let root = tree.root();
        let hallway = tree.hallway(handle).expect("hallway").clone();
        for lock in hallway.locks().map(str::to_string).collect::<Vec<_>>() {
            tree.unlock_hallways(&lock);
        }
        tree.release_enemy_locks(root);
        let old_pos = tree.player().pos;

        let paired = hallway.paired.expect("paired");
        let spawn = tree.hallway(paired).expect("child side").spawn;
        assert_eq!(tree.switch_active_map(handle), Ok(paired.map));
        assert_eq!(tree.active_map_id(), paired.map);
        assert_eq!(tree.player().pos, spawn);
        let root_map = tree.map(root).expect("root");
        assert_eq!(root_map.cell(old_pos), Some(&Cell::Empty { explored: true }));
        assert!(tree.hallway(handle).expect("hallway").used);
        assert!(tree.hallway(paired).expect("child side").used);
        assert!(tree.log().contains(&LogEvent::MapSwitched { from: root, to: paired.map }));

        assert_eq!(tree.switch_active_map(handle), Err(SwitchError::NotOnActiveMap));
    }

    #[test]
    fn walking_into_the_root_hallway_enters_the_child() {
        let mut tree = compact_tree(19, 1);
        let handle = first_root_hallway(&tree);
        let spawn = tree.hallway(handle).expect("hallway").spawn;
        let destination = tree.hallway(handle).expect("hallway").destination;

        let root_map = tree.map(tree.root()).expect("root");
        let path = astar_path(root_map, tree.player().pos, spawn).expect("root is connected");
        for step in path.iter().zip(path.iter().skip(1)) {
            let delta = *step.1 - *step.0;
            let direction = Direction::ALL
                .into_iter()
                .find(|d| d.offset() == delta)
                .expect("unit step");
            tree.update(PlayerAction::Move(direction));
        }
        assert_eq!(tree.player().pos, spawn);
        assert!(!tree.hallway(handle).expect("hallway").has_lock(ENEMY_LOCK));

        tree.update(PlayerAction::Move(Direction::East));
        assert_eq!(tree.active_map_id(), destination);
    }

    #[test]
    fn waiting_lets_a_hunting_enemy_land_blows() {
        let mut tree = compact_tree(30, 10);
        let child = tree.preorder()[1];
        let child_map = tree.map(child).expect("child");
        let (_, enemy) = child_map.enemies().iter().next().expect("child maps hold enemies");
        let enemy_pos = enemy.pos;

        // Drop the player next to the enemy on the child map.
        let beside = enemy_pos
            .neighbors()
            .into_iter()
            .find(|&pos| tree.map(child).expect("child").is_empty_at(pos))
            .expect("enemy has an open neighbor");
        let root = tree.root();
        let old = tree.player.pos;
        tree.maps[root].remove_player(old);
        tree.maps[child].place_player(beside).expect("empty tile");
        tree.player.pos = beside;
        tree.active = child;

        let health = tree.player().health;
        tree.update(PlayerAction::Wait);
        assert!(tree.player().health < health);
        assert!(matches!(tree.log().last(), Some(LogEvent::PlayerDamaged { .. })));
    }

    #[test]
    fn finished_runs_ignore_further_actions() {
        let mut tree = compact_tree(5, 3);
        tree.victory = true;
        let fingerprint = tree.fingerprint();
        assert_eq!(tree.update(PlayerAction::Move(Direction::North)), Some(RunOutcome::Victory));
        assert_eq!(tree.fingerprint(), fingerprint);
    }
}
