//! Player and hostile actor state.

use crate::cell::Cell;
use crate::content::{EnemyStats, PlayerStats, round_tenth};
use crate::pathfinding::Pathfinder;
use crate::types::{Color, EntityId, Pos};

const EXPLORE_RANGE: u32 = 3;
const ATTRACT_RANGE: u32 = 10;

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub pos: Pos,
    pub health: f64,
    pub max_health: f64,
    pub strength: f64,
    pub glyph: char,
    pub explore_range: u32,
    pub attract_range: u32,
    pub is_healing: bool,
    pub keys: Vec<String>,
    heal_cooldown_max: u32,
    heal_cooldown: u32,
    heal_amount: f64,
    interacted: bool,
}

impl Player {
    pub fn new(name: &str, stats: &PlayerStats) -> Self {
        let max_health = f64::from(stats.max_health);
        Self {
            name: name.to_string(),
            pos: Pos::default(),
            health: max_health,
            max_health,
            strength: stats.strength,
            glyph: stats.glyph,
            explore_range: EXPLORE_RANGE,
            attract_range: ATTRACT_RANGE,
            is_healing: false,
            keys: Vec::new(),
            heal_cooldown_max: stats.heal_cooldown,
            heal_cooldown: stats.heal_cooldown,
            heal_amount: stats.heal_amount,
            interacted: false,
        }
    }

    pub fn take_damage(&mut self, amount: f64) {
        self.health = damaged(self.health, amount);
        self.interacted = true;
    }

    /// Attacking counts as an interaction and resets regeneration.
    pub fn mark_interacted(&mut self) {
        self.interacted = true;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// End-of-turn regeneration: interactions reset the cooldown, quiet turns count it down.
    pub fn regenerate(&mut self) {
        if self.interacted {
            self.heal_cooldown = self.heal_cooldown_max;
            self.interacted = false;
            self.is_healing = false;
            return;
        }

        if self.heal_cooldown > 0 {
            self.heal_cooldown -= 1;
        } else if self.health < self.max_health {
            self.is_healing = true;
            self.health = round_tenth((self.health + self.heal_amount).min(self.max_health));
        } else {
            self.is_healing = false;
        }
    }

    pub fn color(&self) -> Color {
        if self.health >= self.max_health {
            Color::DarkCyan
        } else if self.is_healing {
            Color::DarkYellow
        } else if self.health > self.max_health / 4.0 {
            Color::DarkGreen
        } else {
            Color::DarkRed
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Pos,
    pub health: f64,
    pub max_health: f64,
    pub strength: f64,
    pub glyph: char,
    /// Only attracted enemies hunt the player.
    pub attracted: bool,
    /// Floor or item the enemy is standing on, restored when it leaves.
    pub underfoot: Cell,
    pub pathfinder: Pathfinder,
}

impl Enemy {
    pub fn new(pos: Pos, stats: &EnemyStats) -> Self {
        let max_health = f64::from(stats.max_health);
        Self {
            id: EntityId::default(),
            pos,
            health: max_health,
            max_health,
            strength: stats.strength,
            glyph: stats.glyph,
            attracted: false,
            underfoot: Cell::EMPTY,
            pathfinder: Pathfinder::default(),
        }
    }

    pub fn take_damage(&mut self, amount: f64) {
        self.health = damaged(self.health, amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

fn damaged(health: f64, amount: f64) -> f64 {
    if health - amount < 0.0 { 0.0 } else { round_tenth(health - amount) }
}
