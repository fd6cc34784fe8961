//! Starting stats and dungeon dimensions.
//! Loaded once when a dungeon is built; the core treats them as read-only afterwards.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub glyph: char,
    pub max_health: u32,
    pub strength: f64,
    /// Quiet turns before regeneration kicks in.
    pub heal_cooldown: u32,
    pub heal_amount: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self { glyph: 'P', max_health: 10, strength: 1.0, heal_cooldown: 5, heal_amount: 0.2 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub glyph: char,
    pub max_health: u32,
    pub strength: f64,
    pub min_depth: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingStats {
    pub player: PlayerStats,
    pub enemies: Vec<EnemyStats>,
}

impl Default for StartingStats {
    fn default() -> Self {
        Self {
            player: PlayerStats::default(),
            enemies: vec![
                EnemyStats { glyph: 'S', max_health: 3, strength: 0.2, min_depth: 1 },
                EnemyStats { glyph: 'K', max_health: 5, strength: 0.5, min_depth: 2 },
                EnemyStats { glyph: 'Q', max_health: 8, strength: 1.0, min_depth: 4 },
            ],
        }
    }
}

impl StartingStats {
    /// Rounds fractional stats to one decimal, the precision health is tracked at.
    pub fn normalized(mut self) -> Self {
        self.player.strength = round_tenth(self.player.strength);
        self.player.heal_amount = round_tenth(self.player.heal_amount);
        for enemy in &mut self.enemies {
            enemy.strength = round_tenth(enemy.strength);
        }
        self
    }

    /// Archetypes allowed to spawn on a map at `depth`.
    pub fn enemies_for_depth(&self, depth: u8) -> Vec<&EnemyStats> {
        self.enemies.iter().filter(|enemy| enemy.min_depth <= depth).collect()
    }
}

/// Interior dimensions (border excluded) of generated maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonSettings {
    pub root_width: usize,
    pub root_height: usize,
    pub child_width: usize,
    pub child_height: usize,
}

impl Default for DungeonSettings {
    fn default() -> Self {
        Self { root_width: 15, root_height: 20, child_width: 24, child_height: 40 }
    }
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
