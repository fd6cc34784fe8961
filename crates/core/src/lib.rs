pub mod actor;
pub mod cell;
pub mod content;
pub mod error;
pub mod game;
pub mod hallway;
pub mod map;
pub mod pathfinding;
pub mod rng;
pub mod tree;
pub mod types;

#[cfg(test)]
mod test_support;

pub use actor::{Enemy, Player};
pub use cell::{Cell, Item, Key, Occupant, RenderCell, Wall};
pub use content::{DungeonSettings, EnemyStats, PlayerStats, StartingStats};
pub use error::{HallwayError, KeyPlacementError, LockError, SwitchError};
pub use game::Game;
pub use hallway::{ENEMY_LOCK, Hallway, HallwayRef};
pub use map::{EnemyHit, Map, PlayerStep};
pub use pathfinding::{NavGrid, Pathfinder};
pub use rng::GameRng;
pub use tree::MapTree;
pub use types::*;
