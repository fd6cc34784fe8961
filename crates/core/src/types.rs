use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct MapId;
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cardinal neighbours in north, east, south, west order.
    pub fn neighbors(self) -> [Pos; 4] {
        Direction::ALL.map(|direction| self + direction.offset())
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos { y: self.y + rhs.y, x: self.x + rhs.x }
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos { y: self.y - rhs.y, x: self.x - rhs.x }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub const fn offset(self) -> Pos {
        match self {
            Direction::North => Pos { y: -1, x: 0 },
            Direction::East => Pos { y: 0, x: 1 },
            Direction::South => Pos { y: 1, x: 0 },
            Direction::West => Pos { y: 0, x: -1 },
        }
    }

    /// Bit used by the wall glyph table.
    pub const fn mask(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 8,
        }
    }
}

/// Console palette understood by the external draw loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Gray,
    DarkGray,
    Yellow,
    Magenta,
    Red,
    DarkRed,
    DarkGreen,
    DarkCyan,
    DarkYellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    Move(Direction),
    Wait,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    MapSwitched { from: MapId, to: MapId },
    KeyCollected { lock_id: String },
    HallwaysUnlocked { lock_id: String, count: usize },
    EnemyDefeated { map: MapId, enemy: EntityId },
    MapCleared { map: MapId },
    PlayerDamaged { amount: f64, health: f64 },
    RunFinished { outcome: RunOutcome },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnResult {
    pub turn: u64,
    pub outcome: Option<RunOutcome>,
}
