//! Grid cell variants. Every slot of a map grid holds exactly one of these.

use crate::hallway::Hallway;
use crate::types::{Color, EntityId};

pub const EMPTY_GLYPH: char = '.';

/// Wall glyphs indexed by the N=1, E=2, S=4, W=8 neighbour mask.
pub const WALL_GLYPHS: [char; 16] = [
    '■', '║', '═', '╚', '║', '║', '╔', '╠', '═', '╝', '═', '╩', '╗', '╣', '╦', '╬',
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    pub visible: bool,
    pub mask: u8,
}

impl Wall {
    pub const fn new() -> Self {
        Self { visible: true, mask: 0 }
    }

    pub fn glyph(self) -> char {
        WALL_GLYPHS[usize::from(self.mask & 0x0F)]
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub lock_id: String,
    pub hidden: bool,
}

/// Things that can be stood on and get covered by a passing enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Key(Key),
    WinMarker { hidden: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    Player,
    Enemy(EntityId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty { explored: bool },
    Wall(Wall),
    Hallway(Hallway),
    Key(Key),
    WinMarker { hidden: bool },
    Actor(Occupant),
}

impl Cell {
    pub const EMPTY: Cell = Cell::Empty { explored: false };

    pub const fn wall() -> Self {
        Cell::Wall(Wall::new())
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty { .. })
    }

    /// Walls and hallways block movement and line every search; everything else is floor.
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Wall(_) | Cell::Hallway(_))
    }

    pub fn as_hallway(&self) -> Option<&Hallway> {
        match self {
            Cell::Hallway(hallway) => Some(hallway),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<Item> {
        match self {
            Cell::Key(key) => Some(Item::Key(key.clone())),
            Cell::WinMarker { hidden } => Some(Item::WinMarker { hidden: *hidden }),
            _ => None,
        }
    }

    pub fn from_item(item: Item) -> Self {
        match item {
            Item::Key(key) => Cell::Key(key),
            Item::WinMarker { hidden } => Cell::WinMarker { hidden },
        }
    }

    /// Terrain-only visibility; actors and items are always drawn.
    pub fn is_visible(&self) -> bool {
        match self {
            Cell::Wall(wall) => wall.visible,
            _ => true,
        }
    }

    /// Glyph for every variant except actors, whose look lives on the actor.
    pub fn terrain_glyph(&self) -> char {
        match self {
            Cell::Empty { .. } => EMPTY_GLYPH,
            Cell::Wall(wall) => wall.glyph(),
            Cell::Hallway(hallway) => hallway.glyph(),
            Cell::Key(key) if key.hidden => EMPTY_GLYPH,
            Cell::Key(_) => '!',
            Cell::WinMarker { hidden: true } => EMPTY_GLYPH,
            Cell::WinMarker { hidden: false } => '%',
            Cell::Actor(_) => '?',
        }
    }

    pub fn terrain_color(&self) -> Color {
        match self {
            Cell::Empty { explored: true } => Color::DarkGray,
            Cell::Empty { explored: false } => Color::Gray,
            Cell::Wall(_) => Color::White,
            Cell::Hallway(hallway) => hallway.color(),
            Cell::Key(key) if key.hidden => Color::Gray,
            Cell::Key(_) => Color::Yellow,
            Cell::WinMarker { hidden: true } => Color::DarkGray,
            Cell::WinMarker { hidden: false } => Color::Magenta,
            Cell::Actor(_) => Color::White,
        }
    }
}

/// What the external draw loop reads for one grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCell {
    pub glyph: char,
    pub color: Color,
    pub visible: bool,
}
