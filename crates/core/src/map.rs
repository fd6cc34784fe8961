//! One rectangular dungeon level: its cell grid, hallways, and resident hostiles.
//!
//! Generation lives in `carve`, doorway placement in `doors`, item and enemy
//! placement in `placement`, and per-turn actor movement in `actors`.

mod actors;
mod carve;
mod doors;
mod placement;

use std::collections::BTreeSet;
use std::mem::discriminant;

use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::actor::{Enemy, Player};
use crate::cell::{Cell, Key, Occupant, RenderCell};
use crate::hallway::Hallway;
use crate::pathfinding::NavGrid;
use crate::types::{Color, Direction, EntityId, MapId, Pos};

pub use actors::{EnemyHit, PlayerStep};

#[derive(Clone, Debug)]
pub struct Map {
    id: MapId,
    depth: u8,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    changed: Vec<bool>,
    parent: Option<Pos>,
    children: Vec<Pos>,
    enemies: SlotMap<EntityId, Enemy>,
}

impl Map {
    /// Walled rectangle with an open interior of `width` by `height` tiles.
    fn bordered(id: MapId, width: usize, height: usize, depth: u8) -> Self {
        let (width, height) = (width + 2, height + 2);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                cells.push(if border { Cell::wall() } else { Cell::EMPTY });
            }
        }
        Self {
            id,
            depth,
            width,
            height,
            cells,
            changed: vec![true; width * height],
            parent: None,
            children: Vec::new(),
            enemies: SlotMap::with_key(),
        }
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Full grid width, border included.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn interior_area(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && (pos.x as usize) < self.width - 1
            && (pos.y as usize) < self.height - 1
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        let idx = self.index(pos)?;
        self.changed[idx] = true;
        Some(&mut self.cells[idx])
    }

    /// Replaces the cell at `pos` and flags it for redraw. Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        if let Some(slot) = self.cell_mut(pos) {
            *slot = cell;
        }
    }

    pub fn mark_changed(&mut self, pos: Pos) {
        if let Some(idx) = self.index(pos) {
            self.changed[idx] = true;
        }
    }

    /// Row-major iterator over every grid position.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos::new(x, y)))
    }

    pub fn is_wall_at(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(Cell::is_wall)
    }

    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(Cell::is_empty)
    }

    /// Cardinal neighbours that are walls; off-grid neighbours count as walls.
    pub fn adjacent_walls(&self, pos: Pos) -> usize {
        pos.neighbors()
            .into_iter()
            .filter(|&next| self.cell(next).is_none_or(Cell::is_wall))
            .count()
    }

    /// All eight surrounding cells that are walls; off-grid cells count as walls.
    pub fn surrounding_walls(&self, pos: Pos) -> usize {
        surrounding(pos).filter(|&next| self.cell(next).is_none_or(Cell::is_wall)).count()
    }

    /// Every cell of the same kind as `start` reachable through 4-connected steps.
    pub fn connected_region(&self, start: Pos) -> BTreeSet<Pos> {
        let Some(origin) = self.cell(start) else {
            panic!("connected region seed {start:?} lies outside the grid");
        };
        let kind = discriminant(origin);

        let mut region = BTreeSet::from([start]);
        let mut frontier = vec![start];
        while let Some(current) = frontier.pop() {
            for next in current.neighbors() {
                let same_kind = self.cell(next).is_some_and(|cell| discriminant(cell) == kind);
                if same_kind && region.insert(next) {
                    frontier.push(next);
                }
            }
        }
        region
    }

    pub fn hallway(&self, pos: Pos) -> Option<&Hallway> {
        self.cell(pos).and_then(Cell::as_hallway)
    }

    pub fn hallway_mut(&mut self, pos: Pos) -> Option<&mut Hallway> {
        match self.cell_mut(pos)? {
            Cell::Hallway(hallway) => Some(hallway),
            _ => None,
        }
    }

    /// Position of the hallway back towards the root, if this map has one.
    pub fn parent_hallway(&self) -> Option<Pos> {
        self.parent
    }

    pub fn child_hallways(&self) -> &[Pos] {
        &self.children
    }

    pub fn enemies(&self) -> &SlotMap<EntityId, Enemy> {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn keys(&self) -> Vec<(Pos, &Key)> {
        self.positions()
            .filter_map(|pos| match self.cell(pos) {
                Some(Cell::Key(key)) => Some((pos, key)),
                Some(Cell::Actor(Occupant::Enemy(id))) => match &self.enemies.get(*id)?.underfoot {
                    Cell::Key(key) => Some((pos, key)),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    pub fn find_player(&self) -> Option<Pos> {
        self.positions().find(|&pos| matches!(self.cell(pos), Some(Cell::Actor(Occupant::Player))))
    }

    /// What the draw loop shows at `pos`; `None` off the grid.
    pub fn render_cell(&self, pos: Pos, player: &Player) -> Option<RenderCell> {
        let cell = self.cell(pos)?;
        let rendered = match cell {
            Cell::Actor(Occupant::Player) => {
                RenderCell { glyph: player.glyph, color: player.color(), visible: true }
            }
            Cell::Actor(Occupant::Enemy(id)) => {
                let glyph = self.enemies.get(*id).map_or('?', |enemy| enemy.glyph);
                RenderCell { glyph, color: Color::Red, visible: true }
            }
            terrain => RenderCell {
                glyph: terrain.terrain_glyph(),
                color: terrain.terrain_color(),
                visible: terrain.is_visible(),
            },
        };
        Some(rendered)
    }

    /// Drains the redraw set in row-major order.
    pub fn take_changed(&mut self) -> Vec<Pos> {
        let changed: Vec<Pos> = self
            .positions()
            .zip(self.changed.iter())
            .filter_map(|(pos, &dirty)| dirty.then_some(pos))
            .collect();
        self.changed.fill(false);
        changed
    }

    /// Stable byte rendering of the grid and its hostiles, used for fingerprints.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.cells.len() * 2 + 16);
        bytes.extend_from_slice(&(self.width as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.height as u32).to_le_bytes());
        bytes.push(self.depth);
        for cell in &self.cells {
            encode_cell(&mut bytes, cell);
        }
        for enemy in self.enemies.values() {
            bytes.extend_from_slice(&enemy.pos.x.to_le_bytes());
            bytes.extend_from_slice(&enemy.pos.y.to_le_bytes());
            bytes.extend_from_slice(&enemy.health.to_bits().to_le_bytes());
            bytes.push(u8::from(enemy.attracted));
        }
        bytes
    }

    pub fn content_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(&self.canonical_bytes());
        hasher.digest()
    }

    /// Recomputes wall visibility within `radius` of `center`, then glyphs one ring further out.
    fn refresh_walls_near(&mut self, center: Pos, radius: i32) {
        let visibility: Vec<Pos> = square(center, radius).collect();
        self.refresh_wall_visibility(&visibility);
        let glyphs: Vec<Pos> = square(center, radius + 1).collect();
        self.refresh_wall_glyphs(&glyphs);
    }

    fn refresh_all_walls(&mut self) {
        let all: Vec<Pos> = self.positions().collect();
        self.refresh_wall_visibility(&all);
        self.refresh_wall_glyphs(&all);
    }

    fn refresh_wall_visibility(&mut self, positions: &[Pos]) {
        for &pos in positions {
            let hidden = self.surrounding_walls(pos) == 8;
            if let Some(Cell::Wall(wall)) = self.cell_mut(pos) {
                wall.visible = !hidden;
            }
        }
    }

    fn refresh_wall_glyphs(&mut self, positions: &[Pos]) {
        for &pos in positions {
            if !self.is_wall_at(pos) {
                continue;
            }
            let mask = Direction::ALL
                .into_iter()
                .filter(|direction| {
                    matches!(self.cell(pos + direction.offset()), Some(Cell::Wall(w)) if w.visible)
                })
                .fold(0_u8, |mask, direction| mask | direction.mask());
            if let Some(Cell::Wall(wall)) = self.cell_mut(pos) {
                wall.mask = mask;
            }
        }
    }
}

impl NavGrid for Map {
    fn is_traversable(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|cell| !cell.is_obstacle())
    }
}

fn surrounding(pos: Pos) -> impl Iterator<Item = Pos> {
    square(pos, 1).filter(move |&next| next != pos)
}

fn square(center: Pos, radius: i32) -> impl Iterator<Item = Pos> {
    (-radius..=radius)
        .flat_map(move |dy| (-radius..=radius).map(move |dx| center + Pos { y: dy, x: dx }))
}

fn encode_cell(bytes: &mut Vec<u8>, cell: &Cell) {
    match cell {
        Cell::Empty { explored } => bytes.extend_from_slice(&[0, u8::from(*explored)]),
        Cell::Wall(wall) => {
            bytes.extend_from_slice(&[1, wall.mask | (u8::from(wall.visible) << 4)]);
        }
        Cell::Hallway(hallway) => {
            let flags = u8::from(hallway.is_parent_side) | (u8::from(hallway.used) << 1);
            bytes.extend_from_slice(&[2, flags]);
            for lock in hallway.locks() {
                bytes.extend_from_slice(lock.as_bytes());
                bytes.push(0);
            }
        }
        Cell::Key(key) => {
            bytes.extend_from_slice(&[3, u8::from(key.hidden)]);
            bytes.extend_from_slice(key.lock_id.as_bytes());
            bytes.push(0);
        }
        Cell::WinMarker { hidden } => bytes.extend_from_slice(&[4, u8::from(*hidden)]),
        Cell::Actor(Occupant::Player) => bytes.extend_from_slice(&[5, 0]),
        Cell::Actor(Occupant::Enemy(_)) => bytes.extend_from_slice(&[5, 1]),
    }
}
