//! Wall-segment carving and the cleanup passes that follow it.

use std::collections::BTreeSet;

use log::trace;

use super::Map;
use crate::cell::Cell;
use crate::rng::GameRng;
use crate::types::{MapId, Pos};

/// A segment shorter than this is discarded.
const MIN_SEGMENT_WALLS: usize = 4;

impl Map {
    /// Builds a bordered map with a `width` by `height` interior, carves
    /// `wall_segments` attempts of straight walls into it, and leaves one open region.
    pub fn generate(
        id: MapId,
        width: usize,
        height: usize,
        depth: u8,
        wall_segments: usize,
        rng: &mut GameRng,
    ) -> Self {
        let mut map = Map::bordered(id, width, height, depth);
        let max_walls = map.width.min(map.height).saturating_sub(3);

        let mut committed = 0_usize;
        for _ in 0..wall_segments {
            if map.carve_wall_segment(max_walls, rng) {
                committed += 1;
            }
        }
        trace!("map at depth {depth}: {committed}/{wall_segments} wall segments committed");

        while map.fill_diagonal_gaps(rng) {}
        map.fill_isolated_regions();
        map.refresh_all_walls();
        map.changed.fill(true);
        map
    }

    fn random_pos(&self, rng: &mut GameRng) -> Pos {
        Pos::new(rng.next_int(0, self.width as i32), rng.next_int(0, self.height as i32))
    }

    fn is_wall_with(&self, draft: &[Pos], pos: Pos) -> bool {
        self.is_wall_at(pos) || draft.contains(&pos)
    }

    fn is_empty_with(&self, draft: &[Pos], pos: Pos) -> bool {
        self.is_empty_at(pos) && !draft.contains(&pos)
    }

    /// In-grid cardinal neighbours of `pos` that are walls or drafted walls.
    fn wall_neighbors_with(&self, draft: &[Pos], pos: Pos) -> usize {
        pos.neighbors()
            .into_iter()
            .filter(|&next| self.in_bounds(next) && self.is_wall_with(draft, next))
            .count()
    }

    /// Finds a wall with fewer than four wall neighbours, or failing that an open
    /// tile to turn into one. The second case pushes the new wall into `draft`.
    fn segment_start(&self, draft: &mut Vec<Pos>, rng: &mut GameRng) -> Option<Pos> {
        let passes = self.width * self.height;
        for _ in 0..passes {
            let pos = self.random_pos(rng);
            if self.is_wall_at(pos) && self.adjacent_walls(pos) < 4 {
                return Some(pos);
            }
        }
        for _ in 0..passes {
            let pos = self.random_pos(rng);
            if self.is_empty_at(pos) && self.adjacent_walls(pos) < 4 {
                draft.push(pos);
                return Some(pos);
            }
        }
        None
    }

    /// Grows one straight wall run and commits it only if it reached the minimum length.
    fn carve_wall_segment(&mut self, max_walls: usize, rng: &mut GameRng) -> bool {
        let mut draft = Vec::new();
        let Some(start) = self.segment_start(&mut draft, rng) else {
            return false;
        };

        let open: Vec<Pos> = start
            .neighbors()
            .into_iter()
            .filter(|&next| self.is_empty_with(&draft, next))
            .collect();
        if open.is_empty() {
            return false;
        }
        let first = open[rng.pick_index(open.len())];
        if self.wall_neighbors_with(&draft, first) > 1 {
            return false;
        }
        draft.push(first);

        let step = first - start;
        let mut tip = first;
        while draft.len() < max_walls {
            let count = draft.len();
            if count >= MIN_SEGMENT_WALLS && rng.next_int(0, max_walls as i32) < count as i32 {
                break;
            }
            let next = tip + step;
            if !self.is_empty_with(&draft, next) {
                break;
            }
            match self.wall_neighbors_with(&draft, next) {
                1 => {
                    draft.push(next);
                    tip = next;
                }
                2 => {
                    draft.push(next);
                    break;
                }
                _ => break,
            }
        }

        if draft.len() < MIN_SEGMENT_WALLS {
            return false;
        }
        for pos in draft {
            self.set_cell(pos, Cell::wall());
        }
        true
    }

    /// Closes checkerboard 2x2 blocks so no two open tiles touch only at a corner.
    /// A fill can complete a block already scanned, so callers repeat until this returns false.
    fn fill_diagonal_gaps(&mut self, rng: &mut GameRng) -> bool {
        let mut filled = false;
        for y in 0..(self.height as i32 - 1) {
            for x in 0..(self.width as i32 - 1) {
                let top_left = Pos::new(x, y);
                let top_right = Pos::new(x + 1, y);
                let bottom_left = Pos::new(x, y + 1);
                let bottom_right = Pos::new(x + 1, y + 1);

                let falling = self.is_wall_at(top_left)
                    && self.is_empty_at(top_right)
                    && self.is_empty_at(bottom_left)
                    && self.is_wall_at(bottom_right);
                let rising = self.is_empty_at(top_left)
                    && self.is_wall_at(top_right)
                    && self.is_wall_at(bottom_left)
                    && self.is_empty_at(bottom_right);

                if falling {
                    let fill = if rng.coin_flip() { top_right } else { bottom_left };
                    self.set_cell(fill, Cell::wall());
                    filled = true;
                } else if rising {
                    let fill = if rng.coin_flip() { top_left } else { bottom_right };
                    self.set_cell(fill, Cell::wall());
                    filled = true;
                }
            }
        }
        filled
    }

    /// Keeps one open region and walls up the rest. A region larger than half the
    /// interior wins outright; otherwise the largest one found first survives.
    fn fill_isolated_regions(&mut self) {
        let mut unvisited: BTreeSet<Pos> =
            self.positions().filter(|&pos| self.is_empty_at(pos)).collect();
        let half = self.interior_area() / 2;

        let mut keep: Option<BTreeSet<Pos>> = None;
        while let Some(&seed) = unvisited.first() {
            let region = self.connected_region(seed);
            for pos in &region {
                unvisited.remove(pos);
            }
            if region.len() > half {
                keep = Some(region);
                break;
            }
            if keep.as_ref().is_none_or(|best| region.len() > best.len()) {
                keep = Some(region);
            }
        }

        let Some(keep) = keep else {
            return;
        };
        let doomed: Vec<Pos> =
            self.positions().filter(|&pos| self.is_empty_at(pos) && !keep.contains(&pos)).collect();
        if !doomed.is_empty() {
            trace!("walling up {} tiles outside the main region", doomed.len());
        }
        for pos in doomed {
            self.set_cell(pos, Cell::wall());
        }
    }
}
