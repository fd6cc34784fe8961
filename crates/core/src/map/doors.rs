//! Cutting hallway openings into a map's side borders.

use log::trace;

use super::Map;
use crate::cell::Cell;
use crate::error::HallwayError;
use crate::hallway::{Hallway, inward_shift};
use crate::rng::GameRng;
use crate::types::{Direction, MapId, Pos};

impl Map {
    /// Opens a hallway towards `destination` and returns its cell.
    ///
    /// Parent-side hallways go into the right border, child-side ones into the left.
    /// Rows are tried cyclically from a random start; within a row the search walks
    /// inward through solid wall until it reaches a wall cell that faces open floor.
    pub fn create_hallway(
        &mut self,
        destination: MapId,
        is_parent_side: bool,
        rng: &mut GameRng,
    ) -> Result<Pos, HallwayError> {
        if !is_parent_side && self.parent.is_some() {
            return Err(HallwayError::ParentAlreadySet);
        }
        let rows = self.height as i32 - 2;
        if rows <= 0 {
            return Err(HallwayError::NoOpening);
        }

        let shift = inward_shift(is_parent_side);
        let border_x = if is_parent_side { self.width as i32 - 1 } else { 0 };
        let first_row = rng.next_int(1, self.height as i32 - 1);

        let opening = (0..rows)
            .map(|offset| 1 + (first_row - 1 + offset) % rows)
            .find_map(|y| self.opening_in_row(Pos::new(border_x, y), shift))
            .ok_or(HallwayError::NoOpening)?;

        self.set_cell(opening, Cell::Hallway(Hallway::new(opening, destination, is_parent_side)));
        if is_parent_side {
            self.children.push(opening);
        } else {
            self.parent = Some(opening);
        }
        self.refresh_walls_near(opening, 1);
        trace!("hallway to {destination:?} opened at {opening:?}");
        Ok(opening)
    }

    fn opening_in_row(&self, border: Pos, shift: Pos) -> Option<Pos> {
        let mut pos = border;
        loop {
            let inward = pos + shift;
            if !self.is_interior(inward) {
                return None;
            }
            if self.is_empty_at(inward) && self.is_walled_vertically(pos) {
                return Some(pos);
            }
            if !self.is_walled_vertically(inward) {
                return None;
            }
            pos = inward;
        }
    }

    /// True when `pos` and the cells directly above and below it are all walls.
    fn is_walled_vertically(&self, pos: Pos) -> bool {
        self.is_wall_at(pos)
            && self.is_wall_at(pos + Direction::North.offset())
            && self.is_wall_at(pos + Direction::South.offset())
    }
}
