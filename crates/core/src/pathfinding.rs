//! Grid search primitives: A* for hostile movement and bounded breadth-first reach.
//! This module exists so navigation rules are shared by generation and the turn loop.
//! It does not decide what an actor does with the step it is handed.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::types::Pos;

/// A grid that can answer whether a tile can be walked through.
pub trait NavGrid {
    fn is_traversable(&self, pos: Pos) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u64,
    y: i32,
    x: i32,
}

/// Shortest 4-connected path from `start` to `goal`, both ends included.
pub fn astar_path(grid: &impl NavGrid, start: Pos, goal: Pos) -> Option<VecDeque<Pos>> {
    if !grid.is_traversable(goal) {
        return None;
    }
    if start == goal {
        return Some(VecDeque::from([start]));
    }

    let mut open_set = BTreeSet::new();
    let mut closed = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let mut seq = 0_u64;

    open_set.insert(OpenNode { f: start.manhattan(goal), seq, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(current) = open_set.pop_first() {
        let p = Pos { y: current.y, x: current.x };
        if !closed.insert(p) {
            continue;
        }
        if p == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        let current_g = *g_score.get(&p).expect("expanded node must have g-score");
        for next in p.neighbors() {
            if closed.contains(&next) || !grid.is_traversable(next) {
                continue;
            }
            let tentative = current_g + 1;
            if g_score.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            g_score.insert(next, tentative);
            came_from.insert(next, p);
            seq += 1;
            open_set.insert(OpenNode {
                f: tentative + next.manhattan(goal),
                seq,
                y: next.y,
                x: next.x,
            });
        }
    }
    None
}

fn reconstruct_path(came: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> VecDeque<Pos> {
    let mut p = goal;
    let mut path = VecDeque::from([p]);
    while p != start {
        p = *came.get(&p).expect("path must be reconstructible");
        path.push_front(p);
    }
    path
}

/// Graph distance from the nearest origin for every traversable tile within `radius` steps.
pub fn distances_within(grid: &impl NavGrid, origins: &[Pos], radius: u32) -> BTreeMap<Pos, u32> {
    let mut distances = BTreeMap::new();
    let mut queue = VecDeque::new();
    for &origin in origins {
        if distances.insert(origin, 0).is_none() {
            queue.push_back(origin);
        }
    }

    while let Some(current) = queue.pop_front() {
        let distance = distances[&current];
        if distance >= radius {
            continue;
        }
        for next in current.neighbors() {
            if grid.is_traversable(next) && !distances.contains_key(&next) {
                distances.insert(next, distance + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}

/// Per-actor path cache; re-plans only when the target moves or the path runs out.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    current_target: Option<Pos>,
    current_path: VecDeque<Pos>,
}

impl Pathfinder {
    pub fn current_target(&self) -> Option<Pos> {
        self.current_target
    }

    pub fn current_path(&self) -> &VecDeque<Pos> {
        &self.current_path
    }

    pub fn invalidate(&mut self) {
        self.current_path.clear();
    }

    /// Next tile to step into from `current` while chasing `target`, if any.
    pub fn choose_move(&mut self, grid: &impl NavGrid, current: Pos, target: Pos) -> Option<Pos> {
        if self.current_target != Some(target) || self.current_path.is_empty() {
            self.current_target = Some(target);
            self.current_path = astar_path(grid, current, target).unwrap_or_default();
        }

        let mut next = self.current_path.pop_front()?;
        if next == current {
            next = self.current_path.pop_front()?;
        }
        if next.manhattan(current) > 1 {
            self.current_path.clear();
            return None;
        }
        Some(next)
    }
}
