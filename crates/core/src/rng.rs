//! Seeded random source threaded through generation and per-turn decisions.
//! Every caller receives the generator explicitly so a fixed seed replays the same dungeon.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform integer in `min..max_exclusive`.
    pub fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32 {
        debug_assert!(min < max_exclusive, "empty range {min}..{max_exclusive}");
        let span = max_exclusive.abs_diff(min) as u64;
        min + (self.inner.next_u64() % span) as i32
    }

    /// Uniform index in `0..len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty collection");
        (self.inner.next_u64() % len as u64) as usize
    }

    pub fn coin_flip(&mut self) -> bool {
        self.inner.next_u64() & 1 == 0
    }
}
