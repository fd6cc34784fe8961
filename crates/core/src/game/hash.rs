//! Stable snapshot hashing for deterministic verification.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::Game;

impl Game {
    /// Seed, turn, and the full dungeon fingerprint folded into one value.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);
        hasher.write_u64(self.tree.fingerprint());
        hasher.write_u8(self.tree.difficulty());
        hasher.write_u64(self.tree.log().len() as u64);
        hasher.finish()
    }
}
