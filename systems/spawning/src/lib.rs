#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn draw sources that feed the world's turn resolution.
//!
//! The spawn draw is the only nondeterministic step of a turn. The world asks a
//! [`SpawnSource`] for a pending attacker index and a row; everything else is a
//! pure function of board state. [`SeededSpawner`] draws uniformly from a seeded
//! ChaCha stream so a seed fully determines a playthrough, while
//! [`ScriptedSpawns`] replays a fixed list so tests can force specific draws.

use std::collections::VecDeque;

use lane_defence_core::{SpawnDraw, SpawnSource};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SPAWN_SEED: u64 = 0x4d59_5df4_d0f3_3173;

/// Configuration parameters required to construct the seeded spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed the spawner stream starts from.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_SEED)
    }
}

/// Spawn source that draws attacker and row uniformly from a seeded stream.
#[derive(Debug)]
pub struct SeededSpawner {
    rng: ChaCha8Rng,
}

impl SeededSpawner {
    /// Creates a new seeded spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }
}

impl SpawnSource for SeededSpawner {
    fn draw(&mut self, pending: usize, rows: u32) -> SpawnDraw {
        debug_assert!(pending > 0, "draw requires a pending attacker");
        debug_assert!(rows > 0, "draw requires at least one row");
        let pending_index = self.rng.gen_range(0..pending.max(1));
        let row = self.rng.gen_range(0..rows.max(1));
        SpawnDraw::new(pending_index, row)
    }
}

/// Spawn source that replays a fixed sequence of draws.
///
/// Draws are clamped into range so a script written for a longer queue stays
/// valid. Once the script runs out, the first pending attacker enters row zero.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSpawns {
    draws: VecDeque<SpawnDraw>,
}

impl ScriptedSpawns {
    /// Creates a scripted source from the provided draws.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = SpawnDraw>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Number of scripted draws that have not been consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl SpawnSource for ScriptedSpawns {
    fn draw(&mut self, pending: usize, rows: u32) -> SpawnDraw {
        let draw = self.draws.pop_front().unwrap_or(SpawnDraw::new(0, 0));
        SpawnDraw::new(
            draw.pending_index.min(pending.saturating_sub(1)),
            draw.row.min(rows.saturating_sub(1)),
        )
    }
}
