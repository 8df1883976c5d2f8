//! Injectable randomness for dice and turn order.
//!
//! The server is the only authority on randomness; clients never send a
//! die value. Rooms receive a boxed [`RandomSource`] so tests can replace
//! the entropy-seeded generator with a fixed script.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use skyrace_protocol::PlayerId;

/// Source of die rolls and turn-order permutations.
pub trait RandomSource: Send + 'static {
    /// A die roll, uniformly in `1..=6` for real sources.
    fn roll_die(&mut self) -> u8;

    /// Permutes `players` in place to fix the turn order.
    fn shuffle(&mut self, players: &mut [PlayerId]);
}

/// A [`RandomSource`] over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + 'static> RandomSource for RngSource<R> {
    fn roll_die(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }

    fn shuffle(&mut self, players: &mut [PlayerId]) {
        players.shuffle(&mut self.rng);
    }
}

/// Replays a fixed die sequence (cycling when exhausted) and leaves turn
/// order as seated.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    rolls: Vec<u8>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        let mut rolls: Vec<u8> = rolls.into_iter().collect();
        if rolls.is_empty() {
            rolls.push(1);
        }
        Self { rolls, cursor: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn roll_die(&mut self) -> u8 {
        let die = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        die
    }

    fn shuffle(&mut self, _players: &mut [PlayerId]) {}
}
