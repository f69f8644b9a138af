//! Seeded RNG for dice rolls and deck shuffles.
//!
//! Every source of randomness in the engine goes through `MatchRng` so that
//! matches are reproducible for tests and so reconnecting clients never
//! observe divergent outcomes from a replay. Mulberry32 is used for its
//! small state and well-tested bit pattern.

use serde::{Deserialize, Serialize};

/// Per-match RNG state. Cheap to copy, serializable so it can travel with a
/// persisted match snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRng {
    seed: u32,
    counter: u32,
}

impl MatchRng {
    /// Create an RNG from an explicit seed. Tests use this to reproduce a
    /// fixed die-roll sequence.
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next uniform value in [0, 1).
    fn next_f64(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        mulberry32(self.seed.wrapping_add(self.counter))
    }

    /// Uniform integer in [min, max] inclusive.
    fn next_int(&mut self, min: u32, max: u32) -> u32 {
        let value = self.next_f64();
        min + (value * (max - min + 1) as f64) as u32
    }

    /// The attack-resolution die roll: a uniform integer on [1, 10]
    ///.
    pub fn roll_d10(&mut self) -> u32 {
        self.next_int(1, 10)
    }

    /// Fisher-Yates shuffle used to randomize decks at match start.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let value = self.next_f64();
            let j = (value * (i + 1) as f64) as usize;
            slice.swap(i, j);
        }
    }
}

fn mulberry32(input: u32) -> f64 {
    let mut t: i32 = input.wrapping_add(0x6D2B79F5) as i32;

    let lhs = ((t as u32) ^ ((t as u32) >> 15)) as i32;
    let rhs = t | 1;
    t = lhs.wrapping_mul(rhs);

    let lhs2 = ((t as u32) ^ ((t as u32) >> 7)) as i32;
    let rhs2 = t | 61;
    let mul = lhs2.wrapping_mul(rhs2);
    t ^= t.wrapping_add(mul);

    let result = (t as u32) ^ ((t as u32) >> 14);
    result as f64 / 4294967296.0
}
