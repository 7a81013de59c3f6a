// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

use crate::config::Config;

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a `LevelGenerator`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a random level for a new node in the range `[0, total)`, given
    /// the list's current `height`.
    ///
    /// This must never return a level that is `>= self.total()`.
    fn random(&mut self, height: usize) -> usize;
}

/// A level generator which will produce geometrically distributed numbers.
///
/// The probability of generating level `n` is `p` times the probability of
/// generating level `n-1`, truncated at the maximum number of levels allowed.
///
/// Growth stops as soon as the drawn level exceeds the list's current height:
/// a node one level above everything else already gets a level to itself, so
/// climbing further buys nothing until that level fills up. The tail of the
/// distribution is therefore clipped while the list is short.
#[derive(Debug, Clone)]
pub struct GeometricalLevelGenerator<R = SmallRng> {
    total: usize,
    p: f64,
    rng: R,
}

impl GeometricalLevelGenerator<SmallRng> {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// # Panics
    ///
    /// `p` must be between 0 and 1 and will panic otherwise.  Similarly,
    /// `total` must be at greater or equal to 1.
    pub fn new(total: usize, p: f64) -> Self {
        Self::with_rng(total, p, SmallRng::from_entropy())
    }

    /// Same as [`GeometricalLevelGenerator::new`], but reproducible.
    pub fn seeded(total: usize, p: f64, seed: u64) -> Self {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    /// Build a generator from an already validated [`Config`].
    pub fn from_config(config: &Config) -> Self {
        match config.seed() {
            | Some(seed) => Self::seeded(config.max_height(), config.promotion_probability(), seed),
            | None => Self::new(config.max_height(), config.promotion_probability()),
        }
    }
}

impl<R: Rng> GeometricalLevelGenerator<R> {
    pub fn with_rng(total: usize, p: f64, rng: R) -> Self {
        if total == 0 {
            panic!("total must be non-zero.");
        }
        if !(p > 0.0 && p < 1.0) {
            panic!("p must be in (0, 1).");
        }
        GeometricalLevelGenerator { total, p, rng }
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl<R: Rng> LevelGenerator for GeometricalLevelGenerator<R> {
    fn random(&mut self, height: usize) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.gen::<f64>() < self.p {
            level += 1;
            if level > height {
                return level;
            }
        }
        level
    }

    fn total(&self) -> usize {
        self.total
    }
}
