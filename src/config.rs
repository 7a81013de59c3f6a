// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::{
    Error,
    Result,
};

/// The default number of levels, enough for ~2^16 keys at `p = 0.5` before
/// search paths start to lengthen.
pub const DEFAULT_MAX_HEIGHT: usize = 16;

pub const DEFAULT_PROMOTION_PROBABILITY: f64 = 0.5;

/// The largest `max_height` a list accepts. Predecessor arrays are stack
/// allocated at this size.
pub const MAX_SUPPORTED_HEIGHT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// Caps tower height, and with it the worst-case link memory per node.
    max_height: usize,
    /// Chance that a node on level `n` is also on level `n + 1`.
    promotion_probability: f64,
    /// Seed for the level generator. `None` seeds from the thread rng.
    seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_height: DEFAULT_MAX_HEIGHT,
            promotion_probability: DEFAULT_PROMOTION_PROBABILITY,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_promotion_probability(mut self, p: f64) -> Self {
        self.promotion_probability = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_height == 0 || self.max_height > MAX_SUPPORTED_HEIGHT {
            return Err(Error::InvalidConfig("max height must be in [1, 32]"));
        }
        // also rejects NaN
        if !(self.promotion_probability > 0.0 && self.promotion_probability < 1.0) {
            return Err(Error::InvalidConfig("promotion probability must be in (0, 1)"));
        }
        Ok(())
    }
}
