// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("node allocation failed")]
    AllocationFailed(#[from] TryReserveError),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(#[from] Inconsistency),
}

/// A structural invariant the list failed to uphold. Only the invariant
/// checker produces these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("height {height} is outside [0, {max_height})")]
    HeightOutOfBounds { height: usize, max_height: usize },
    #[error("level {level} is sparse")]
    SparseLevel { level: usize },
    #[error("level {level} not sparse")]
    StaleLevel { level: usize },
    #[error("level {level} unsorted")]
    UnsortedLevel { level: usize },
    #[error("node at level {level} is missing from level {missing}")]
    BrokenTower { level: usize, missing: usize },
    #[error("node linked on level {level} only has {links} links")]
    TowerTooShort { level: usize, links: usize },
    #[error("node has {links} links but only reaches level {reached}")]
    TowerTooTall { links: usize, reached: usize },
    #[error("length is {recorded} but level 0 holds {counted} nodes")]
    LengthMismatch { recorded: usize, counted: usize },
    #[error("arena holds {slots} slots, {live} live and {free} free")]
    ArenaMismatch { slots: usize, live: usize, free: usize },
}
