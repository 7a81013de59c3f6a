// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! An ordered map which allows faster random access than a standard linked
//! list, without the rebalancing of a search tree.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! Every lookup, insert and removal walks the list top down: it runs along the
//! sparsest level while the next key is smaller than the needle, then drops a
//! level and repeats until level 0. Inserts and removals remember the last node
//! visited on each level (the predecessors) and splice around them.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n-1`
//! (with `0 < p < 1`). Custom level generators can be plugged in through
//! [`LevelGenerator`].
//!
//! Nodes live in an arena and link to each other by index, so the list is
//! entirely safe code. It is built for a single writer: mutation takes `&mut
//! self`, and concurrent access must be serialized by the caller.

mod diagnostics;
mod iter;
mod level_generator;
mod node;

use std::{
    cmp::Ordering::{
        Equal,
        Less,
    },
    mem,
};

use tracing::{
    instrument,
    trace,
};

pub use self::{
    iter::{
        IntoIter,
        Iter,
        Keys,
        Range,
        Values,
    },
    level_generator::{
        GeometricalLevelGenerator,
        LevelGenerator,
    },
};
use self::node::{
    Arena,
    Link,
    Node,
};
use crate::{
    comparator::{
        Comparator,
        NaturalOrder,
    },
    config::{
        Config,
        MAX_SUPPORTED_HEIGHT,
    },
    errs::{
        Error,
        Result,
    },
};

/// The last node visited on each level during a scan. `None` is the header.
type Predecessors = [Link; MAX_SUPPORTED_HEIGHT];

pub struct SkipList<K, V, C = NaturalOrder, G = GeometricalLevelGenerator> {
    /// The header's successors, one per possible level.
    head: Vec<Link>,
    arena: Arena<K, V>,
    /// Highest level with at least one node, 0 when empty.
    height: usize,
    len: usize,
    cmp: C,
    gen: G,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Create an empty list ordered by `K`'s [`Ord`], with the default
    /// [`Config`].
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparator<K>> SkipList<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self {
        let config = Config::default();
        Self::build(cmp, GeometricalLevelGenerator::from_config(&config))
    }

    pub fn with_config(cmp: C, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(cmp, GeometricalLevelGenerator::from_config(&config)))
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipList<K, V, C, G> {
    /// Create an empty list drawing node levels from `gen`. The list is as tall
    /// as `gen.total()`.
    pub fn with_level_generator(cmp: C, gen: G) -> Result<Self> {
        let total = gen.total();
        if total == 0 || total > MAX_SUPPORTED_HEIGHT {
            return Err(Error::InvalidConfig("level generator total must be in [1, 32]"));
        }
        Ok(Self::build(cmp, gen))
    }

    fn build(cmp: C, gen: G) -> Self {
        SkipList {
            head: vec![None; gen.total()],
            arena: Arena::default(),
            height: 0,
            len: 0,
            cmp,
            gen,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the highest non-empty level.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_height(&self) -> usize {
        self.head.len()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    #[inline]
    fn next(&self, at: Link, level: usize) -> Link {
        match at {
            | None => self.head[level],
            | Some(id) => self.arena.get(id).links[level],
        }
    }

    #[inline]
    fn set_next(&mut self, at: Link, level: usize, to: Link) {
        match at {
            | None => self.head[level] = to,
            | Some(id) => self.arena.get_mut(id).links[level] = to,
        }
    }

    /// The top-down scan every operation shares. Advances along each level
    /// while `before` holds for the next key, recording the last node visited
    /// per level into `preds`, and returns the last node visited on level 0.
    fn scan<F>(&self, mut before: F, mut preds: Option<&mut Predecessors>) -> Link
    where
        F: FnMut(&K) -> bool,
    {
        let mut cursor: Link = None;
        for level in (0..=self.height).rev() {
            while let Some(next) = self.next(cursor, level) {
                if !before(&self.arena.get(next).key) {
                    break;
                }
                cursor = Some(next);
            }
            if let Some(preds) = preds.as_deref_mut() {
                preds[level] = cursor;
            }
        }
        cursor
    }

    /// The node holding `key`, if any.
    fn find(&self, key: &K) -> Link {
        let pred = self.scan(|k| self.cmp.compare(k, key) == Less, None);
        self.next(pred, 0)
            .filter(|&id| self.cmp.compare(&self.arena.get(id).key, key) == Equal)
    }

    #[instrument(level = "trace", skip_all)]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.arena.get(id).value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|id| {
            let node = self.arena.get(id);
            (&node.key, &node.value)
        })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.arena.get_mut(id).value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Maps `key` to `value`, returning the value it replaced.
    ///
    /// Replacing the value of a present key changes nothing else about the
    /// list. A new key gets a fresh tower of random height, spliced after the
    /// predecessors found on the way down.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailed`] if the node can't be allocated, in which
    /// case the list is left untouched.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let mut preds: Predecessors = [None; MAX_SUPPORTED_HEIGHT];
        let pred = self.scan(|k| self.cmp.compare(k, &key) == Less, Some(&mut preds));

        if let Some(id) = self.next(pred, 0) {
            let node = self.arena.get_mut(id);
            if self.cmp.compare(&node.key, &key) == Equal {
                return Ok(Some(mem::replace(&mut node.value, value)));
            }
        }

        let level = self.gen.random(self.height).min(self.max_height() - 1);
        let id = self.arena.alloc(Node::new(key, value, level)?)?;

        if level > self.height {
            for pred in &mut preds[self.height + 1..=level] {
                *pred = None;
            }
            trace!(from = self.height, to = level, "raising height");
            self.height = level;
        }

        for (level, &pred) in preds.iter().enumerate().take(level + 1) {
            let succ = self.next(pred, level);
            self.arena.get_mut(id).links[level] = succ;
            self.set_next(pred, level, Some(id));
        }
        self.len += 1;

        Ok(None)
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let mut preds: Predecessors = [None; MAX_SUPPORTED_HEIGHT];
        let pred = self.scan(|k| self.cmp.compare(k, key) == Less, Some(&mut preds));

        let target = self.next(pred, 0)?;
        if self.cmp.compare(&self.arena.get(target).key, key) != Equal {
            return None;
        }

        // the tower is contiguous, so the first level that skips the target is
        // the top of it
        for (level, &pred) in preds.iter().enumerate().take(self.height + 1) {
            if self.next(pred, level) != Some(target) {
                break;
            }
            let succ = self.arena.get(target).links[level];
            self.set_next(pred, level, succ);
        }

        let node = self.arena.free(target);
        self.len -= 1;
        self.lower_height();

        Some((node.key, node.value))
    }

    /// Drops empty levels off the top until the highest level has a node.
    fn lower_height(&mut self) {
        let from = self.height;
        while self.height > 0 && self.head[self.height].is_none() {
            self.height -= 1;
        }
        if from != self.height {
            trace!(from, to = self.height, "lowering height");
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.fill(None);
        self.height = 0;
        self.len = 0;
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.head[0].map(|id| {
            let node = self.arena.get(id);
            (&node.key, &node.value)
        })
    }

    /// Runs the top-down scan all the way right, so it costs a search rather
    /// than a walk of level 0.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.scan(|_| true, None).map(|id| {
            let node = self.arena.get(id);
            (&node.key, &node.value)
        })
    }

    /// Number of nodes on each level, from level 0 up to the current height.
    pub fn level_lengths(&self) -> Vec<usize> {
        (0..=self.height)
            .map(|level| {
                let mut count = 0;
                let mut cursor = self.head[level];
                while let Some(id) = cursor {
                    count += 1;
                    cursor = self.arena.get(id).links[level];
                }
                count
            })
            .collect()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> Extend<(K, V)> for SkipList<K, V, C, G> {
    /// # Panics
    ///
    /// If a node can't be allocated.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(err) = self.insert(key, value) {
                panic!("failed to extend skiplist: {err}");
            }
        }
    }
}
