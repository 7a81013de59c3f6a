// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Key orderings for the skiplist.
//!
//! A comparator **must** be well-behaved. Given `compare(a, b)`:
//!
//! - it always returns the same result for the same pair;
//! - it is anti-symmetric: `compare(a, b) == Less` iff `compare(b, a) ==
//!   Greater`;
//! - it is transitive.
//!
//! A misbehaving comparator never causes memory unsafety, but keys may land in
//! the wrong place and lookups may miss. `SkipList::check_invariants` will
//! report the resulting disorder.

use std::cmp::Ordering;

pub trait Comparator<K: ?Sized> {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation, so iteration
/// runs from largest to smallest.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        rhs.cmp(lhs)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}
