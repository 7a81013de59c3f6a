// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    cmp::Ordering::{
        Greater,
        Less,
    },
    iter::FusedIterator,
    ops::{
        Bound,
        RangeBounds,
    },
    vec,
};

use tracing::instrument;

use crate::{
    comparator::Comparator,
    skiplist::{
        level_generator::LevelGenerator,
        node::{
            Arena,
            Link,
        },
        SkipList,
    },
};

/// Walks level 0 in key order.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    cursor: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.cursor?);
        self.cursor = node.links[0];
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// The entries between two bounds, in key order. The start is found with a
/// top-down seek; after that it walks level 0 until the end bound.
pub struct Range<'a, K, V, C, R> {
    arena: &'a Arena<K, V>,
    cmp: &'a C,
    cursor: Link,
    bounds: R,
}

impl<'a, K, V, C, R> Iterator for Range<'a, K, V, C, R>
where
    C: Comparator<K>,
    R: RangeBounds<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.cursor?);
        let past_end = match self.bounds.end_bound() {
            | Bound::Included(end) => self.cmp.compare(&node.key, end) == Greater,
            | Bound::Excluded(end) => self.cmp.compare(&node.key, end) != Less,
            | Bound::Unbounded => false,
        };
        if past_end {
            self.cursor = None;
            return None;
        }
        self.cursor = node.links[0];
        Some((&node.key, &node.value))
    }
}

impl<K, V, C, R> FusedIterator for Range<'_, K, V, C, R>
where
    C: Comparator<K>,
    R: RangeBounds<K>,
{
}

/// Owning iterator, in key order.
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipList<K, V, C, G> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            cursor: self.head[0],
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Entries whose keys fall within `bounds` under the list's comparator.
    #[instrument(level = "trace", skip_all)]
    pub fn range<R: RangeBounds<K>>(&self, bounds: R) -> Range<'_, K, V, C, R> {
        let pred = match bounds.start_bound() {
            | Bound::Included(start) => self.scan(|k| self.cmp.compare(k, start) == Less, None),
            | Bound::Excluded(start) => self.scan(|k| self.cmp.compare(k, start) != Greater, None),
            | Bound::Unbounded => None,
        };
        Range {
            arena: &self.arena,
            cmp: &self.cmp,
            cursor: self.next(pred, 0),
            bounds,
        }
    }
}

impl<'a, K, V, C: Comparator<K>, G: LevelGenerator> IntoIterator for &'a SkipList<K, V, C, G> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> IntoIterator for SkipList<K, V, C, G> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        let first = self.head[0];
        IntoIter {
            inner: self.arena.into_ordered(first).into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use crate::{
        comparator::ReverseOrder,
        skiplist::SkipList,
    };

    fn evens() -> SkipList<i32, String> {
        (0..20).step_by(2).map(|k| (k, format!("v{k}"))).collect()
    }

    #[test]
    fn test_iter_in_order() {
        let mut list = SkipList::new();
        for key in [7, 3, 9, 1, 5] {
            list.insert(key, key * 2).unwrap();
        }
        let entries: Vec<_> = list.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![(1, 2), (3, 6), (5, 10), (7, 14), (9, 18)]);
        assert_eq!(list.iter().len(), 5);
        assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
        assert_eq!(list.values().sum::<i32>(), 50);
        assert_eq!((&list).into_iter().count(), 5);
    }

    #[test]
    fn test_into_iter_after_removals() {
        let mut list = evens();
        list.remove(&4);
        list.remove(&0);
        list.insert(5, "five".to_string()).unwrap();
        let keys: Vec<_> = list.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![2, 5, 6, 8, 10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_range_bounds() {
        fn keys<'a>(range: impl Iterator<Item = (&'a i32, &'a String)>) -> Vec<i32> {
            range.map(|(k, _)| *k).collect()
        }

        let list = evens();

        assert_eq!(keys(list.range(4..10)), vec![4, 6, 8]);
        assert_eq!(keys(list.range(3..=10)), vec![4, 6, 8, 10]);
        assert_eq!(keys(list.range(15..)), vec![16, 18]);
        assert_eq!(keys(list.range(..3)), vec![0, 2]);
        assert_eq!(keys(list.range(..)).len(), 10);
        assert_eq!(
            keys(list.range((Bound::Excluded(4), Bound::Excluded(10)))),
            vec![6, 8]
        );
        assert!(list.range(100..).next().is_none());
        assert!(list.range(9..9).next().is_none());
    }

    #[test]
    fn test_range_follows_comparator() {
        let mut list = SkipList::with_comparator(ReverseOrder);
        for key in 0..10 {
            list.insert(key, ()).unwrap();
        }
        // under the reversed order, 7 comes before 3
        let keys: Vec<_> = list.range(7..=3).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![7, 6, 5, 4, 3]);
    }
}
