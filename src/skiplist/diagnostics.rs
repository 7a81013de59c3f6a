// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    cmp::Ordering::Less,
    collections::HashSet,
    fmt::{
        self,
        Debug,
        Display,
        Formatter,
        Write,
    },
};

use tracing::{
    debug,
    error,
};

use crate::{
    comparator::Comparator,
    errs::{
        Error,
        Inconsistency,
    },
    skiplist::{
        level_generator::LevelGenerator,
        node::NodeId,
        SkipList,
    },
};

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipList<K, V, C, G> {
    /// Walks the whole structure and verifies that:
    ///
    /// - `height` is within `[0, max_height)`;
    /// - every header slot up to `height` is linked and every slot above it is
    ///   empty (level 0 of an empty list excepted);
    /// - keys strictly increase along every level;
    /// - every node's tower is contiguous from level 0 to its own level, and no
    ///   taller than `height`;
    /// - the length and the arena's bookkeeping agree with level 0.
    ///
    /// This is a diagnostic for tests; nothing on the hot path calls it.
    pub fn check_invariants(&self) -> Result<(), Error> {
        match self.find_inconsistency() {
            | None => {
                debug!(len = self.len, height = self.height, "skiplist invariants hold");
                Ok(())
            },
            | Some(inconsistency) => {
                error!(%inconsistency, "skiplist invariant violated");
                Err(inconsistency.into())
            },
        }
    }

    fn find_inconsistency(&self) -> Option<Inconsistency> {
        let max_height = self.max_height();
        if self.height >= max_height {
            return Some(Inconsistency::HeightOutOfBounds {
                height: self.height,
                max_height,
            });
        }

        let empty = self.len == 0;
        for (level, link) in self.head.iter().enumerate() {
            if level <= self.height {
                if link.is_none() && !(level == 0 && empty) {
                    return Some(Inconsistency::SparseLevel { level });
                }
            } else if link.is_some() {
                return Some(Inconsistency::StaleLevel { level });
            }
        }

        let mut levels: Vec<Vec<NodeId>> = Vec::with_capacity(self.height + 1);
        for level in 0..=self.height {
            match self.walk_level(level) {
                | Ok(ids) => levels.push(ids),
                | Err(inconsistency) => return Some(inconsistency),
            }
        }

        let base = &levels[0];
        if base.len() != self.len {
            return Some(Inconsistency::LengthMismatch {
                recorded: self.len,
                counted: base.len(),
            });
        }

        let base_set: HashSet<NodeId> = base.iter().copied().collect();
        for (level, ids) in levels.iter().enumerate().skip(1) {
            let on_level: HashSet<NodeId> = ids.iter().copied().collect();
            if let Some(stray) = ids.iter().find(|id| !base_set.contains(*id)) {
                return Some(Inconsistency::BrokenTower {
                    level: self.arena.get(*stray).level(),
                    missing: 0,
                });
            }
            if let Some(gap) = base
                .iter()
                .find(|id| self.arena.get(**id).level() >= level && !on_level.contains(*id))
            {
                return Some(Inconsistency::BrokenTower {
                    level: self.arena.get(*gap).level(),
                    missing: level,
                });
            }
        }

        if let Some(tall) = base.iter().find(|id| self.arena.get(**id).level() > self.height) {
            return Some(Inconsistency::TowerTooTall {
                links: self.arena.get(*tall).links.len(),
                reached: self.height,
            });
        }

        let (slots, live, free) = (self.arena.slots(), self.arena.live(), self.arena.free_count());
        if live != self.len || slots != live + free {
            return Some(Inconsistency::ArenaMismatch { slots, live, free });
        }

        None
    }

    /// Collects one level's chain, checking that every node on it reaches the
    /// level and that keys strictly increase. A chain longer than the arena
    /// must loop and is reported as a length mismatch.
    fn walk_level(&self, level: usize) -> Result<Vec<NodeId>, Inconsistency> {
        let mut ids: Vec<NodeId> = Vec::new();
        let mut cursor = self.head[level];
        while let Some(id) = cursor {
            if ids.len() > self.arena.slots() {
                return Err(Inconsistency::LengthMismatch {
                    recorded: self.len,
                    counted: ids.len(),
                });
            }
            let node = self.arena.get(id);
            if node.links.len() <= level {
                return Err(Inconsistency::TowerTooShort {
                    level,
                    links: node.links.len(),
                });
            }
            if let Some(&prev) = ids.last() {
                if self.cmp.compare(&self.arena.get(prev).key, &node.key) != Less {
                    return Err(Inconsistency::UnsortedLevel { level });
                }
            }
            ids.push(id);
            cursor = node.links[level];
        }
        Ok(ids)
    }
}

impl<K: Display, V, C: Comparator<K>, G: LevelGenerator> SkipList<K, V, C, G> {
    /// Lists the keys on every level, from the top down.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<K: Display, V, C: Comparator<K>, G: LevelGenerator> Display for SkipList<K, V, C, G> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Skiplist(height: {})", self.height)?;
        for level in (0..=self.height).rev() {
            write!(f, "[{level}]:")?;
            let mut cursor = self.head[level];
            while let Some(id) = cursor {
                let node = self.arena.get(id);
                write!(f, " {} ", node.key)?;
                cursor = node.links[level];
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl<K: Debug, V: Debug, C: Comparator<K>, G: LevelGenerator> Debug for SkipList<K, V, C, G> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        errs::{
            Error,
            Inconsistency,
        },
        skiplist::SkipList,
    };

    fn filled() -> SkipList<u32, u32> {
        let mut list = SkipList::new();
        for key in 0..200 {
            list.insert(key, key).unwrap();
        }
        list.check_invariants().unwrap();
        list
    }

    fn violation(list: &SkipList<u32, u32>) -> Inconsistency {
        match list.check_invariants() {
            | Err(Error::InternalInconsistency(inconsistency)) => inconsistency,
            | other => panic!("expected an inconsistency, got {other:?}"),
        }
    }

    #[test]
    fn test_detects_height_out_of_bounds() {
        let mut list = filled();
        list.height = list.max_height();
        assert!(matches!(violation(&list), Inconsistency::HeightOutOfBounds { .. }));
    }

    #[test]
    fn test_detects_sparse_level() {
        let mut list = filled();
        let top = list.height;
        list.head[top] = None;
        assert_eq!(violation(&list), Inconsistency::SparseLevel { level: top });
    }

    #[test]
    fn test_detects_empty_list_with_height() {
        let mut list: SkipList<u32, u32> = SkipList::new();
        list.height = 2;
        assert_eq!(violation(&list), Inconsistency::SparseLevel { level: 1 });
    }

    #[test]
    fn test_detects_stale_level() {
        let mut list = filled();
        let top = list.height;
        list.height -= 1;
        assert_eq!(violation(&list), Inconsistency::StaleLevel { level: top });
    }

    #[test]
    fn test_detects_unsorted_level() {
        let mut list = filled();
        let first = list.head[0].unwrap();
        list.arena.get_mut(first).key = 1_000;
        assert_eq!(violation(&list), Inconsistency::UnsortedLevel { level: 0 });
    }

    #[test]
    fn test_detects_broken_tower() {
        let mut list = filled();
        // unlink the first node of level 1 only, leaving a hole in its tower
        let first = list.head[1].unwrap();
        list.head[1] = list.arena.get(first).links[1];
        assert!(matches!(
            violation(&list),
            Inconsistency::BrokenTower { missing: 1, .. } | Inconsistency::SparseLevel { .. }
        ));
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut list = filled();
        list.len += 1;
        assert_eq!(
            violation(&list),
            Inconsistency::LengthMismatch {
                recorded: 201,
                counted: 200
            }
        );
    }

    #[test]
    fn test_render_empty_and_small() {
        let mut list = SkipList::new();
        assert_eq!(list.render(), "Skiplist(height: 0)\n[0]:\n");
        list.insert(3, "c").unwrap();
        list.insert(1, "a").unwrap();
        let rendered = list.render();
        assert!(rendered.starts_with(&format!("Skiplist(height: {})\n", list.height())));
        assert!(rendered.ends_with("[0]: 1  3 \n"));
        assert_eq!(rendered.lines().count(), list.height() + 2);
    }

    #[test]
    fn test_debug_is_a_map() {
        let list: SkipList<_, _> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{list:?}"), r#"{1: "a", 2: "b"}"#);
    }
}
