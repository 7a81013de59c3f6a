// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::mem;

use crate::errs::Result;

/// Stable address of a node inside the [`Arena`]. Ids of removed nodes are
/// recycled by later inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A successor slot. `None` marks the end of a level.
pub(crate) type Link = Option<NodeId>;

/// A key/value pair plus one successor link per level the node reaches. The
/// node reaches level `links.len() - 1`.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: Vec<Link>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, level: usize) -> Result<Self> {
        let mut links = Vec::new();
        links.try_reserve_exact(level + 1)?;
        links.resize(level + 1, None);
        Ok(Node { key, value, links })
    }

    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.links.len() - 1
    }
}

#[derive(Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<usize> },
}

/// Owns every node of a list. Nodes never move once allocated; freed slots are
/// threaded onto a free list and handed out again before the arena grows.
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<usize>,
    live: usize,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }
}

impl<K, V> Arena<K, V> {
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> Result<NodeId> {
        let idx = match self.free_head {
            | Some(idx) => {
                let slot = mem::replace(&mut self.slots[idx], Slot::Occupied(node));
                self.free_head = match slot {
                    | Slot::Vacant { next_free } => next_free,
                    | Slot::Occupied(_) => unreachable!("free list points at a live node"),
                };
                idx
            },
            | None => {
                self.slots.try_reserve(1)?;
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            },
        };
        self.live += 1;
        Ok(NodeId(idx))
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id.0], vacant) {
            | Slot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.live -= 1;
                node
            },
            | Slot::Vacant { .. } => panic!("double free of node {}", id.0),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            | Slot::Occupied(node) => node,
            | Slot::Vacant { .. } => panic!("dangling link to node {}", id.0),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            | Slot::Occupied(node) => node,
            | Slot::Vacant { .. } => panic!("dangling link to node {}", id.0),
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Walks the free list, stopping early if it is longer than the arena
    /// (which can only mean it loops).
    pub(crate) fn free_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(idx) = cursor {
            if count > self.slots.len() {
                break;
            }
            count += 1;
            cursor = match self.slots.get(idx) {
                | Some(Slot::Vacant { next_free }) => *next_free,
                | _ => None,
            };
        }
        count
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    /// Consumes the arena, returning the entries reachable from `first` along
    /// level 0, in link order.
    pub(crate) fn into_ordered(self, first: Link) -> Vec<(K, V)> {
        let mut nodes: Vec<Option<Node<K, V>>> = self
            .slots
            .into_iter()
            .map(|slot| match slot {
                | Slot::Occupied(node) => Some(node),
                | Slot::Vacant { .. } => None,
            })
            .collect();

        let mut entries = Vec::with_capacity(self.live);
        let mut cursor = first;
        while let Some(NodeId(idx)) = cursor {
            let Some(node) = nodes.get_mut(idx).and_then(Option::take) else {
                break;
            };
            cursor = node.links[0];
            entries.push((node.key, node.value));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Arena,
        Node,
    };

    #[test]
    fn test_node_links_match_level() {
        let node = Node::new(1u32, "one", 3).unwrap();
        assert_eq!(node.links.len(), 4);
        assert_eq!(node.level(), 3);
        assert!(node.links.iter().all(Option::is_none));
    }

    #[test]
    fn test_arena_reuses_freed_slots() {
        let mut arena = Arena::default();
        let a = arena.alloc(Node::new(1, 'a', 0).unwrap()).unwrap();
        let b = arena.alloc(Node::new(2, 'b', 0).unwrap()).unwrap();
        assert_eq!(arena.live(), 2);

        let freed = arena.free(a);
        assert_eq!(freed.key, 1);
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.free_count(), 1);

        let c = arena.alloc(Node::new(3, 'c', 0).unwrap()).unwrap();
        assert_eq!(c, a, "freed slot must be recycled");
        assert_eq!(arena.slots(), 2);
        assert_eq!(arena.free_count(), 0);
        assert_eq!(arena.get(b).value, 'b');
        assert_eq!(arena.get(c).value, 'c');
    }

    #[test]
    #[should_panic]
    fn test_double_free_panics() {
        let mut arena = Arena::default();
        let a = arena.alloc(Node::new(1, (), 0).unwrap()).unwrap();
        arena.free(a);
        arena.free(a);
    }
}
