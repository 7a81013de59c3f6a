//! An ordered, in-memory map built on a probabilistic [`skip list`], the kind
//! of structure that sits under the memtable of a storage engine.
//!
//! ```
//! use towerlist::SkipList;
//!
//! let mut list = SkipList::new();
//! list.insert(0, "Hello").unwrap();
//! list.insert(1, "World").unwrap();
//!
//! assert_eq!(list.get(&0), Some(&"Hello"));
//! assert_eq!(list.get(&2), None);
//! assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
//! list.check_invariants().unwrap();
//! ```
//!
//! [`skip list`]: https://en.wikipedia.org/wiki/Skip_list

/// Key orderings the list can be built with.
pub mod comparator;
pub mod config;
pub mod errs;
pub mod skiplist;

pub use crate::{
    comparator::{
        Comparator,
        NaturalOrder,
        ReverseOrder,
    },
    config::Config,
    errs::{
        Error,
        Inconsistency,
        Result,
    },
    skiplist::{
        GeometricalLevelGenerator,
        LevelGenerator,
        SkipList,
    },
};
