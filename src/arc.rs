//! Module implement fully-persistent tree, ordered-map and ordered-set,
//! slower but thread safe.

use std::sync::Arc as Ref;

#[path = "./rbtree.rs"]
mod rbtree;

#[path = "./rbmap.rs"]
mod rbmap;

#[path = "./rbset.rs"]
mod rbset;

pub use self::rbmap::RbMap;
pub use self::rbset::RbSet;
pub use self::rbtree::{Color, Iter, Node, Range, Reverse, Tree};

impl<K, V> RbMap<K, V> {
    /// Return whether this instance is thread-safe.
    pub fn is_thread_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "arc_test.rs"]
mod arc_test;
