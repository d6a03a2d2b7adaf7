//! Module implement fully-persistent tree, ordered-map and ordered-set,
//! faster but not thread safe.

use std::rc::Rc as Ref;

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
        false
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;

#[cfg(test)]
#[path = "rc_test.rs"]
mod rc_test;
