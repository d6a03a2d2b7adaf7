use std::{borrow::Borrow, fmt, iter::FromIterator, ops::RangeBounds};

use super::*;
use crate::{Datum, Error, Result};

/// Fully persistent ordered map, using red-black [Tree].
///
/// Every write returns a new map, older versions stay valid and share
/// unchanged nodes with the new one. Cloning is O(1).
pub struct RbMap<K, V> {
    root: Tree<K, V>,
    n_count: usize, // number of entries in the tree.
}

impl<K, V> Clone for RbMap<K, V> {
    fn clone(&self) -> RbMap<K, V> {
        RbMap {
            root: self.root.clone(),
            n_count: self.n_count,
        }
    }
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> RbMap<K, V> {
        RbMap::new()
    }
}

impl<K, V> RbMap<K, V> {
    pub fn new() -> RbMap<K, V> {
        RbMap {
            root: Tree::Empty,
            n_count: Default::default(),
        }
    }

    /// Return number of entries in index.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return the underlying tree of this version.
    #[inline]
    pub fn root(&self) -> &Tree<K, V> {
        &self.root
    }
}

impl<K, V> RbMap<K, V> {
    /// Set value for key and return the new map. If key is already
    /// present, its value is replaced.
    pub fn insert(&self, key: K, value: V) -> Self
    where
        K: Ord,
    {
        self.do_set(key, value).0
    }

    /// Same as insert, additionally return the old value if any.
    pub fn set(&self, key: K, value: V) -> (Self, Option<V>)
    where
        K: Ord,
        V: Clone,
    {
        let (map, old) = self.do_set(key, value);
        (map, old.map(|datum| datum.as_value().clone()))
    }

    /// Remove key from map and return the new map. Removing a missing
    /// key returns a clone of this version.
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.do_remove(key).0
    }

    /// Same as remove, additionally return the removed value if any.
    pub fn take<Q>(&self, key: &Q) -> (Self, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        let (map, old) = self.do_remove(key);
        (map, old.map(|datum| datum.as_value().clone()))
    }

    /// Set value for key only if key is missing. Return the new map and
    /// the value now held for key.
    pub fn set_default(&self, key: K, value: V) -> (Self, V)
    where
        K: Ord,
        V: Clone,
    {
        match self.get(&key) {
            Some(value) => (self.clone(), value.clone()),
            None => (self.insert(key, value.clone()), value),
        }
    }

    /// Merge all entries from `iter` into this map and return the new map.
    /// Later entries overwrite earlier ones for the same key.
    pub fn update<I>(&self, iter: I) -> Self
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter()
            .fold(self.clone(), |map, (key, value)| map.insert(key, value))
    }

    /// Remove the smallest entry, return the new map and the removed
    /// entry. The entry is borrowed from this version, which still holds it.
    pub fn pop_first(&self) -> (Self, Option<(&K, &V)>)
    where
        K: Ord,
    {
        match self.first() {
            Some((key, value)) => (self.remove(key), Some((key, value))),
            None => (self.clone(), None),
        }
    }

    /// Same as pop_first, for the largest entry.
    pub fn pop_last(&self) -> (Self, Option<(&K, &V)>)
    where
        K: Ord,
    {
        match self.last() {
            Some((key, value)) => (self.remove(key), Some((key, value))),
            None => (self.clone(), None),
        }
    }

    /// Return an empty map. Older versions are not affected.
    pub fn clear(&self) -> Self {
        RbMap::new()
    }

    fn do_set(&self, key: K, value: V) -> (Self, Option<Ref<Datum<K, V>>>)
    where
        K: Ord,
    {
        let (root, old) = self.root.upsert(Ref::new(Datum::new(key, value)));
        let n_count = match old {
            Some(_) => self.n_count,
            None => self.n_count + 1,
        };
        (RbMap { root, n_count }, old)
    }

    fn do_remove<Q>(&self, key: &Q) -> (Self, Option<Ref<Datum<K, V>>>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.root.remove(key) {
            (root, Some(old)) => {
                let n_count = self.n_count - 1;
                (RbMap { root, n_count }, Some(old))
            }
            (_, None) => (self.clone(), None),
        }
    }

    /// Validate tree invariants, and the entry count maintained by this
    /// map against the count of nodes in the tree.
    pub fn validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        let n_count = self.root.validate()?;
        if n_count != self.n_count {
            return err_at!(Fatal, msg: "count {} != {}", n_count, self.n_count);
        }
        Ok(())
    }
}

impl<K, V> RbMap<K, V> {
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.search(key).map(|node| node.as_value())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.search(key).is_some()
    }

    /// Same as get, but a missing key is an error.
    pub fn fetch<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.get(key) {
            Some(value) => Ok(value),
            None => err_at!(KeyNotFound, msg: "missing key in {} entries", self.n_count),
        }
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.root.first()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.root.last()
    }

    /// Return an iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        self.root.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.root.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.root.iter().map(|(_, value)| value)
    }

    /// Range over all entries from low to high, specified by `range`.
    /// For unsized `Q`, like `str`, pass a tuple of `Bound<&Q>`; std's
    /// `a..b` range types only implement `RangeBounds` for sized targets.
    pub fn range<Q, R>(&self, range: R) -> Range<K, V, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        self.root.range(range)
    }

    /// Reverse range over all entries from high to low, specified by `range`.
    pub fn reverse<R, Q>(&self, range: R) -> Reverse<K, V, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        self.root.reverse(range)
    }
}

impl<K, V> FromIterator<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter()
            .fold(RbMap::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K, V> Extend<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        *self = self.update(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a RbMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> PartialEq for RbMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.n_count == other.n_count && self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for RbMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> fmt::Debug for RbMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
