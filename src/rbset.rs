use std::{borrow::Borrow, fmt, iter::FromIterator, ops::RangeBounds};

use super::*;
use crate::{Datum, Error, Result};

/// Fully persistent ordered set, using red-black [Tree].
///
/// Set operations (union, intersection and so on) share key datums with
/// their inputs, keys are never cloned.
pub struct RbSet<K> {
    root: Tree<K, ()>,
    n_count: usize,
}

impl<K> Clone for RbSet<K> {
    fn clone(&self) -> RbSet<K> {
        RbSet {
            root: self.root.clone(),
            n_count: self.n_count,
        }
    }
}

impl<K> Default for RbSet<K> {
    fn default() -> RbSet<K> {
        RbSet::new()
    }
}

impl<K> RbSet<K> {
    pub fn new() -> RbSet<K> {
        RbSet {
            root: Tree::Empty,
            n_count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    #[inline]
    pub fn root(&self) -> &Tree<K, ()> {
        &self.root
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.search(key).is_some()
    }

    /// Add key to the set and return the new set. If key is already a
    /// member, return a clone of this version.
    pub fn insert(&self, key: K) -> Self
    where
        K: Ord,
    {
        match self.contains(&key) {
            true => self.clone(),
            false => self.add_datum(Ref::new(Datum::from(key))),
        }
    }

    /// Remove key from the set and return the new set.
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.root.remove(key) {
            (root, Some(_)) => RbSet {
                root,
                n_count: self.n_count - 1,
            },
            (_, None) => self.clone(),
        }
    }

    /// Same as remove, but removing a key that is not a member is an error.
    pub fn try_remove<Q>(&self, key: &Q) -> Result<Self>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.root.remove(key) {
            (root, Some(_)) => Ok(RbSet {
                root,
                n_count: self.n_count - 1,
            }),
            (_, None) => err_at!(KeyNotFound, msg: "missing key in {} members", self.n_count),
        }
    }

    pub fn first(&self) -> Option<&K> {
        self.root.first().map(|(key, _)| key)
    }

    pub fn last(&self) -> Option<&K> {
        self.root.last().map(|(key, _)| key)
    }

    /// Remove the smallest key, return the new set and the removed key.
    /// The key is borrowed from this version, which still holds it.
    pub fn pop_first(&self) -> (Self, Option<&K>)
    where
        K: Ord,
    {
        match self.first() {
            Some(key) => (self.remove(key), Some(key)),
            None => (self.clone(), None),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.root.iter().map(|(key, _)| key)
    }

    pub fn range<Q, R>(&self, range: R) -> impl Iterator<Item = &K>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        self.root.range(range).map(|(key, _)| key)
    }

    pub fn reverse<Q, R>(&self, range: R) -> impl Iterator<Item = &K>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        self.root.reverse(range).map(|(key, _)| key)
    }

    /// Validate tree invariants and the entry count.
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

    // caller makes sure datum's key is not a member.
    fn add_datum(&self, datum: Ref<Datum<K, ()>>) -> Self
    where
        K: Ord,
    {
        let (root, _) = self.root.upsert(datum);
        RbSet {
            root,
            n_count: self.n_count + 1,
        }
    }

    fn filter_from<F>(&self, mut acc: Self, mut pred: F) -> Self
    where
        K: Ord,
        F: FnMut(&K) -> bool,
    {
        let mut iter = self.root.iter();
        while let Some(node) = iter.next_node() {
            if pred(node.as_key()) {
                acc = acc.add_datum(node.to_datum_ref());
            }
        }
        acc
    }
}

impl<K> RbSet<K>
where
    K: Ord,
{
    /// Return a set with members from both sets.
    pub fn union(&self, other: &Self) -> Self {
        let (large, small) = match self.len() >= other.len() {
            true => (self, other),
            false => (other, self),
        };
        small.filter_from(large.clone(), |key| !large.contains(key))
    }

    /// Return a set with members common to both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        self.filter_from(RbSet::new(), |key| other.contains(key))
    }

    /// Return a set with members of this set that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.filter_from(RbSet::new(), |key| !other.contains(key))
    }

    /// Return a set with members that are in exactly one of the sets.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let acc = self.difference(other);
        other.filter_from(acc, |key| !self.contains(key))
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|key| other.contains(key))
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (large, small) = match self.len() >= other.len() {
            true => (self, other),
            false => (other, self),
        };
        !small.iter().any(|key| large.contains(key))
    }
}

impl<K> FromIterator<K> for RbSet<K>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        iter.into_iter().fold(RbSet::new(), |set, key| set.insert(key))
    }
}

impl<K> PartialEq for RbSet<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.n_count == other.n_count && self.iter().eq(other.iter())
    }
}

impl<K> Eq for RbSet<K> where K: Eq {}

impl<K> fmt::Debug for RbSet<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
