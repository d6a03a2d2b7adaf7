use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    fmt,
};

/// Datum is the payload carried by each tree node, a key and an optional
/// value.
///
/// Equality and ordering are defined on the key alone, the value never
/// takes part in comparison. Sets use `Datum<K, ()>`.
#[derive(Clone, Default)]
pub struct Datum<K, V = ()> {
    key: K,
    value: V,
}

impl<K, V> Datum<K, V> {
    pub fn new(key: K, value: V) -> Datum<K, V> {
        Datum { key, value }
    }

    #[inline]
    pub fn as_key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn as_value(&self) -> &V {
        &self.value
    }

    /// Compare a borrowed form of key with this datum's key.
    #[inline]
    pub fn cmp_key<Q>(&self, key: &Q) -> Ordering
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.key.borrow().cmp(key)
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K> From<K> for Datum<K, ()> {
    fn from(key: K) -> Datum<K, ()> {
        Datum { key, value: () }
    }
}

impl<K, V> PartialEq for Datum<K, V>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K, V> Eq for Datum<K, V> where K: Eq {}

impl<K, V> PartialOrd for Datum<K, V>
where
    K: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V> Ord for Datum<K, V>
where
    K: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> fmt::Debug for Datum<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.key, self.value)
    }
}

#[cfg(test)]
#[path = "datum_test.rs"]
mod datum_test;
