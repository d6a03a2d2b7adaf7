//! Module implement a shared, thread-safe handle over the latest version
//! of an [RbMap].
//!
//! [SharedMap] allow concurrent read and write access at API level, while
//! behind the scenes all write-operations are serialized by a writer
//! mutex. Each write computes the next version off the current one and
//! publishes it, along with its entry count and sequence-number, with a
//! single pointer swap. Readers clone the published `Arc` and work on
//! that version without holding any lock.

use log::{debug, trace};
use parking_lot::{Mutex, RwLock};

use std::{borrow::Borrow, cmp, fmt, sync::Arc};

use crate::{arc::RbMap, op::Write, Error, Result};

/// SharedMap type for thread-safe, concurrent reads and serialized writes.
pub struct SharedMap<K, V> {
    name: String,

    mu: Arc<Mutex<u32>>,
    inner: Arc<RwLock<Arc<Inner<K, V>>>>,
}

struct Inner<K, V> {
    map: RbMap<K, V>,
    seqno: u64,
}

impl<K, V> Inner<K, V> {
    // sequence number never goes backwards, a replayed seqno older than
    // the current one is published as the current one.
    fn next_seqno(&self, seqno: Option<u64>) -> u64 {
        let seqno = seqno.unwrap_or_else(|| self.seqno.saturating_add(1));
        cmp::max(self.seqno, seqno)
    }
}

/// Result type for all write operations into SharedMap.
#[derive(Clone, Debug, PartialEq)]
pub struct Wr<V> {
    /// Sequence number of the published version. Same as the current
    /// sequence number when nothing got published.
    pub seqno: u64,
    /// Value that got replaced or removed.
    pub old: Option<V>,
}

impl<K, V> Clone for SharedMap<K, V> {
    fn clone(&self) -> SharedMap<K, V> {
        SharedMap {
            name: self.name.clone(),
            mu: Arc::clone(&self.mu),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedMap<K, V> {
    pub fn new(name: &str) -> SharedMap<K, V> {
        let inner = Inner {
            map: RbMap::new(),
            seqno: 0,
        };

        SharedMap {
            name: name.to_string(),
            mu: Arc::new(Mutex::new(0)),
            inner: Arc::new(RwLock::new(Arc::new(inner))),
        }
    }

    /// Identify this index instance.
    #[inline]
    pub fn to_name(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in the latest version.
    pub fn len(&self) -> usize {
        self.to_inner().map.len()
    }

    /// Return whether index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return current sequence-no for index.
    pub fn to_seqno(&self) -> u64 {
        self.to_inner().seqno
    }

    /// Return the latest version of the map. The snapshot is unaffected
    /// by subsequent writes.
    pub fn snapshot(&self) -> RbMap<K, V> {
        self.to_inner().map.clone()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.to_inner().map.get(key).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.to_inner().map.contains_key(key)
    }

    pub fn validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        self.to_inner().map.validate()
    }

    fn to_inner(&self) -> Arc<Inner<K, V>> {
        Arc::clone(&self.inner.read())
    }
}

impl<K, V> SharedMap<K, V> {
    /// Set `key`, `value` into index. If an older entry exist with same
    /// key, it shall be overwritten.
    pub fn set(&self, key: K, value: V) -> Result<Wr<V>>
    where
        K: Ord,
        V: Clone,
    {
        self.do_set(key, value, None, None)
    }

    /// Same as set, but `cas` must match index's current sequence-number.
    pub fn set_cas(&self, key: K, value: V, cas: u64) -> Result<Wr<V>>
    where
        K: Ord,
        V: Clone,
    {
        self.do_set(key, value, Some(cas), None)
    }

    /// Remove the entry, matching the key, from the index. Removing a
    /// missing key publishes nothing.
    pub fn remove<Q>(&self, key: &Q) -> Result<Wr<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.do_remove(key, None, None)
    }

    /// Same as remove, but `cas` must match index's current sequence-number.
    pub fn remove_cas<Q>(&self, key: &Q, cas: u64) -> Result<Wr<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.do_remove(key, Some(cas), None)
    }

    /// Apply op on top of this index. For more detail refer to [Write] type.
    pub fn write(&self, op: Write<K, V>) -> Result<Wr<V>>
    where
        K: Ord,
        V: Clone,
    {
        match op {
            Write::Set {
                key,
                value,
                cas,
                seqno,
            } => self.do_set(key, value, cas, seqno),
            Write::Rem { key, cas, seqno } => self.do_remove(&key, cas, seqno),
        }
    }

    fn do_set(&self, key: K, value: V, cas: Option<u64>, seqno: Option<u64>) -> Result<Wr<V>>
    where
        K: Ord,
        V: Clone,
    {
        let _w = self.mu.lock();

        let inner = self.to_inner();
        self.check_cas(&inner, cas)?;

        let (map, old) = inner.map.set(key, value);
        let seqno = self.publish(map, inner.next_seqno(seqno));

        Ok(Wr { seqno, old })
    }

    fn do_remove<Q>(&self, key: &Q, cas: Option<u64>, seqno: Option<u64>) -> Result<Wr<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        let _w = self.mu.lock();

        let inner = self.to_inner();
        self.check_cas(&inner, cas)?;

        match inner.map.take(key) {
            (map, Some(old)) => {
                let seqno = self.publish(map, inner.next_seqno(seqno));
                Ok(Wr {
                    seqno,
                    old: Some(old),
                })
            }
            (_, None) => Ok(Wr {
                seqno: inner.seqno,
                old: None,
            }),
        }
    }

    fn check_cas(&self, inner: &Inner<K, V>, cas: Option<u64>) -> Result<()> {
        match cas {
            Some(cas) if cas != inner.seqno => {
                debug!(
                    target: "prbt",
                    "{} reject cas:{} seqno:{}", self.name, cas, inner.seqno
                );
                err_at!(InvalidCAS, msg: "{} cas:{} seqno:{}", self.name, cas, inner.seqno)
            }
            _ => Ok(()),
        }
    }

    // caller should hold the writer lock.
    fn publish(&self, map: RbMap<K, V>, seqno: u64) -> u64 {
        let n_count = map.len();
        *self.inner.write() = Arc::new(Inner { map, seqno });
        trace!(
            target: "prbt",
            "{} publish seqno:{} n_count:{}", self.name, seqno, n_count
        );

        seqno
    }
}

impl<K, V> fmt::Debug for SharedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.to_inner();
        write!(
            f,
            "SharedMap<{},seqno:{},n_count:{}>",
            self.name,
            inner.seqno,
            inner.map.len()
        )
    }
}

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;
