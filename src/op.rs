//! Write operations, as values, that can be applied on a [SharedMap]
//! using [SharedMap::write].

#[allow(unused_imports)]
use crate::SharedMap;

/// A single mutation on [SharedMap].
///
/// `cas`, when present, must equal the map's sequence number at the
/// time of the write, else the write is rejected with `InvalidCAS`.
/// `seqno`, when present, is the sequence number to publish the new
/// version with, so a log of writes can be replayed with their original
/// numbering. The published number never goes below the map's current
/// sequence number.
#[derive(Clone, Debug, PartialEq)]
pub enum Write<K, V> {
    /// Insert or overwrite `key` with `value`, like [SharedMap::set].
    Set {
        key: K,
        value: V,
        cas: Option<u64>,
        seqno: Option<u64>,
    },
    /// Drop `key` from the map, like [SharedMap::remove].
    Rem {
        key: K,
        cas: Option<u64>,
        seqno: Option<u64>,
    },
}

impl<K, V> Write<K, V> {
    #[inline]
    pub fn set(key: K, value: V) -> Write<K, V> {
        Write::Set {
            key,
            value,
            cas: None,
            seqno: None,
        }
    }

    #[inline]
    pub fn remove(key: K) -> Write<K, V> {
        Write::Rem {
            key,
            cas: None,
            seqno: None,
        }
    }

    /// Publish this write with `seqno`.
    pub fn set_seqno(mut self, seqno: u64) -> Write<K, V> {
        *self.as_mut_seqno() = Some(seqno);
        self
    }

    /// Apply this write only if the map is at sequence number `cas`.
    pub fn set_cas(mut self, cas: u64) -> Write<K, V> {
        *self.as_mut_cas() = Some(cas);
        self
    }

    #[inline]
    pub fn as_key(&self) -> &K {
        match self {
            Write::Set { key, .. } | Write::Rem { key, .. } => key,
        }
    }

    fn as_mut_seqno(&mut self) -> &mut Option<u64> {
        match self {
            Write::Set { seqno, .. } | Write::Rem { seqno, .. } => seqno,
        }
    }

    fn as_mut_cas(&mut self) -> &mut Option<u64> {
        match self {
            Write::Set { cas, .. } | Write::Rem { cas, .. } => cas,
        }
    }
}
