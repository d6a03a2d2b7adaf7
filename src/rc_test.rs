use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;
use crate::Error;

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
};

#[test]
fn test_rc_rbmap() {
    let seed: u128 = random();
    // let seed: u128 = 46462177783710469322936477079324309004;
    println!("test_rc_rbmap {}", seed);
    let mut rng = {
        let mut s = [0_u8; 32];
        s[..16].copy_from_slice(&seed.to_le_bytes());
        SmallRng::from_seed(s)
    };

    let mut index: RbMap<u8, u64> = RbMap::new();
    let mut btmap: BTreeMap<u8, u64> = BTreeMap::new();
    // older versions, along with their expected content.
    let mut versions: Vec<(RbMap<u8, u64>, BTreeMap<u8, u64>)> = vec![];

    let mut counts = [0_usize; 16];

    for i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: MapOp<u8, u64> = uns.arbitrary().unwrap();
        // println!("test_rc_rbmap op -- {:?}", op);
        match op {
            MapOp::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.len());
            }
            MapOp::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            MapOp::Set(key, val) => {
                counts[2] += 1;
                let res_bt = btmap.insert(key, val);
                let (new_index, old) = index.set(key, val);
                assert_eq!(old, res_bt, "old val for key {}", key);
                assert_eq!(index.get(&key).copied(), res_bt, "older version {}", key);
                assert_eq!(new_index.get(&key), Some(&val), "for key {}", key);
                index = new_index;
            }
            MapOp::Insert(key, val) => {
                counts[3] += 1;
                btmap.insert(key, val);
                index = index.insert(key, val);
                assert_eq!(index.get(&key), Some(&val), "for key {}", key);
            }
            MapOp::Remove(key) => {
                counts[4] += 1;
                let res_bt = btmap.remove(&key);
                let new_index = index.remove(&key);
                assert_eq!(index.get(&key).copied(), res_bt, "for remove key {}", key);
                assert_eq!(new_index.get(&key), None, "for remove key {}", key);
                index = new_index;
            }
            MapOp::Take(key) => {
                counts[5] += 1;
                let res_bt = btmap.remove(&key);
                let (new_index, old) = index.take(&key);
                assert_eq!(old, res_bt, "for take key {}", key);
                assert!(!new_index.contains_key(&key));
                index = new_index;
            }
            MapOp::Validate => {
                counts[6] += 1;
                index.validate().unwrap();
            }
            MapOp::Get(key) => {
                counts[7] += 1;
                assert_eq!(index.get(&key), btmap.get(&key), "for key {}", key);
                assert_eq!(index.contains_key(&key), btmap.contains_key(&key));
                match (index.fetch(&key), btmap.get(&key)) {
                    (Ok(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (Err(Error::KeyNotFound(_, _)), None) => (),
                    (res, r) => panic!("fetch key {} {:?} {:?}", key, res, r),
                }
            }
            MapOp::Iter => {
                counts[8] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b);
                assert_eq!(index.first(), btmap.iter().next());
                assert_eq!(index.last(), btmap.iter().next_back());
            }
            MapOp::Range((l, h)) if asc_range(&l, &h) => {
                counts[9] += 1;
                let r = (Bound::from(l), Bound::from(h));
                let a: Vec<(u8, u64)> = index.range(r).map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.range(r).map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b, "range {:?}", r);
            }
            MapOp::Range((l, h)) => {
                counts[9] += 1;
                let r = (Bound::from(l), Bound::from(h));
                assert_eq!(index.range(r).count(), 0, "range {:?}", r);
            }
            MapOp::Reverse((l, h)) if asc_range(&l, &h) => {
                counts[10] += 1;
                let r = (Bound::from(l), Bound::from(h));
                let a: Vec<(u8, u64)> = index.reverse(r).map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> =
                    btmap.range(r).rev().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b, "reverse {:?}", r);
            }
            MapOp::Reverse((l, h)) => {
                counts[10] += 1;
                let r = (Bound::from(l), Bound::from(h));
                assert_eq!(index.reverse(r).count(), 0, "reverse {:?}", r);
            }
            MapOp::Snapshot => {
                counts[11] += 1;
                if versions.len() < 64 {
                    versions.push((index.clone(), btmap.clone()));
                }
            }
            MapOp::SetDefault(key, val) => {
                counts[12] += 1;
                let res_bt = *btmap.entry(key).or_insert(val);
                let (new_index, value) = index.set_default(key, val);
                assert_eq!(value, res_bt, "set_default key {}", key);
                assert_eq!(new_index.get(&key), Some(&res_bt), "for key {}", key);
                assert_eq!(new_index.len(), btmap.len());
                index = new_index;
            }
            MapOp::Update(items) => {
                counts[13] += 1;
                btmap.extend(items.clone());
                let new_index = index.update(items);
                assert_eq!(new_index.len(), btmap.len());
                assert!(new_index.iter().eq(btmap.iter()));
                index = new_index;
            }
            MapOp::PopFirst => {
                counts[14] += 1;
                let first = btmap.iter().next().map(|(k, v)| (*k, *v));
                if let Some((key, _)) = first {
                    btmap.remove(&key);
                }
                let (new_index, entry) = index.pop_first();
                assert_eq!(entry.map(|(k, v)| (*k, *v)), first);
                assert_eq!(new_index.len(), btmap.len());
                index = new_index;
            }
            MapOp::PopLast => {
                counts[15] += 1;
                let last = btmap.iter().next_back().map(|(k, v)| (*k, *v));
                if let Some((key, _)) = last {
                    btmap.remove(&key);
                }
                let (new_index, entry) = index.pop_last();
                assert_eq!(entry.map(|(k, v)| (*k, *v)), last);
                assert_eq!(new_index.len(), btmap.len());
                index = new_index;
            }
        }

        if i % 10_000 == 0 {
            index.validate().unwrap();
        }
    }

    index.validate().unwrap();
    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, b);

    for (version, btmap) in versions.iter() {
        version.validate().unwrap();
        let a: Vec<(u8, u64)> = version.iter().map(|(k, v)| (*k, *v)).collect();
        let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(a, b, "older version");
    }

    println!(
        "test_rc_rbmap counts {:?} len:{}/{} versions:{}",
        counts,
        index.len(),
        btmap.len(),
        versions.len()
    );
}

#[test]
fn test_rc_rbmap_traits() {
    let items: Vec<(u16, String)> = (0..100).rev().map(|i| (i, i.to_string())).collect();

    let index: RbMap<u16, String> = items.clone().into_iter().collect();
    index.validate().unwrap();
    assert_eq!(index.len(), 100);
    assert!(!index.is_thread_safe());

    let keys: Vec<u16> = index.keys().copied().collect();
    assert_eq!(keys, (0..100).collect::<Vec<u16>>());
    let values: Vec<&String> = index.values().collect();
    assert_eq!(values[99], "99");

    let mut n = 0;
    for (key, value) in &index {
        assert_eq!(&key.to_string(), value);
        n += 1;
    }
    assert_eq!(n, 100);

    // content equality, irrespective of the insertion order.
    let other: RbMap<u16, String> = items.into_iter().rev().collect();
    assert_eq!(index, other);
    let other = other.insert(5, "five".to_string());
    assert_ne!(index, other);
    assert_eq!(index, index.remove(&1000));

    let small: RbMap<u8, u8> = vec![(2, 20), (1, 10)].into_iter().collect();
    assert_eq!(format!("{:?}", small), "{1: 10, 2: 20}");

    // bulk merge, later entries win.
    let base: RbMap<u8, u8> = vec![(1, 10), (2, 20)].into_iter().collect();
    let merged = base.update(vec![(2, 21), (3, 30), (3, 31)]);
    merged.validate().unwrap();
    assert_eq!(format!("{:?}", merged), "{1: 10, 2: 21, 3: 31}");
    assert_eq!(format!("{:?}", base), "{1: 10, 2: 20}");

    let mut extended = base.clone();
    extended.extend(vec![(0, 0), (2, 22)]);
    extended.validate().unwrap();
    assert_eq!(format!("{:?}", extended), "{0: 0, 1: 10, 2: 22}");

    let (same, value) = base.set_default(1, 99);
    assert_eq!(value, 10);
    assert_eq!(same, base);
    let (grown, value) = base.set_default(5, 50);
    assert_eq!(value, 50);
    assert_eq!(grown.len(), 3);

    let cleared = merged.clear();
    assert!(cleared.is_empty());
    cleared.validate().unwrap();
    assert_eq!(merged.len(), 3);

    let empty: RbMap<u8, u8> = RbMap::default();
    assert_eq!(empty.pop_first().1, None);
    assert_eq!(empty.pop_last().1, None);
    assert_eq!(empty.first(), None);
    assert_eq!(empty.len(), 0);
    empty.validate().unwrap();
}

#[test]
fn test_rc_rbmap_borrowed_keys() {
    let index: RbMap<String, u64> = RbMap::new();
    let index = index.insert("key1".to_string(), 1);
    let index = index.insert("key2".to_string(), 2);

    assert_eq!(index.get("key1"), Some(&1));
    assert_eq!(*index.fetch("key2").unwrap(), 2);
    assert!(index.fetch("key3").is_err());

    let r: (Bound<&str>, Bound<&str>) = (Bound::Included("key2"), Bound::Unbounded);
    let keys: Vec<&String> = index.range::<str, _>(r).map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["key2"]);
    let r: (Bound<&str>, Bound<&str>) = (Bound::Unbounded, Bound::Excluded("key2"));
    let keys: Vec<&String> = index.reverse::<_, str>(r).map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["key1"]);

    let (index, old) = index.take("key1");
    assert_eq!(old, Some(1));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_rc_rbset() {
    let seed: u128 = random();
    // let seed: u128 = 46462177783710469322936477079324309004;
    println!("test_rc_rbset {}", seed);
    let mut rng = {
        let mut s = [0_u8; 32];
        s[..16].copy_from_slice(&seed.to_le_bytes());
        SmallRng::from_seed(s)
    };

    let mut set: RbSet<u8> = RbSet::new();
    let mut btset: BTreeSet<u8> = BTreeSet::new();

    let mut counts = [0_usize; 9];

    for _i in 0..100_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: SetOp<u8> = uns.arbitrary().unwrap();
        match op {
            SetOp::Len => {
                counts[0] += 1;
                assert_eq!(set.len(), btset.len());
                assert_eq!(set.is_empty(), btset.is_empty());
            }
            SetOp::Insert(key) => {
                counts[1] += 1;
                btset.insert(key);
                set = set.insert(key);
                assert!(set.contains(&key));
            }
            SetOp::Remove(key) => {
                counts[2] += 1;
                btset.remove(&key);
                set = set.remove(&key);
                assert!(!set.contains(&key));
            }
            SetOp::Contains(key) => {
                counts[3] += 1;
                assert_eq!(set.contains(&key), btset.contains(&key));
            }
            SetOp::TryRemove(key) => {
                counts[8] += 1;
                match (set.try_remove(&key), btset.remove(&key)) {
                    (Ok(new_set), true) => set = new_set,
                    (Err(Error::KeyNotFound(_, _)), false) => (),
                    (res, present) => panic!("try_remove {} {:?} {}", key, res, present),
                }
                assert!(!set.contains(&key));
            }
            SetOp::PopFirst => {
                counts[4] += 1;
                let first = btset.iter().next().copied();
                if let Some(key) = first {
                    btset.remove(&key);
                }
                let (new_set, key) = set.pop_first();
                assert_eq!(key.copied(), first);
                set = new_set;
            }
            SetOp::Iter => {
                counts[5] += 1;
                assert!(set.iter().eq(btset.iter()));
                assert_eq!(set.first(), btset.iter().next());
                assert_eq!(set.last(), btset.iter().next_back());
            }
            SetOp::Range((l, h)) => {
                counts[6] += 1;
                let r = (Bound::from(l), Bound::from(h));
                match asc_range_bound(&r) {
                    true => {
                        assert!(set.range(r).eq(btset.range(r)), "range {:?}", r);
                        assert!(set.reverse(r).eq(btset.range(r).rev()), "{:?}", r);
                    }
                    false => assert_eq!(set.range(r).count(), 0, "range {:?}", r),
                }
            }
            SetOp::Validate => {
                counts[7] += 1;
                set.validate().unwrap();
            }
        }
    }

    set.validate().unwrap();
    assert!(set.iter().eq(btset.iter()));

    println!("test_rc_rbset counts {:?} len:{}/{}", counts, set.len(), btset.len());
}

#[test]
fn test_rc_rbset_algebra() {
    let seed: u128 = random();
    println!("test_rc_rbset_algebra {}", seed);
    let mut rng = {
        let mut s = [0_u8; 32];
        s[..16].copy_from_slice(&seed.to_le_bytes());
        SmallRng::from_seed(s)
    };

    for _i in 0..200 {
        let (n, m) = (rng.gen::<usize>() % 200, rng.gen::<usize>() % 200);
        let xs: Vec<u16> = (0..n).map(|_| rng.gen::<u16>() % 300).collect();
        let ys: Vec<u16> = (0..m).map(|_| rng.gen::<u16>() % 300).collect();

        let (a, b): (RbSet<u16>, RbSet<u16>) =
            (xs.iter().copied().collect(), ys.iter().copied().collect());
        let (ra, rb): (BTreeSet<u16>, BTreeSet<u16>) =
            (xs.iter().copied().collect(), ys.iter().copied().collect());

        let check = |set: RbSet<u16>, refn: BTreeSet<u16>| {
            set.validate().unwrap();
            assert!(set.iter().eq(refn.iter()));
        };

        check(a.union(&b), ra.union(&rb).copied().collect());
        check(a.intersection(&b), ra.intersection(&rb).copied().collect());
        check(a.difference(&b), ra.difference(&rb).copied().collect());
        check(b.difference(&a), rb.difference(&ra).copied().collect());
        check(
            a.symmetric_difference(&b),
            ra.symmetric_difference(&rb).copied().collect(),
        );

        assert_eq!(a.is_subset(&b), ra.is_subset(&rb));
        assert_eq!(a.is_superset(&b), ra.is_superset(&rb));
        assert_eq!(a.is_disjoint(&b), ra.is_disjoint(&rb));
        assert!(a.intersection(&b).is_subset(&a));
        assert!(a.union(&b).is_superset(&b));
        assert!(a.difference(&b).is_disjoint(&b));

        // inputs are untouched.
        check(a, ra);
        check(b, rb);
    }
}

#[test]
fn test_rc_rbset_traits() {
    let a: RbSet<u8> = vec![3, 1, 2, 3, 1].into_iter().collect();
    assert_eq!(a.len(), 3);
    assert_eq!(format!("{:?}", a), "{1, 2, 3}");

    let b: RbSet<u8> = vec![1, 2, 3].into_iter().collect();
    assert_eq!(a, b);
    assert_ne!(a, b.remove(&2));

    // re-inserting a member keeps the version.
    let c = a.insert(2);
    assert_eq!(c.len(), 3);
    assert_eq!(a, c);

    let empty: RbSet<u8> = RbSet::default();
    let (empty, key) = empty.pop_first();
    assert_eq!(key, None);
    assert!(empty.is_empty());
    assert!(empty.is_subset(&a));
    assert!(empty.is_disjoint(&a));
}

#[derive(Debug, Arbitrary)]
enum MapOp<K, V> {
    Len,
    IsEmpty,
    Set(K, V),
    Insert(K, V),
    Remove(K),
    Take(K),
    Get(K),
    Iter,
    Range((Limit<K>, Limit<K>)),
    Reverse((Limit<K>, Limit<K>)),
    Validate,
    Snapshot,
    SetDefault(K, V),
    Update(Vec<(K, V)>),
    PopFirst,
    PopLast,
}

#[derive(Debug, Arbitrary)]
enum SetOp<K> {
    Len,
    Insert(K),
    Remove(K),
    Contains(K),
    TryRemove(K),
    PopFirst,
    Iter,
    Range((Limit<K>, Limit<K>)),
    Validate,
}

#[derive(Debug, Arbitrary, Eq, PartialEq)]
enum Limit<T> {
    Unbounded,
    Included(T),
    Excluded(T),
}

fn asc_range<T: PartialOrd>(from: &Limit<T>, to: &Limit<T>) -> bool {
    match (from, to) {
        (Limit::Unbounded, _) => true,
        (_, Limit::Unbounded) => true,
        (Limit::Included(a), Limit::Included(b)) => a <= b,
        (Limit::Included(a), Limit::Excluded(b)) => a <= b,
        (Limit::Excluded(a), Limit::Included(b)) => a <= b,
        (Limit::Excluded(a), Limit::Excluded(b)) => b > a,
    }
}

fn asc_range_bound<T: PartialOrd>(r: &(Bound<T>, Bound<T>)) -> bool {
    match r {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => true,
        (Bound::Included(a), Bound::Included(b)) => a <= b,
        (Bound::Included(a), Bound::Excluded(b)) => a <= b,
        (Bound::Excluded(a), Bound::Included(b)) => a <= b,
        (Bound::Excluded(a), Bound::Excluded(b)) => b > a,
    }
}

impl<T> From<Limit<T>> for Bound<T> {
    fn from(limit: Limit<T>) -> Self {
        match limit {
            Limit::Unbounded => Bound::Unbounded,
            Limit::Included(v) => Bound::Included(v),
            Limit::Excluded(v) => Bound::Excluded(v),
        }
    }
}
