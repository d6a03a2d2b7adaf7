use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    fmt, marker,
    ops::{Bound, RangeBounds},
};

use super::*;
use crate::{Datum, Error, Result};

// IMPORTANT: this module is compiled once for each reference type, refer
// to rc.rs and arc.rs, `Ref` is supplied by the including module.

/// Color of a tree node.
///
/// `DoubleBlack` is transient, it only appears while a deletion is
/// walking back up the tree and never in a tree returned to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
    DoubleBlack,
}

/// Tree is a handle to one version of a persistent red-black tree.
///
/// Cloning a tree is O(1), it shares the root node. Mutating methods
/// return a new tree, while `self` and every other version stay valid
/// and unmodified.
pub enum Tree<K, V = ()> {
    /// Leaf, no datum.
    Empty,
    /// Transient leaf, carries one unit of black-height deficit left
    /// behind by removing a black leaf.
    DoubleEmpty,
    Node(Ref<Node<K, V>>),
}

/// Node in a tree, immutable once constructed.
pub struct Node<K, V = ()> {
    color: Color,
    left: Tree<K, V>,
    datum: Ref<Datum<K, V>>,
    right: Tree<K, V>,
}

impl<K, V> Clone for Tree<K, V> {
    fn clone(&self) -> Tree<K, V> {
        match self {
            Tree::Empty => Tree::Empty,
            Tree::DoubleEmpty => Tree::DoubleEmpty,
            Tree::Node(node) => Tree::Node(Ref::clone(node)),
        }
    }
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Tree<K, V> {
        Tree::Empty
    }
}

impl<K, V> Node<K, V> {
    #[inline]
    pub fn to_color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn as_key(&self) -> &K {
        self.datum.as_key()
    }

    #[inline]
    pub fn as_value(&self) -> &V {
        self.datum.as_value()
    }

    #[inline]
    pub fn as_datum(&self) -> &Datum<K, V> {
        &self.datum
    }

    #[inline]
    pub(crate) fn to_datum_ref(&self) -> Ref<Datum<K, V>> {
        Ref::clone(&self.datum)
    }

    #[inline]
    pub fn as_left(&self) -> &Tree<K, V> {
        &self.left
    }

    #[inline]
    pub fn as_right(&self) -> &Tree<K, V> {
        &self.right
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    // same children and datum, different color.
    fn paint(&self, color: Color) -> Tree<K, V> {
        Tree::node(color, self.left.clone(), self.datum.clone(), self.right.clone())
    }
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Tree<K, V> {
        Tree::Empty
    }

    pub(crate) fn node(
        color: Color,
        left: Tree<K, V>,
        datum: Ref<Datum<K, V>>,
        right: Tree<K, V>,
    ) -> Tree<K, V> {
        Tree::Node(Ref::new(Node {
            color,
            left,
            datum,
            right,
        }))
    }

    /// Return true for an empty tree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Empty)
    }

    /// Return color of the root node, None for leaves.
    #[inline]
    pub fn to_color(&self) -> Option<Color> {
        self.as_node().map(|node| node.color)
    }

    #[inline]
    pub fn as_node(&self) -> Option<&Node<K, V>> {
        match self {
            Tree::Node(node) => Some(&**node),
            Tree::Empty | Tree::DoubleEmpty => None,
        }
    }

    #[inline]
    fn as_red(&self) -> Option<&Node<K, V>> {
        self.as_node().filter(|node| node.color == Color::Red)
    }

    #[inline]
    fn as_black(&self) -> Option<&Node<K, V>> {
        self.as_node().filter(|node| node.color == Color::Black)
    }

    #[inline]
    fn is_red(&self) -> bool {
        self.as_red().is_some()
    }

    // double-empty leaf or double-black node.
    fn is_defect(&self) -> bool {
        match self {
            Tree::DoubleEmpty => true,
            Tree::Node(node) => node.color == Color::DoubleBlack,
            Tree::Empty => false,
        }
    }

    // take one unit of blackness out of a defect.
    fn lighten(&self) -> Tree<K, V> {
        match self {
            Tree::DoubleEmpty => Tree::Empty,
            Tree::Node(node) if node.color == Color::DoubleBlack => {
                node.paint(Color::Black)
            }
            Tree::Node(_) | Tree::Empty => {
                unreachable!("lighten(): no black deficit, call the programmer")
            }
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Search for `key`, return the matching node if present.
    pub fn search<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut tree = self;
        while let Tree::Node(node) = tree {
            tree = match node.datum.cmp_key(key) {
                Ordering::Less => &node.right,
                Ordering::Greater => &node.left,
                Ordering::Equal => return Some(&**node),
            };
        }
        None
    }

    /// Insert `key` and `value` and return the new tree. If `key` is
    /// already present, its datum is replaced with the new one.
    pub fn insert(&self, key: K, value: V) -> Tree<K, V>
    where
        K: Ord,
    {
        self.upsert(Ref::new(Datum::new(key, value))).0
    }

    /// Delete `key` and return the new tree. Deleting a missing key is a
    /// no-op, the returned tree has the same content as `self`.
    pub fn delete<Q>(&self, key: &Q) -> Tree<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).0
    }

    /// Same as insert, also return the datum that got replaced.
    pub(crate) fn upsert(
        &self,
        datum: Ref<Datum<K, V>>,
    ) -> (Tree<K, V>, Option<Ref<Datum<K, V>>>)
    where
        K: Ord,
    {
        let (root, old) = ins(self, datum);
        (blacken(root), old)
    }

    /// Same as delete, also return the datum that got removed.
    pub(crate) fn remove<Q>(&self, key: &Q) -> (Tree<K, V>, Option<Ref<Datum<K, V>>>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, old) = del(&redden(self), key);
        (discharge(root), old)
    }

    /// Count the number of entries, this is an O(n) walk.
    pub fn count(&self) -> usize {
        let mut stack: Vec<&Node<K, V>> = self.as_node().into_iter().collect();
        let mut n_count = 0;
        while let Some(node) = stack.pop() {
            n_count += 1;
            stack.extend(node.left.as_node());
            stack.extend(node.right.as_node());
        }
        n_count
    }

    /// Return the entry with smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.as_node()?;
        while let Some(left) = node.left.as_node() {
            node = left;
        }
        Some((node.as_key(), node.as_value()))
    }

    /// Return the entry with largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.as_node()?;
        while let Some(right) = node.right.as_node() {
            node = right;
        }
        Some((node.as_key(), node.as_value()))
    }

    /// Return an iterator over all entries in ascending key order. Every
    /// call starts a fresh walk from this version's root.
    pub fn iter(&self) -> Iter<K, V> {
        let mut paths = Vec::default();
        build_iter(IFlag::Left, self, &mut paths);

        Iter { paths, frwrd: true }
    }

    /// Range over all entries from low to high, specified by `range`.
    pub fn range<Q, R>(&self, range: R) -> Range<K, V, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        let mut paths = Vec::default();
        match range.start_bound() {
            Bound::Unbounded => build_iter(IFlag::Left, self, &mut paths),
            Bound::Included(low) => find_start(self, low, true, &mut paths),
            Bound::Excluded(low) => find_start(self, low, false, &mut paths),
        };
        let iter = Iter { paths, frwrd: true };

        Range {
            range,
            iter,
            fin: false,
            high: marker::PhantomData,
        }
    }

    /// Reverse range over all entries from high to low, specified by `range`.
    pub fn reverse<R, Q>(&self, range: R) -> Reverse<K, V, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        let mut paths = Vec::default();
        match range.end_bound() {
            Bound::Unbounded => build_iter(IFlag::Right, self, &mut paths),
            Bound::Included(high) => find_end(self, high, true, &mut paths),
            Bound::Excluded(high) => find_end(self, high, false, &mut paths),
        };
        let iter = Iter {
            paths,
            frwrd: false,
        };

        Reverse {
            range,
            iter,
            fin: false,
            low: marker::PhantomData,
        }
    }

    /// Validate tree with following rules and return the number of
    /// entries:
    ///
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * No double-black node and no double-empty leaf.
    /// * Keys are in strictly ascending order.
    pub fn validate(&self) -> Result<usize>
    where
        K: Ord + fmt::Debug,
    {
        let (n_count, _) = validate_tree(self, false, 0, 0)?;

        let mut iter = self.iter();
        if let Some((mut prev, _)) = iter.next() {
            for (key, _) in iter {
                if prev.ge(key) {
                    return err_at!(Fatal, msg: "sort {:?} >= {:?}", prev, key);
                }
                prev = key;
            }
        }

        Ok(n_count)
    }
}

//--------- insertion ----------------

fn ins<K, V>(tree: &Tree<K, V>, datum: Ref<Datum<K, V>>) -> (Tree<K, V>, Option<Ref<Datum<K, V>>>)
where
    K: Ord,
{
    let node = match tree {
        Tree::Node(node) => node,
        Tree::Empty | Tree::DoubleEmpty => {
            let leaf = Tree::node(Color::Red, Tree::Empty, datum, Tree::Empty);
            return (leaf, None);
        }
    };

    match node.datum.cmp_key(datum.as_key()) {
        Ordering::Greater => {
            let (left, old) = ins(&node.left, datum);
            let right = node.right.clone();
            (balance(node.color, left, node.datum.clone(), right), old)
        }
        Ordering::Less => {
            let (right, old) = ins(&node.right, datum);
            let left = node.left.clone();
            (balance(node.color, left, node.datum.clone(), right), old)
        }
        Ordering::Equal => {
            let (left, right) = (node.left.clone(), node.right.clone());
            (Tree::node(node.color, left, datum, right), Some(node.datum.clone()))
        }
    }
}

// Resolve a red-red violation one level below, for a black `color`.
// Each of the four shapes is rebuilt as
//
//                   (r)
//                    y
//                  /   \
//                (b)   (b)
//                 x     z
//                / \   / \
//               a   b c   d
//
// For a double-black `color`, used by deletion, the two inner shapes are
// rebuilt the same way with a black top.
fn balance<K, V>(
    color: Color,
    left: Tree<K, V>,
    datum: Ref<Datum<K, V>>,
    right: Tree<K, V>,
) -> Tree<K, V> {
    use Color::{Black, DoubleBlack, Red};

    let top = match color {
        Black => Red,
        DoubleBlack => Black,
        Red => return Tree::node(color, left, datum, right),
    };

    if let Some(l) = left.as_red() {
        if color == Black {
            if let Some(ll) = l.left.as_red() {
                let a = ll.paint(Black);
                let b = Tree::node(Black, l.right.clone(), datum, right);
                return Tree::node(top, a, l.datum.clone(), b);
            }
        }
        if let Some(lr) = l.right.as_red() {
            let a = Tree::node(Black, l.left.clone(), l.datum.clone(), lr.left.clone());
            let b = Tree::node(Black, lr.right.clone(), datum, right);
            return Tree::node(top, a, lr.datum.clone(), b);
        }
    }

    if let Some(r) = right.as_red() {
        if let Some(rl) = r.left.as_red() {
            let a = Tree::node(Black, left, datum, rl.left.clone());
            let b = Tree::node(Black, rl.right.clone(), r.datum.clone(), r.right.clone());
            return Tree::node(top, a, rl.datum.clone(), b);
        }
        if color == Black {
            if let Some(rr) = r.right.as_red() {
                let a = Tree::node(Black, left, datum, r.left.clone());
                let b = rr.paint(Black);
                return Tree::node(top, a, r.datum.clone(), b);
            }
        }
    }

    Tree::node(color, left, datum, right)
}

// balance() leaves at most a red root with a red child.
fn blacken<K, V>(tree: Tree<K, V>) -> Tree<K, V> {
    if let Some(node) = tree.as_red() {
        if node.left.is_red() || node.right.is_red() {
            return node.paint(Color::Black);
        }
    }
    tree
}

//--------- deletion ----------------

fn redden<K, V>(tree: &Tree<K, V>) -> Tree<K, V> {
    match tree.as_black() {
        Some(node) if node.left.as_black().is_some() && node.right.as_black().is_some() => {
            node.paint(Color::Red)
        }
        _ => tree.clone(),
    }
}

// a deficit at the root has no parent, drop it.
fn discharge<K, V>(tree: Tree<K, V>) -> Tree<K, V> {
    if tree.is_defect() {
        tree.lighten()
    } else {
        tree
    }
}

fn del<K, V, Q>(tree: &Tree<K, V>, key: &Q) -> (Tree<K, V>, Option<Ref<Datum<K, V>>>)
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    use Color::{Black, Red};

    let node = match tree {
        Tree::Empty => return (Tree::Empty, None),
        Tree::DoubleEmpty => return (Tree::DoubleEmpty, None),
        Tree::Node(node) => node,
    };

    if node.is_leaf() {
        return match (node.color, node.datum.cmp_key(key)) {
            (Red, Ordering::Equal) => (Tree::Empty, Some(node.datum.clone())),
            (Black, Ordering::Equal) => (Tree::DoubleEmpty, Some(node.datum.clone())),
            (_, _) => (tree.clone(), None),
        };
    }

    //              (b)                (b)
    //               z                  y
    //              /      x == z
    //            (r)      ------>
    //             y
    //
    if node.color == Black && node.right.is_empty() {
        if let Some(l) = node.left.as_red().filter(|l| l.is_leaf()) {
            return match node.datum.cmp_key(key) {
                Ordering::Greater => {
                    let (left, old) = del(&node.left, key);
                    let datum = node.datum.clone();
                    (Tree::node(Black, left, datum, Tree::Empty), old)
                }
                Ordering::Equal => (l.paint(Black), Some(node.datum.clone())),
                Ordering::Less => (tree.clone(), None),
            };
        }
    }

    match node.datum.cmp_key(key) {
        Ordering::Greater => {
            let (left, old) = del(&node.left, key);
            let (datum, right) = (node.datum.clone(), node.right.clone());
            (rotate(node.color, left, datum, right), old)
        }
        Ordering::Less => {
            let (right, old) = del(&node.right, key);
            let (left, datum) = (node.left.clone(), node.datum.clone());
            (rotate(node.color, left, datum, right), old)
        }
        Ordering::Equal => match &node.right {
            Tree::Node(right) => {
                let (datum, right) = min_del(right);
                let left = node.left.clone();
                (rotate(node.color, left, datum, right), Some(node.datum.clone()))
            }
            Tree::Empty | Tree::DoubleEmpty => {
                unreachable!("del(): inner node without right child, call the programmer")
            }
        },
    }
}

// Remove the smallest entry under `node`, return its datum and what is
// left of the sub-tree, which may carry a deficit.
fn min_del<K, V>(node: &Node<K, V>) -> (Ref<Datum<K, V>>, Tree<K, V>) {
    use Color::{Black, Red};

    if let Tree::Node(left) = &node.left {
        let (datum, left) = min_del(left);
        let right = node.right.clone();
        return (datum, rotate(node.color, left, node.datum.clone(), right));
    }

    match (node.color, &node.right) {
        (Red, Tree::Empty) => (node.datum.clone(), Tree::Empty),
        (Black, Tree::Empty) => (node.datum.clone(), Tree::DoubleEmpty),
        (Black, Tree::Node(right)) if right.color == Red && right.is_leaf() => {
            (node.datum.clone(), right.paint(Black))
        }
        (_, _) => unreachable!("min_del(): malformed sub-tree, call the programmer"),
    }
}

// Absorb a deficit carried by `left` or `right`. With a black sibling the
// deficit and the parent's color are folded together and handed to
// balance(), which may still leave a double-black top for the caller.
//
//        (c)                              (c+1)
//         y                                 z
//        / \          rotate              /   \
//     (bb)  (b)       ------>           (r)    d     => balance
//      a     z                           y
//           / \                         / \
//          c   d                      (b)  c
//                                      a
//
// With a red sibling, under a black parent, the sibling is lifted and
// demoted, and the deficit is pushed one level down where it meets a
// black sibling under a red parent.
//
//        (b)                        (b)
//         x                          z
//        / \        rotate          / \
//     (bb)  (r)     ------>       (r)  e     => rotate (r) a x c
//      a     z                     x
//           / \                   / \
//         (b)  e               (bb)  (b)
//          c                    a     c
//
fn rotate<K, V>(
    color: Color,
    left: Tree<K, V>,
    datum: Ref<Datum<K, V>>,
    right: Tree<K, V>,
) -> Tree<K, V> {
    use Color::{Black, DoubleBlack, Red};

    let darker = match color {
        Red => Black,
        Black => DoubleBlack,
        DoubleBlack => return Tree::node(color, left, datum, right),
    };

    if left.is_defect() {
        if let Some(r) = right.as_black() {
            let l = Tree::node(Red, left.lighten(), datum, r.left.clone());
            return balance(darker, l, r.datum.clone(), r.right.clone());
        }
        if color == Black {
            if let Some(r) = right.as_red().filter(|r| r.left.as_black().is_some()) {
                let l = rotate(Red, left, datum, r.left.clone());
                return Tree::node(Black, l, r.datum.clone(), r.right.clone());
            }
        }
    }

    if right.is_defect() {
        if let Some(l) = left.as_black() {
            let r = Tree::node(Red, l.right.clone(), datum, right.lighten());
            return balance(darker, l.left.clone(), l.datum.clone(), r);
        }
        if color == Black {
            if let Some(l) = left.as_red().filter(|l| l.right.as_black().is_some()) {
                let r = rotate(Red, l.right.clone(), datum, right);
                return Tree::node(Black, l.left.clone(), l.datum.clone(), r);
            }
        }
    }

    Tree::node(color, left, datum, right)
}

//--------- validation ----------------

fn validate_tree<K, V>(
    tree: &Tree<K, V>,
    fromred: bool,
    mut n_count: usize,
    mut n_blacks: usize,
) -> Result<(usize, usize)>
where
    K: fmt::Debug,
{
    let node = match tree {
        Tree::Empty => return Ok((n_count, n_blacks)),
        Tree::DoubleEmpty => return err_at!(Fatal, msg: "double-empty leaf"),
        Tree::Node(node) => node,
    };
    n_count += 1;

    match node.color {
        Color::DoubleBlack => {
            return err_at!(Fatal, msg: "double-black node {:?}", node.as_key());
        }
        Color::Red if fromred => {
            return err_at!(Fatal, msg: "consecutive reds at {:?}", node.as_key());
        }
        Color::Red => (),
        Color::Black => n_blacks += 1,
    }

    let red = node.color == Color::Red;
    let (n_count, lb) = validate_tree(&node.left, red, n_count, n_blacks)?;
    let (n_count, rb) = validate_tree(&node.right, red, n_count, n_blacks)?;
    if lb != rb {
        return err_at!(Fatal, msg: "unbalanced blacks {} {} at {:?}", lb, rb, node.as_key());
    }

    Ok((n_count, lb))
}

//--------- iteration ----------------

#[derive(Debug)]
pub struct Iter<'a, K, V> {
    paths: Vec<Fragment<'a, K, V>>,
    frwrd: bool,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn next_node(&mut self) -> Option<&'a Node<K, V>> {
        loop {
            let path = self.paths.last_mut()?;
            let node = path.node;
            if self.frwrd {
                match path.flag {
                    IFlag::Left => {
                        path.flag = IFlag::Center;
                        break Some(node);
                    }
                    IFlag::Center => {
                        path.flag = IFlag::Right;
                        build_iter(IFlag::Left, &node.right, &mut self.paths)
                    }
                    IFlag::Right => {
                        self.paths.pop();
                    }
                }
            } else {
                match path.flag {
                    IFlag::Right => {
                        path.flag = IFlag::Center;
                        break Some(node);
                    }
                    IFlag::Center => {
                        path.flag = IFlag::Left;
                        build_iter(IFlag::Right, &node.left, &mut self.paths)
                    }
                    IFlag::Left => {
                        self.paths.pop();
                    }
                }
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next_node()?;
        Some((node.as_key(), node.as_value()))
    }
}

#[derive(Debug)]
pub struct Range<'a, K, V, R, Q>
where
    Q: ?Sized,
{
    range: R,
    iter: Iter<'a, K, V>,
    fin: bool,
    high: marker::PhantomData<Q>,
}

impl<'a, K, V, R, Q> Iterator for Range<'a, K, V, R, Q>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self.fin {
            false => {
                let (key, val) = self.iter.next()?;
                match self.range.end_bound() {
                    Bound::Included(high) if key.borrow().le(high) => Some((key, val)),
                    Bound::Excluded(high) if key.borrow().lt(high) => Some((key, val)),
                    Bound::Unbounded => Some((key, val)),
                    Bound::Included(_) | Bound::Excluded(_) => {
                        self.fin = true;
                        None
                    }
                }
            }
            true => None,
        }
    }
}

#[derive(Debug)]
pub struct Reverse<'a, K, V, R, Q>
where
    Q: ?Sized,
{
    range: R,
    iter: Iter<'a, K, V>,
    fin: bool,
    low: marker::PhantomData<Q>,
}

impl<'a, K, V, R, Q> Iterator for Reverse<'a, K, V, R, Q>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self.fin {
            false => {
                let (key, val) = self.iter.next()?;
                match self.range.start_bound() {
                    Bound::Included(low) if key.borrow().ge(low) => Some((key, val)),
                    Bound::Excluded(low) if key.borrow().gt(low) => Some((key, val)),
                    Bound::Unbounded => Some((key, val)),
                    Bound::Included(_) | Bound::Excluded(_) => {
                        self.fin = true;
                        None
                    }
                }
            }
            true => None,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum IFlag {
    Left,
    Center,
    Right,
}

struct Fragment<'a, K, V> {
    flag: IFlag,
    node: &'a Node<K, V>,
}

impl<'a, K, V> fmt::Debug for Fragment<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fragment<{:?}>", self.flag)
    }
}

fn build_iter<'a, K, V>(
    flag: IFlag,
    tree: &'a Tree<K, V>,
    paths: &mut Vec<Fragment<'a, K, V>>,
) {
    if let Some(node) = tree.as_node() {
        let tree = match flag {
            IFlag::Left => &node.left,
            IFlag::Right => &node.right,
            IFlag::Center => unreachable!(),
        };
        paths.push(Fragment { flag, node });
        build_iter(flag, tree, paths)
    }
}

fn find_start<'a, K, V, Q>(
    tree: &'a Tree<K, V>,
    low: &Q,
    incl: bool,
    paths: &mut Vec<Fragment<'a, K, V>>,
) where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    if let Some(node) = tree.as_node() {
        let cmp = node.datum.cmp_key(low);

        let flag = match cmp {
            Ordering::Less => IFlag::Right,
            Ordering::Equal if incl => IFlag::Left,
            Ordering::Equal => IFlag::Center,
            Ordering::Greater => IFlag::Left,
        };
        paths.push(Fragment { flag, node });

        match cmp {
            Ordering::Equal => (),
            Ordering::Less => find_start(&node.right, low, incl, paths),
            Ordering::Greater => find_start(&node.left, low, incl, paths),
        }
    }
}

fn find_end<'a, K, V, Q>(
    tree: &'a Tree<K, V>,
    high: &Q,
    incl: bool,
    paths: &mut Vec<Fragment<'a, K, V>>,
) where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    if let Some(node) = tree.as_node() {
        let cmp = node.datum.cmp_key(high);

        let flag = match cmp {
            Ordering::Less => IFlag::Right,
            Ordering::Equal if incl => IFlag::Right,
            Ordering::Equal => IFlag::Center,
            Ordering::Greater => IFlag::Left,
        };
        paths.push(Fragment { flag, node });

        match cmp {
            Ordering::Equal => (),
            Ordering::Less => find_end(&node.right, high, incl, paths),
            Ordering::Greater => find_end(&node.left, high, incl, paths),
        }
    }
}

//--------- formatting ----------------

// S-expression form, `(B (R E 1:() E) 2:() E)`.
impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tree::Empty => write!(f, "E"),
            Tree::DoubleEmpty => write!(f, "EE"),
            Tree::Node(node) => {
                let color = match node.color {
                    Color::Red => "R",
                    Color::Black => "B",
                    Color::DoubleBlack => "BB",
                };
                write!(f, "({} {:?} {:?} {:?})", color, node.left, node.datum, node.right)
            }
        }
    }
}
