// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A sorted dictionary.
//!
//! A copy-on-write map from keys to values implemented as a [B-tree] [1],
//! keeping its keys in order. Cloning a dictionary is O(1); the clone and
//! the original share every node until one of them is written to, and a
//! write only copies the nodes on the way to the element it changes.
//!
//! Positions in the dictionary are [`Index`] values. An index is checked
//! against the dictionary each time it is used, and any write invalidates
//! all indices issued before it.
//!
//! [1]: https://en.wikipedia.org/wiki/B-tree

use std::borrow::Borrow;
use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};
use std::ops::RangeBounds;

use archery::SharedPointerKind;

use crate::btree::{self, BTree};
use crate::nodes;
use crate::shared_ptr::DefaultSharedPtr;

mod index;

pub use self::index::Index;

/// Construct a dictionary from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate sorted_collections;
/// # use sorted_collections::sorted_dict::SortedDict;
/// # fn main() {
/// let dict = sorted_dict! { 3 => "c", 1 => "a", 2 => "b" };
/// assert_eq!(Some(&"a"), dict.get(&1));
/// assert_eq!(vec![1, 2, 3], dict.keys().copied().collect::<Vec<_>>());
/// # }
/// ```
#[macro_export]
macro_rules! sorted_dict {
    () => { $crate::sorted_dict::SortedDict::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::sorted_dict::SortedDict::new();
        $(
            map.insert($key, $value);
        )*
        map
    }};
}

/// Type alias for [`GenericSortedDict`] that uses [`DefaultSharedPtr`] as the pointer type.
///
/// [GenericSortedDict]: ./struct.GenericSortedDict.html
/// [DefaultSharedPtr]: ../shared_ptr/type.DefaultSharedPtr.html
pub type SortedDict<K, V> = GenericSortedDict<K, V, DefaultSharedPtr>;

/// A sorted dictionary.
///
/// Keys are kept in ascending order. Inserting a key that is already
/// present replaces its value. Lookups, insertions and positional access
/// are O(log n).
///
/// The copy-on-write check is a reference count test, so a dictionary
/// built on [`RcK`][crate::shared_ptr::RcK] cannot leave the thread that
/// made it. Use [`ArcK`][crate::shared_ptr::ArcK] for dictionaries that
/// cross threads.
pub struct GenericSortedDict<K, V, P: SharedPointerKind> {
    tree: BTree<K, V, P>,
}

impl<K, V, P: SharedPointerKind> GenericSortedDict<K, V, P> {
    /// Construct an empty dictionary.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        GenericSortedDict { tree: BTree::new() }
    }

    /// Construct an empty dictionary whose nodes all hold up to
    /// `capacity` elements.
    ///
    /// Panics if `capacity` is less than 2.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        GenericSortedDict {
            tree: BTree::with_capacity(capacity),
        }
    }

    /// Construct an empty dictionary with separate element capacities for
    /// leaf and internal nodes.
    ///
    /// Panics if either capacity is less than 2.
    #[must_use]
    pub fn with_capacities(leaf_capacity: usize, internal_capacity: usize) -> Self {
        GenericSortedDict {
            tree: BTree::with_capacities(leaf_capacity, internal_capacity),
        }
    }

    /// Test whether a dictionary is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the number of entries in a dictionary.
    ///
    /// Time: O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate sorted_collections;
    /// # fn main() {
    /// assert_eq!(3, sorted_dict! { 1 => 11, 2 => 22, 3 => 33 }.len());
    /// # }
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Test whether two dictionaries refer to the same content in memory.
    ///
    /// This is true for a dictionary and a fresh clone of it, until one
    /// of them is written to.
    ///
    /// Time: O(1)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.tree.ptr_eq(&other.tree)
    }

    /// Discard all entries, keeping the node capacities.
    ///
    /// Time: O(1), plus dropping nodes no other dictionary shares
    pub fn clear(&mut self) {
        self.tree = self.tree.new_like();
    }

    /// Get an iterator over the key/value pairs of a dictionary, in key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter {
            it: self.tree.iter(),
        }
    }

    /// Get an iterator over a dictionary's keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys { it: self.iter() }
    }

    /// Get an iterator over a dictionary's values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values { it: self.iter() }
    }

    /// Get the entry with the smallest key.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_min(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    /// Get the entry with the largest key.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_max(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    /// Get the entry at in-order position `offset`.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_index(&self, offset: usize) -> Option<(&K, &V)> {
        self.tree.get_index(offset)
    }
}

impl<K, V, P> GenericSortedDict<K, V, P>
where
    K: Ord,
    P: SharedPointerKind,
{
    /// Get the value for a key.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate sorted_collections;
    /// # fn main() {
    /// let dict = sorted_dict! { 123 => "lol" };
    /// assert_eq!(Some(&"lol"), dict.get(&123));
    /// assert_eq!(None, dict.get(&321));
    /// # }
    /// ```
    #[must_use]
    pub fn get<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.tree.first_value(key)
    }

    /// Test for the presence of a key.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.tree.contains_key(key)
    }

    /// Get an iterator over the entries whose keys fall in `range`.
    ///
    /// An empty or inverted range yields nothing.
    #[must_use]
    pub fn range<R, BK>(&self, range: R) -> Iter<'_, K, V, P>
    where
        R: RangeBounds<BK>,
        K: Borrow<BK>,
        BK: Ord + ?Sized,
    {
        Iter {
            it: self.tree.range(range),
        }
    }
}

impl<K, V, P> GenericSortedDict<K, V, P>
where
    K: Ord + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    /// Construct a dictionary from pairs whose keys are all distinct.
    ///
    /// Each pair is inserted without looking for an existing entry, so
    /// this skips the update check [`insert`][Self::insert] makes. If a
    /// key does repeat, every pair with it is kept and lookups find the
    /// first of them.
    ///
    /// Time: O(n log n)
    #[must_use]
    pub fn from_unique_keys_with_values<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut dict = Self::new();
        for (key, value) in pairs {
            dict.tree.insert_key(key, value);
        }
        dict
    }

    /// Insert a key/value mapping, returning the previous value for the
    /// key if there was one.
    ///
    /// If the key appears more than once (see
    /// [`from_unique_keys_with_values`][Self::from_unique_keys_with_values])
    /// the first entry, the one [`get`][Self::get] returns, is replaced.
    ///
    /// Time: O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// # use sorted_collections::sorted_dict::SortedDict;
    /// let mut dict = SortedDict::new();
    /// assert_eq!(None, dict.insert(1, "one"));
    /// assert_eq!(Some("one"), dict.insert(1, "uno"));
    /// assert_eq!(Some(&"uno"), dict.get(&1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.update_first_or_insert(key, value)
    }

    /// Get a mutable reference to the value for a key.
    ///
    /// Invalidates every outstanding [`Index`] when the key is present.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.tree.get_mut(key)
    }
}

// Core traits

impl<K, V, P: SharedPointerKind> Clone for GenericSortedDict<K, V, P> {
    /// Clone a dictionary.
    ///
    /// Time: O(1)
    #[inline]
    fn clone(&self) -> Self {
        GenericSortedDict {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V, P: SharedPointerKind> Default for GenericSortedDict<K, V, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> PartialEq for GenericSortedDict<K, V, P>
where
    K: PartialEq,
    V: PartialEq,
    P: SharedPointerKind,
{
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<K: Eq, V: Eq, P: SharedPointerKind> Eq for GenericSortedDict<K, V, P> {}

impl<K: Debug, V: Debug, P: SharedPointerKind> Debug for GenericSortedDict<K, V, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, BK, K, V, P> std::ops::Index<&'a BK> for GenericSortedDict<K, V, P>
where
    BK: Ord + ?Sized,
    K: Ord + Borrow<BK>,
    P: SharedPointerKind,
{
    type Output = V;

    fn index(&self, key: &BK) -> &Self::Output {
        match self.get(key) {
            None => panic!("SortedDict::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, P> FromIterator<(K, V)> for GenericSortedDict<K, V, P>
where
    K: Ord + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<K, V, P> Extend<(K, V)> for GenericSortedDict<K, V, P>
where
    K: Ord + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, P> From<Vec<(K, V)>> for GenericSortedDict<K, V, P>
where
    K: Ord + Clone,
    V: Clone,
    P: SharedPointerKind,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

// Iterators

/// An iterator over the entries of a dictionary, in key order.
pub struct Iter<'a, K, V, P: SharedPointerKind> {
    it: nodes::Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Clone for Iter<'a, K, V, P> {
    fn clone(&self) -> Self {
        Iter {
            it: self.it.clone(),
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> DoubleEndedIterator for Iter<'a, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back()
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Iter<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Iter<'a, K, V, P> {}

/// An iterator over the keys of a dictionary.
pub struct Keys<'a, K, V, P: SharedPointerKind> {
    it: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> DoubleEndedIterator for Keys<'a, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Keys<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Keys<'a, K, V, P> {}

/// An iterator over the values of a dictionary, in key order.
pub struct Values<'a, K, V, P: SharedPointerKind> {
    it: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, P: SharedPointerKind> DoubleEndedIterator for Values<'a, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Values<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> FusedIterator for Values<'a, K, V, P> {}

/// A consuming iterator over the entries of a dictionary, in key order.
///
/// Entries are cloned out of nodes that other dictionaries may share.
pub struct ConsumingIter<K, V, P: SharedPointerKind> {
    it: btree::ConsumingIter<K, V, P>,
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Iterator for ConsumingIter<K, V, P> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> DoubleEndedIterator for ConsumingIter<K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back()
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> ExactSizeIterator for ConsumingIter<K, V, P> {}

impl<K: Clone, V: Clone, P: SharedPointerKind> FusedIterator for ConsumingIter<K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> IntoIterator for &'a GenericSortedDict<K, V, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> IntoIterator for GenericSortedDict<K, V, P> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter {
            it: self.tree.into_consuming_iter(),
        }
    }
}
