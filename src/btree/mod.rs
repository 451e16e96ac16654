// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A copy-on-write B-tree with duplicate keys and positional access.
//!
//! Elements live in internal nodes as well as leaves. Every node knows the
//! number of elements in its subtree, which makes offset lookups O(log n).
//! Cloning a tree shares its root; writes copy the nodes on the path they
//! touch when those are shared.

use std::borrow::Borrow;
use std::mem;
use std::ops::{Range, RangeBounds};

use archery::{SharedPointer, SharedPointerKind};
use tracing::trace;

use crate::config::{
    DEFAULT_INTERNAL_CAPACITY, DEFAULT_LEAF_CAPACITY, EXPECTED_MAX_DEPTH, MIN_CAPACITY,
};
use crate::nodes::{Cursor, Iter, Node, NodeRef, Splinter};
use crate::util::to_offset_range;

mod path;

pub(crate) use self::path::{ConsumingIter, Path};

enum InsertAction<K, V, P: SharedPointerKind> {
    /// A new element went in below without reshaping the caller's child.
    Inserted,
    /// An existing value was replaced; holds the old value.
    Updated(V),
    /// The key is equal to a separator above the leaf it reached and not
    /// present in that leaf; holds the new value for the deepest such
    /// separator to take.
    Deferred(V),
    /// The child split; the caller inserts the splinter next to it.
    Split(Splinter<K, V, P>),
}

pub(crate) struct BTree<K, V, P: SharedPointerKind> {
    root: NodeRef<K, V, P>,
    leaf_capacity: usize,
    internal_capacity: usize,
    /// Bumped by every write, so positions handed out before it can be
    /// told apart from current ones.
    generation: u64,
}

impl<K, V, P: SharedPointerKind> Clone for BTree<K, V, P> {
    fn clone(&self) -> Self {
        BTree {
            root: self.root.clone(),
            leaf_capacity: self.leaf_capacity,
            internal_capacity: self.internal_capacity,
            generation: self.generation,
        }
    }
}

impl<K, V, P: SharedPointerKind> BTree<K, V, P> {
    pub(crate) fn new() -> Self {
        Self::with_capacities(DEFAULT_LEAF_CAPACITY, DEFAULT_INTERNAL_CAPACITY)
    }

    /// Panics if `capacity` is below 2.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self::with_capacities(capacity, capacity)
    }

    /// Panics if either capacity is below 2.
    pub(crate) fn with_capacities(leaf_capacity: usize, internal_capacity: usize) -> Self {
        // The internal capacity is first used at the first root split.
        assert!(
            internal_capacity >= MIN_CAPACITY,
            "node capacity must be at least {}, got {}",
            MIN_CAPACITY,
            internal_capacity
        );
        BTree {
            root: SharedPointer::new(Node::new(leaf_capacity, true)),
            leaf_capacity,
            internal_capacity,
            generation: 0,
        }
    }

    /// An empty tree with the same node capacities.
    pub(crate) fn new_like(&self) -> Self {
        Self::with_capacities(self.leaf_capacity, self.internal_capacity)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.root.total_elements()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn root(&self) -> &NodeRef<K, V, P> {
        &self.root
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        SharedPointer::ptr_eq(&self.root, &other.root)
    }

    /// The number of levels in the tree; a lone leaf has height 1.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while !node.is_leaf() {
            node = node.child_at(0);
            height += 1;
        }
        height
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V, P> {
        Iter::new(&self.root, 0..self.len())
    }

    pub(crate) fn iter_offsets(&self, offsets: Range<usize>) -> Iter<'_, K, V, P> {
        Iter::new(&self.root, offsets)
    }

    pub(crate) fn into_consuming_iter(self) -> ConsumingIter<K, V, P> {
        ConsumingIter::new(self.root)
    }

    pub(crate) fn first(&self) -> Option<(&K, &V)> {
        Cursor::empty().seek_to_first(&self.root)
    }

    pub(crate) fn last(&self) -> Option<(&K, &V)> {
        Cursor::empty().seek_to_last(&self.root)
    }

    pub(crate) fn get_index(&self, offset: usize) -> Option<(&K, &V)> {
        Cursor::empty().seek_to_offset(&self.root, offset)
    }

    /// The path to the first element, or `None` when the tree is empty.
    pub(crate) fn first_path(&self) -> Option<Path<K, V, P>> {
        let mut cursor = Cursor::empty();
        cursor.seek_to_first(&self.root);
        Path::from_cursor(&cursor)
    }

    /// The path to the last element, or `None` when the tree is empty.
    pub(crate) fn last_path(&self) -> Option<Path<K, V, P>> {
        let mut cursor = Cursor::empty();
        cursor.seek_to_last(&self.root);
        Path::from_cursor(&cursor)
    }

    /// The path to the element at in-order `offset`.
    ///
    /// Panics if `offset` is not less than the number of elements.
    pub(crate) fn path_to_element(&self, offset: usize) -> Path<K, V, P> {
        assert!(offset < self.len(), "element offset out of bounds");
        let mut cursor = Cursor::empty();
        cursor.seek_to_offset(&self.root, offset);
        match Path::from_cursor(&cursor) {
            Some(path) => path,
            None => unreachable!("in-bounds offset produced no path"),
        }
    }

    /// The in-order offset of the element `path` points at.
    pub(crate) fn offset_of(&self, path: &Path<K, V, P>) -> usize {
        match path.cursor(&self.root).position() {
            Some(offset) => offset,
            None => unreachable!("path cursor is never empty"),
        }
    }
}

impl<K: Ord, V, P: SharedPointerKind> BTree<K, V, P> {
    /// Finds the value of some element with `key`, stopping at the first
    /// match on the way down. Unlike [`first_value`][Self::first_value] it
    /// may return any of several equal keys, so it is only the first one
    /// when keys are unique.
    pub(crate) fn any_value<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.root.lookup(key)
    }

    /// Finds the value of the first element with `key` in sorted order.
    pub(crate) fn first_value<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let mut found = None;
        let mut node = &self.root;
        loop {
            let slot = node.first_slot(key);
            if slot < node.len() && node.key_at(slot).borrow() == key {
                found = Some(node.value_at(slot));
            }
            if node.is_leaf() {
                return found;
            }
            node = node.child_at(slot);
        }
    }

    /// Locates the first element with `key` as child offsets from the root
    /// and a slot, without taking references to any node.
    ///
    /// Every equal key further left in sorted order lives in the child just
    /// left of a match, so the deepest match on the `first_slot` descent is
    /// the first occurrence.
    fn locate_first<BK>(&self, key: &BK) -> Option<(Vec<usize>, usize)>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let mut offsets = Vec::with_capacity(EXPECTED_MAX_DEPTH);
        let mut found = None;
        let mut node = &self.root;
        loop {
            let slot = node.first_slot(key);
            if slot < node.len() && node.key_at(slot).borrow() == key {
                found = Some((offsets.len(), slot));
            }
            if node.is_leaf() {
                break;
            }
            offsets.push(slot);
            node = node.child_at(slot);
        }
        let (depth, slot) = found?;
        offsets.truncate(depth);
        Some((offsets, slot))
    }

    /// The path to the first element with `key` in sorted order.
    pub(crate) fn find_first_key<BK>(&self, key: &BK) -> Option<Path<K, V, P>>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let (offsets, slot) = self.locate_first(key)?;
        Path::from_cursor(&Cursor::from_offsets(&self.root, &offsets, slot))
    }

    pub(crate) fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.any_value(key).is_some()
    }

    /// The number of elements whose key is less than `key`.
    pub(crate) fn lower_bound_offset<BK>(&self, key: &BK) -> usize
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.count_before(|node| node.first_slot(key))
    }

    /// The number of elements whose key is less than or equal to `key`.
    pub(crate) fn upper_bound_offset<BK>(&self, key: &BK) -> usize
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.count_before(|node| node.last_slot(key))
    }

    fn count_before<F>(&self, search: F) -> usize
    where
        F: Fn(&Node<K, V, P>) -> usize,
    {
        let mut count = 0;
        let mut node = &self.root;
        loop {
            let slot = search(node);
            if node.is_leaf() {
                return count + slot;
            }
            count += slot + node.children_total(slot);
            node = node.child_at(slot);
        }
    }

    /// Iterates over the elements whose keys fall in `range`.
    pub(crate) fn range<R, BK>(&self, range: R) -> Iter<'_, K, V, P>
    where
        R: RangeBounds<BK>,
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let offsets = to_offset_range(
            &range,
            self.len(),
            |key| self.lower_bound_offset(key),
            |key| self.upper_bound_offset(key),
        );
        self.iter_offsets(offsets)
    }

    #[cfg(any(test, feature = "debug"))]
    pub(crate) fn check_invariants(&self) {
        let depth = self.root.check_invariants();
        assert_eq!(depth + 1, self.height(), "tree height is inconsistent");
    }
}

impl<K: Ord + Clone, V: Clone, P: SharedPointerKind> BTree<K, V, P> {
    /// Replaces the value of the first element with `key` in sorted order,
    /// the one [`first_value`][Self::first_value] reads, or appends a new
    /// element after every element with a key not greater than `key`.
    ///
    /// Returns the replaced value.
    pub(crate) fn update_first_or_insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate_first(&key) {
            Some((offsets, slot)) => {
                self.generation += 1;
                Some(mem::replace(self.value_at_mut(&offsets, slot), value))
            }
            None => {
                self.insert_key(key, value);
                None
            }
        }
    }

    /// Replaces the value of the last element with `key` in sorted order,
    /// or inserts a new element after every smaller key.
    ///
    /// Returns the replaced value. Takes a single descent, unlike
    /// [`update_first_or_insert`][Self::update_first_or_insert].
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        self.generation += 1;
        match Self::insert_into(&mut self.root, key, value, false, true) {
            InsertAction::Inserted => None,
            InsertAction::Updated(old) => Some(old),
            InsertAction::Deferred(_) => unreachable!("update deferred past the root"),
            InsertAction::Split(splinter) => {
                self.grow(splinter);
                None
            }
        }
    }

    /// Inserts a new element after every element with a key less than or
    /// equal to `key`. Equal keys are kept, in insertion order.
    pub(crate) fn insert_key(&mut self, key: K, value: V) {
        self.generation += 1;
        match Self::insert_into(&mut self.root, key, value, false, false) {
            InsertAction::Inserted => {}
            InsertAction::Split(splinter) => self.grow(splinter),
            InsertAction::Updated(_) | InsertAction::Deferred(_) => {
                unreachable!("plain insertion never updates")
            }
        }
    }

    /// `found_above` is set when an ancestor's separator just left of the
    /// descent equals `key`; that separator is then the last occurrence
    /// unless a deeper one turns up.
    fn insert_into(
        node: &mut NodeRef<K, V, P>,
        key: K,
        value: V,
        found_above: bool,
        update: bool,
    ) -> InsertAction<K, V, P> {
        let node = Node::update(node);
        let slot = node.last_slot(&key);
        let here = update && slot > 0 && *node.key_at(slot - 1) == key;
        if node.is_leaf() {
            if here {
                return InsertAction::Updated(mem::replace(node.value_at_mut(slot - 1), value));
            }
            if found_above {
                return InsertAction::Deferred(value);
            }
            return match node.immediately_insert((key, value), None, slot) {
                Some(splinter) => InsertAction::Split(splinter),
                None => InsertAction::Inserted,
            };
        }
        match Self::insert_into(node.child_at_mut(slot), key, value, found_above || here, update) {
            InsertAction::Inserted => {
                node.count_descendant_insert();
                InsertAction::Inserted
            }
            InsertAction::Updated(old) => InsertAction::Updated(old),
            InsertAction::Deferred(value) if here => {
                InsertAction::Updated(mem::replace(node.value_at_mut(slot - 1), value))
            }
            InsertAction::Deferred(value) => InsertAction::Deferred(value),
            InsertAction::Split(splinter) => {
                match node.immediately_insert(splinter.median, Some(splinter.right), slot) {
                    Some(splinter) => InsertAction::Split(splinter),
                    None => InsertAction::Inserted,
                }
            }
        }
    }

    fn grow(&mut self, splinter: Splinter<K, V, P>) {
        let left = self.root.clone();
        self.root = SharedPointer::new(Node::new_root(
            left,
            splinter.median,
            splinter.right,
            self.internal_capacity,
        ));
        trace!(height = self.height(), len = self.len(), "root split");
    }

    /// Replaces the value at `path`, copying shared nodes along the way.
    ///
    /// `path` must have come from this tree at its current generation.
    pub(crate) fn set_value(&mut self, path: &Path<K, V, P>, value: V) -> V {
        let (offsets, slot) = (path.offsets().to_vec(), path.slot());
        self.generation += 1;
        mem::replace(self.value_at_mut(&offsets, slot), value)
    }

    /// A mutable reference to the value of the first element with `key`.
    pub(crate) fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let (offsets, slot) = self.locate_first(key)?;
        self.generation += 1;
        Some(self.value_at_mut(&offsets, slot))
    }

    fn value_at_mut(&mut self, offsets: &[usize], slot: usize) -> &mut V {
        let mut node = Node::update(&mut self.root);
        for &offset in offsets {
            node = Node::update(node.child_at_mut(offset));
        }
        node.value_at_mut(slot)
    }
}

#[cfg(test)]
impl<K, V, P: SharedPointerKind> BTree<K, V, P> {
    fn from_root(root: Node<K, V, P>, internal_capacity: usize) -> Self {
        BTree {
            leaf_capacity: root.capacity(),
            root: SharedPointer::new(root),
            internal_capacity,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared_ptr::{ArcK, RcK};
    use ::proptest::{collection, proptest};
    use pretty_assertions::assert_eq;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(BTree<i32, i32, ArcK>: Send, Sync);
    assert_not_impl_any!(BTree<i32, i32, RcK>: Send, Sync);

    type TestTree = BTree<i32, String, RcK>;

    fn keys<V, P: SharedPointerKind>(tree: &BTree<i32, V, P>) -> Vec<i32> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn empty_tree() {
        let tree = TestTree::with_capacity(4);
        assert!(tree.is_empty());
        assert_eq!(1, tree.height());
        assert_eq!(None, tree.first_value(&1));
        assert_eq!(None, tree.first_path());
        assert_eq!(0, tree.lower_bound_offset(&1));
        assert_eq!(0, tree.iter().count());
        tree.check_invariants();
    }

    #[test]
    #[should_panic(expected = "node capacity must be at least 2")]
    fn tiny_internal_capacity_is_rejected() {
        let _ = TestTree::with_capacities(8, 1);
    }

    #[test]
    fn root_split_grows_height() {
        let mut tree = TestTree::with_capacity(2);
        tree.insert_key(1, "a".into());
        tree.insert_key(2, "b".into());
        assert_eq!(1, tree.height());
        tree.insert_key(3, "c".into());
        assert_eq!(2, tree.height());
        assert_eq!(1, tree.root.len());
        assert_eq!(&2, tree.root.key_at(0));
        assert_eq!(
            vec![vec![(1, "a".to_string())], vec![(3, "c".to_string())]],
            tree.root.children().map(|c| c.to_vec()).collect::<Vec<_>>()
        );
        tree.check_invariants();
    }

    #[test]
    fn duplicate_is_appended_after_equal_keys() {
        let pairs = [(1, "0"), (2, "1"), (2, "2"), (2, "3"), (3, "4")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        let mut tree = TestTree::from_root(Node::from_sorted_pairs(pairs, 100), 100);
        tree.insert_key(2, "A".into());
        tree.insert_key(4, "B".into());
        let expected: Vec<(i32, String)> = [
            (1, "0"),
            (2, "1"),
            (2, "2"),
            (2, "3"),
            (2, "A"),
            (3, "4"),
            (4, "B"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
        assert_eq!(expected, tree.root.to_vec());
    }

    #[test]
    fn positional_lookup() {
        for count in [1, 2, 3, 10, 57, 300] {
            let mut tree = BTree::<usize, (), RcK>::with_capacities(3, 2);
            for key in 0..count {
                tree.insert_or_update(key, ());
            }
            tree.check_invariants();
            for offset in 0..count {
                let path = tree.path_to_element(offset);
                assert_eq!(offset, *path.element().0);
                assert_eq!(offset, tree.offset_of(&path));
                assert_eq!(Some((&offset, &())), tree.get_index(offset));
            }
            assert_eq!(None, tree.get_index(count));
        }
    }

    #[test]
    fn update_replaces_last_occurrence() {
        let mut tree = BTree::<i32, usize, RcK>::with_capacity(2);
        for value in 0..9 {
            tree.insert_key(5, value);
        }
        tree.insert_key(1, 100);
        tree.insert_key(9, 200);
        assert!(tree.height() > 2);
        assert_eq!(Some(8), tree.insert_or_update(5, 42));
        let fives: Vec<usize> = tree.range(5..=5).map(|(_, v)| *v).collect();
        assert_eq!(vec![0, 1, 2, 3, 4, 5, 6, 7, 42], fives);
        assert_eq!(Some(&0), tree.first_value(&5));
        assert_eq!(11, tree.len());
        tree.check_invariants();
    }

    #[test]
    fn update_first_touches_the_entry_reads_see() {
        let mut tree = BTree::<i32, usize, RcK>::with_capacity(2);
        for value in 0..9 {
            tree.insert_key(5, value);
        }
        tree.insert_key(1, 100);
        assert_eq!(Some(0), tree.update_first_or_insert(5, 42));
        assert_eq!(Some(&42), tree.first_value(&5));
        let fives: Vec<usize> = tree.range(5..=5).map(|(_, v)| *v).collect();
        assert_eq!(vec![42, 1, 2, 3, 4, 5, 6, 7, 8], fives);
        assert_eq!(None, tree.update_first_or_insert(3, 7));
        assert_eq!(vec![1, 3, 5], keys(&tree)[..3].to_vec());
        assert_eq!(11, tree.len());
        tree.check_invariants();
    }

    #[test]
    fn find_first_key_in_internal_duplicates() {
        let mut tree = BTree::<i32, usize, RcK>::with_capacity(2);
        for value in 0..20 {
            tree.insert_key(7, value);
        }
        let path = tree.find_first_key(&7).unwrap();
        assert_eq!((&7, &0), path.element());
        assert_eq!(0, tree.offset_of(&path));
        assert!(tree.find_first_key(&8).is_none());
        assert!(tree.any_value(&7).is_some_and(|v| *v < 20));
        assert_eq!(Some(&0), tree.first_value(&7));
        assert_eq!(None, tree.any_value(&8));
        assert!(tree.contains_key(&7));
        assert!(!tree.contains_key(&6));
    }

    #[test]
    fn clones_do_not_see_writes() {
        let mut tree = TestTree::with_capacity(3);
        for key in 0..50 {
            tree.insert_or_update(key, key.to_string());
        }
        let snapshot = tree.clone();
        assert!(tree.ptr_eq(&snapshot));
        tree.insert_or_update(25, "changed".into());
        tree.insert_or_update(100, "new".into());
        *tree.get_mut(&0).unwrap() = "zero".into();

        assert!(!tree.ptr_eq(&snapshot));
        assert_eq!(Some(&"25".to_string()), snapshot.first_value(&25));
        assert_eq!(Some(&"0".to_string()), snapshot.first_value(&0));
        assert_eq!(None, snapshot.first_value(&100));
        assert_eq!(50, snapshot.len());
        assert_eq!(Some(&"changed".to_string()), tree.first_value(&25));
        assert_eq!(Some(&"zero".to_string()), tree.first_value(&0));
        assert_eq!(51, tree.len());
        snapshot.check_invariants();
        tree.check_invariants();
    }

    #[test]
    fn set_value_through_path() {
        let mut tree = TestTree::with_capacity(2);
        for key in 0..20 {
            tree.insert_key(key, String::new());
        }
        let before = tree.generation();
        let snapshot = tree.clone();
        let path = tree.path_to_element(13);
        let old = tree.set_value(&path, "thirteen".into());
        assert_eq!("", old);
        assert!(tree.generation() > before);
        assert_eq!(Some(&"thirteen".to_string()), tree.first_value(&13));
        assert_eq!(Some(&String::new()), snapshot.first_value(&13));
    }

    #[test]
    fn bound_offsets() {
        let mut tree = BTree::<i32, (), RcK>::with_capacity(2);
        for key in [1, 2, 2, 2, 5, 5, 9] {
            tree.insert_key(key, ());
        }
        assert_eq!(0, tree.lower_bound_offset(&1));
        assert_eq!(1, tree.upper_bound_offset(&1));
        assert_eq!(1, tree.lower_bound_offset(&2));
        assert_eq!(4, tree.upper_bound_offset(&2));
        assert_eq!(4, tree.lower_bound_offset(&3));
        assert_eq!(4, tree.upper_bound_offset(&3));
        assert_eq!(7, tree.lower_bound_offset(&10));
        assert_eq!(vec![1, 2, 2, 2, 5, 5, 9], keys(&tree));
        assert_eq!(vec![2, 2, 2, 5, 5], tree.range(2..9).map(|(k, _)| *k).collect::<Vec<_>>());
        assert_eq!(vec![5, 5], tree.range(3..9).map(|(k, _)| *k).collect::<Vec<_>>());
        assert_eq!(vec![9, 5, 5], tree.range(3..).rev().map(|(k, _)| *k).collect::<Vec<_>>());
    }

    #[test]
    fn consuming_iter_collects_everything() {
        let mut tree = TestTree::with_capacity(2);
        for key in (0..30).rev() {
            tree.insert_key(key, key.to_string());
        }
        let items: Vec<(i32, String)> = tree.clone().into_consuming_iter().collect();
        assert_eq!(tree.root.to_vec(), items);
        assert_eq!(30, items.len());
    }

    proptest! {
        #[test]
        fn insert_key_keeps_sorted_multiset(
            input in collection::vec(0..40i32, 0..400),
            leaf in 2usize..6,
            internal in 2usize..5,
        ) {
            let mut tree = BTree::<i32, usize, RcK>::with_capacities(leaf, internal);
            for (i, key) in input.iter().enumerate() {
                tree.insert_key(*key, i);
            }
            tree.check_invariants();
            let mut expected: Vec<(i32, usize)> = input.iter().copied().zip(0..).collect();
            expected.sort_by_key(|(k, _)| *k);
            let actual: Vec<(i32, usize)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(expected, actual);
        }

        #[test]
        fn insert_or_update_matches_btreemap(
            input in collection::vec((0..60i32, 0..1000i32), 0..400),
            leaf in 2usize..6,
            internal in 2usize..5,
        ) {
            let mut tree = BTree::<i32, i32, RcK>::with_capacities(leaf, internal);
            let mut model = std::collections::BTreeMap::new();
            for (key, value) in input {
                assert_eq!(model.insert(key, value), tree.insert_or_update(key, value));
            }
            tree.check_invariants();
            let actual: Vec<(i32, i32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(model.into_iter().collect::<Vec<_>>(), actual);
        }
    }
}
