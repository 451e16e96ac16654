// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;
use std::fmt::{Debug, Error, Formatter};

use archery::{SharedPointer, SharedPointerKind};

use crate::nodes::{Cursor, NodeRef};

/// An owned position of one element in a tree.
///
/// A path records the child offsets taken from the root, the node that
/// holds the element and the element's slot in it. It keeps that node
/// alive but says nothing about whether the tree it came from still looks
/// the same; callers that hand paths out must track that themselves.
pub(crate) struct Path<K, V, P: SharedPointerKind> {
    node: NodeRef<K, V, P>,
    slot: usize,
    offsets: Vec<usize>,
}

impl<K, V, P: SharedPointerKind> Path<K, V, P> {
    pub(crate) fn from_cursor(cursor: &Cursor<'_, K, V, P>) -> Option<Self> {
        let (offsets, slot, node) = cursor.parts()?;
        Some(Path {
            node: node.clone(),
            slot,
            offsets,
        })
    }

    /// Rebuilds a cursor for this path against the tree rooted at `root`.
    pub(crate) fn cursor<'a>(&self, root: &'a NodeRef<K, V, P>) -> Cursor<'a, K, V, P> {
        let cursor = Cursor::from_offsets(root, &self.offsets, self.slot);
        debug_assert!(cursor
            .parts()
            .is_some_and(|(_, _, node)| SharedPointer::ptr_eq(node, &self.node)));
        cursor
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) fn depth(&self) -> usize {
        self.offsets.len()
    }

    pub(crate) fn element(&self) -> (&K, &V) {
        self.node.element_at(self.slot)
    }

    /// The path `distance` elements away when that element is in the same
    /// leaf, or `None` when it is elsewhere.
    pub(crate) fn shifted_in_leaf(&self, distance: isize) -> Option<Self> {
        if !self.node.is_leaf() {
            return None;
        }
        let slot = self
            .slot
            .checked_add_signed(distance)
            .filter(|slot| *slot < self.node.len())?;
        Some(Path {
            node: self.node.clone(),
            slot,
            offsets: self.offsets.clone(),
        })
    }

    /// The path to the in-order successor, or `None` past the last element.
    pub(crate) fn advanced(&self, root: &NodeRef<K, V, P>) -> Option<Self> {
        let mut cursor = self.cursor(root);
        cursor.next()?;
        Path::from_cursor(&cursor)
    }

    /// The path to the in-order predecessor, or `None` before the first element.
    pub(crate) fn retreated(&self, root: &NodeRef<K, V, P>) -> Option<Self> {
        let mut cursor = self.cursor(root);
        cursor.prev()?;
        Path::from_cursor(&cursor)
    }

    /// Where this path sits at `depth` among the positions of the node it
    /// passes through there: child `c` ranks `2c`, element `s` ranks `2s + 1`.
    fn rank_at(&self, depth: usize) -> usize {
        match self.offsets.get(depth) {
            Some(&child) => 2 * child,
            None => 2 * self.slot + 1,
        }
    }
}

impl<K, V, P: SharedPointerKind> Clone for Path<K, V, P> {
    fn clone(&self) -> Self {
        Path {
            node: self.node.clone(),
            slot: self.slot,
            offsets: self.offsets.clone(),
        }
    }
}

impl<K, V, P: SharedPointerKind> PartialEq for Path<K, V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.offsets == other.offsets
    }
}

impl<K, V, P: SharedPointerKind> Eq for Path<K, V, P> {}

impl<K, V, P: SharedPointerKind> PartialOrd for Path<K, V, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Paths into the same tree order by the in-order position of their
/// elements. Comparing paths from different trees is meaningless.
impl<K, V, P: SharedPointerKind> Ord for Path<K, V, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        for depth in 0..=self.depth().min(other.depth()) {
            match self.rank_at(depth).cmp(&other.rank_at(depth)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl<K, V, P: SharedPointerKind> Debug for Path<K, V, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_struct("Path")
            .field("offsets", &self.offsets)
            .field("slot", &self.slot)
            .finish()
    }
}

/// An owning iterator over a tree, walking it by successive paths and
/// cloning each element out of the shared nodes.
pub(crate) struct ConsumingIter<K, V, P: SharedPointerKind> {
    root: NodeRef<K, V, P>,
    front: Option<Path<K, V, P>>,
    back: Option<Path<K, V, P>>,
    remaining: usize,
}

impl<K, V, P: SharedPointerKind> ConsumingIter<K, V, P> {
    pub(crate) fn new(root: NodeRef<K, V, P>) -> Self {
        let remaining = root.total_elements();
        let (front, back) = {
            let mut cursor = Cursor::empty();
            cursor.seek_to_first(&root);
            let front = Path::from_cursor(&cursor);
            cursor.seek_to_last(&root);
            (front, Path::from_cursor(&cursor))
        };
        ConsumingIter {
            root,
            front,
            back,
            remaining,
        }
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Iterator for ConsumingIter<K, V, P> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let path = self.front.take()?;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = path.advanced(&self.root);
        }
        let (key, value) = path.element();
        Some((key.clone(), value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> DoubleEndedIterator for ConsumingIter<K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let path = self.back.take()?;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = path.retreated(&self.root);
        }
        let (key, value) = path.element();
        Some((key.clone(), value.clone()))
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> ExactSizeIterator for ConsumingIter<K, V, P> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::btree::BTree;
    use crate::shared_ptr::RcK;
    use ::proptest::proptest;
    use pretty_assertions::assert_eq;

    fn tree(count: usize) -> BTree<usize, usize, RcK> {
        let mut tree = BTree::with_capacities(2, 2);
        for key in 0..count {
            tree.insert_key(key, key + 1000);
        }
        tree
    }

    #[test]
    fn advance_visits_every_element() {
        let tree = tree(50);
        let mut path = tree.first_path();
        let mut seen = Vec::new();
        while let Some(current) = path {
            seen.push(*current.element().0);
            path = current.advanced(tree.root());
        }
        assert_eq!((0..50).collect::<Vec<_>>(), seen);
    }

    #[test]
    fn retreat_visits_every_element() {
        let tree = tree(50);
        let mut path = tree.last_path();
        let mut seen = Vec::new();
        while let Some(current) = path {
            seen.push(*current.element().0);
            path = current.retreated(tree.root());
        }
        assert_eq!((0..50).rev().collect::<Vec<_>>(), seen);
    }

    #[test]
    fn single_element_has_no_neighbours() {
        let tree = tree(1);
        let path = tree.first_path().unwrap();
        assert_eq!((&0, &1000), path.element());
        assert!(path.advanced(tree.root()).is_none());
        assert!(path.retreated(tree.root()).is_none());
        assert_eq!(Some(path), tree.last_path());
    }

    #[test]
    fn internal_and_leaf_paths_compare_by_position() {
        let tree = tree(30);
        let paths: Vec<_> = (0..30).map(|i| tree.path_to_element(i)).collect();
        assert!(paths.iter().any(|p| p.depth() == 0));
        assert!(paths.iter().any(|p| p.depth() > 1));
        for (i, a) in paths.iter().enumerate() {
            for (j, b) in paths.iter().enumerate() {
                assert_eq!(i.cmp(&j), a.cmp(b), "paths {:?} and {:?}", a, b);
            }
        }
    }

    #[test]
    fn shift_stays_inside_one_leaf() {
        let mut tree = BTree::<usize, usize, RcK>::with_capacities(4, 2);
        for key in 0..40 {
            tree.insert_key(key, key + 1000);
        }
        let mut shifted = 0;
        for offset in 0..40 {
            let path = tree.path_to_element(offset);
            for distance in [-2isize, -1, 0, 1, 2] {
                let target = offset as isize + distance;
                let in_leaf = path.node.is_leaf()
                    && (0..path.node.len() as isize).contains(&(path.slot() as isize + distance));
                match path.shifted_in_leaf(distance) {
                    Some(moved) => {
                        assert!(in_leaf);
                        assert_eq!(target as usize, tree.offset_of(&moved));
                        assert_eq!(path.offsets(), moved.offsets());
                        shifted += 1;
                    }
                    None => assert!(!in_leaf),
                }
            }
        }
        assert!(shifted > 40);
    }

    #[test]
    fn consuming_iter_both_ends() {
        let tree = tree(40);
        let mut iter = ConsumingIter::new(tree.root().clone());
        assert_eq!(40, iter.len());
        assert_eq!(Some((0, 1000)), iter.next());
        assert_eq!(Some((39, 1039)), iter.next_back());
        let middle: Vec<usize> = iter.map(|(k, _)| k).collect();
        assert_eq!((1..39).collect::<Vec<_>>(), middle);
    }

    proptest! {
        #[test]
        fn path_order_matches_offsets(count in 1usize..200, a in 0usize..200, b in 0usize..200) {
            let tree = tree(count);
            let (a, b) = (a % count, b % count);
            let path_a = tree.path_to_element(a);
            let path_b = tree.path_to_element(b);
            assert_eq!(a.cmp(&b), path_a.cmp(&path_b));
            assert_eq!(a, tree.offset_of(&path_a));
        }
    }
}
