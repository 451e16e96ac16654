// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-node operations.
//!
//! Read operations take `&Node`, writes take `&mut Node`. A `&mut Node` is
//! only ever obtained from [`Node::update`] or from a node the caller just
//! created, so a write can never reach a node that another tree shares.
//!
//! The raw primitives at the bottom move elements and children between
//! buffers. They keep `keys`, `values` and `children` in step with each
//! other but never touch `total_elements`; callers own that bookkeeping.

use std::borrow::Borrow;

use archery::SharedPointerKind;

use super::node::{Node, NodeRef};

impl<K, V, P: SharedPointerKind> Node<K, V, P> {
    /// The number of elements stored directly in this node.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.keys.len() == self.capacity
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of elements in this node's whole subtree.
    #[inline]
    pub(crate) fn total_elements(&self) -> usize {
        self.total_elements
    }

    /// The number of children of an internal node.
    ///
    /// Panics on a leaf.
    #[inline]
    pub(crate) fn num_children(&self) -> usize {
        assert!(!self.is_leaf(), "cannot access the child count on a leaf");
        self.keys.len() + 1
    }

    /// Returns the first insertion point for `key`: the smallest slot whose
    /// key is not less than `key`. When `key` is present this is its first
    /// occurrence within the node.
    #[inline]
    pub(crate) fn first_slot<BK>(&self, key: &BK) -> usize
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.keys.partition_point(|k| k.borrow() < key)
    }

    /// Returns the last insertion point for `key`: the smallest slot whose
    /// key is greater than `key`. When `key` is present this is one past
    /// its last occurrence within the node.
    #[inline]
    pub(crate) fn last_slot<BK>(&self, key: &BK) -> usize
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.keys.partition_point(|k| k.borrow() <= key)
    }

    #[inline]
    pub(crate) fn element_at(&self, slot: usize) -> (&K, &V) {
        assert!(slot < self.len(), "node element subscript out of bounds");
        (&self.keys[slot], &self.values[slot])
    }

    #[inline]
    pub(crate) fn key_at(&self, slot: usize) -> &K {
        assert!(slot < self.len(), "node key subscript out of bounds");
        &self.keys[slot]
    }

    #[inline]
    pub(crate) fn value_at(&self, slot: usize) -> &V {
        assert!(slot < self.len(), "node value subscript out of bounds");
        &self.values[slot]
    }

    #[inline]
    pub(crate) fn value_at_mut(&mut self, slot: usize) -> &mut V {
        assert!(slot < self.len(), "node value subscript out of bounds");
        &mut self.values[slot]
    }

    /// Panics on a leaf.
    #[inline]
    pub(crate) fn child_at(&self, slot: usize) -> &NodeRef<K, V, P> {
        let children = match &self.children {
            Some(children) => children,
            None => panic!("cannot access children of a leaf node"),
        };
        assert!(slot < children.len(), "node child subscript out of bounds");
        &children[slot]
    }

    /// Panics on a leaf.
    #[inline]
    pub(crate) fn child_at_mut(&mut self, slot: usize) -> &mut NodeRef<K, V, P> {
        let children = self.children_mut();
        assert!(slot < children.len(), "node child subscript out of bounds");
        &mut children[slot]
    }

    /// Iterates over the children of an internal node, or nothing for a leaf.
    pub(crate) fn children(&self) -> impl Iterator<Item = &NodeRef<K, V, P>> {
        self.children.iter().flatten()
    }

    pub(super) fn children_mut(&mut self) -> &mut Vec<NodeRef<K, V, P>> {
        match &mut self.children {
            Some(children) => children,
            None => panic!("cannot modify children of a leaf node"),
        }
    }

    /// Searches this node and its descendants for any element with `key`.
    pub(crate) fn lookup<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let slot = self.first_slot(key);
        if slot < self.len() && self.keys[slot].borrow() == key {
            return Some(&self.values[slot]);
        }
        match &self.children {
            Some(children) => children[slot].lookup(key),
            None => None,
        }
    }

    /// Sums the subtree sizes of `children[..end]`.
    pub(crate) fn children_total(&self, end: usize) -> usize {
        match &self.children {
            Some(children) => children[..end]
                .iter()
                .map(|child| child.total_elements)
                .sum(),
            None => 0,
        }
    }

    /// The number of elements of this subtree that come before the element
    /// at `slot`. For an internal node that includes `children[..=slot]`.
    pub(crate) fn offset_of_slot(&self, slot: usize) -> usize {
        if self.is_leaf() {
            slot
        } else {
            slot + self.children_total(slot + 1)
        }
    }

    /// Records that one element was inserted somewhere below this node
    /// without reshaping it.
    #[inline]
    pub(crate) fn count_descendant_insert(&mut self) {
        self.total_elements += 1;
    }

    // Raw primitives.

    /// Moves `count` elements starting at `from` to the end of `dst`.
    pub(crate) fn move_elements(&mut self, dst: &mut Self, from: usize, count: usize) {
        assert!(
            from + count <= self.len(),
            "cannot move elements beyond the source node"
        );
        assert!(
            dst.len() + count <= dst.capacity,
            "cannot move elements beyond destination capacity"
        );
        dst.keys.extend(self.keys.drain(from..from + count));
        dst.values.extend(self.values.drain(from..from + count));
    }

    /// Moves `count` children starting at `from` to the end of `dst`.
    ///
    /// Panics if either node is a leaf.
    pub(crate) fn move_children(&mut self, dst: &mut Self, from: usize, count: usize) {
        let capacity = dst.capacity;
        let source = match &mut self.children {
            Some(children) => children,
            None => panic!("cannot move children from a leaf node"),
        };
        let target = dst.children_mut();
        assert!(
            from + count <= source.len(),
            "cannot move children beyond the source node"
        );
        assert!(
            target.len() + count <= capacity + 1,
            "cannot move children beyond destination capacity"
        );
        target.extend(source.drain(from..from + count));
    }

    /// Writes an element into `slot`, shifting later elements one slot to
    /// the right. An internal node must be given the new element's right
    /// child, which lands in `slot + 1`; a leaf must not.
    pub(crate) fn insert_element_raw(
        &mut self,
        slot: usize,
        element: (K, V),
        right_child: Option<NodeRef<K, V, P>>,
    ) {
        assert!(
            self.is_leaf() == right_child.is_none(),
            "a right child must be given iff the node is internal"
        );
        assert!(slot <= self.len(), "cannot insert past the end of a node");
        assert!(self.len() < self.capacity, "cannot insert beyond node capacity");
        self.keys.insert(slot, element.0);
        self.values.insert(slot, element.1);
        if let Some(child) = right_child {
            self.children_mut().insert(slot + 1, child);
        }
    }

    /// Removes and returns the last element. The last child of an internal
    /// node stays where it is.
    pub(crate) fn pop_element_raw(&mut self) -> (K, V) {
        match (self.keys.pop(), self.values.pop()) {
            (Some(key), Some(value)) => (key, value),
            _ => panic!("cannot pop an element from an empty node"),
        }
    }

    /// Removes the element at `slot` from a leaf, shifting later elements
    /// one slot to the left. This performs no rebalancing.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn remove_element_raw(&mut self, slot: usize) -> (K, V) {
        assert!(self.is_leaf(), "cannot remove an element from an internal node");
        assert!(slot < self.len(), "attempt to remove out-of-bounds element");
        let element = (self.keys.remove(slot), self.values.remove(slot));
        self.total_elements -= 1;
        element
    }
}

#[cfg(test)]
impl<K: Clone, V: Clone, P: SharedPointerKind> Node<K, V, P> {
    /// Flattens the subtree into its in-order element sequence.
    pub(crate) fn to_vec(&self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.total_elements);
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<(K, V)>) {
        for slot in 0..self.len() {
            if let Some(children) = &self.children {
                children[slot].collect_into(out);
            }
            out.push((self.keys[slot].clone(), self.values[slot].clone()));
        }
        if let Some(children) = &self.children {
            children[self.len()].collect_into(out);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared_ptr::{RcK, SharedPointer};
    use ::proptest::{collection, proptest};

    type TestNode = Node<i32, String, RcK>;

    fn pairs(keys: &[i32]) -> Vec<(i32, String)> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (*k, i.to_string()))
            .collect()
    }

    #[test]
    fn binary_search_odd() {
        let node = TestNode::from_sorted_pairs(pairs(&[1, 2, 2, 2, 3]), 100);
        assert_eq!(0, node.first_slot(&1));
        assert_eq!(1, node.last_slot(&1));
        assert_eq!(1, node.first_slot(&2));
        assert_eq!(4, node.last_slot(&2));
        assert_eq!(4, node.first_slot(&3));
        assert_eq!(5, node.last_slot(&3));
        assert_eq!(0, node.first_slot(&0));
        assert_eq!(0, node.last_slot(&0));
        assert_eq!(5, node.first_slot(&4));
        assert_eq!(5, node.last_slot(&4));
    }

    #[test]
    fn binary_search_even() {
        let node = TestNode::from_sorted_pairs(pairs(&[1, 2, 2, 2, 2, 3]), 100);
        assert_eq!(1, node.first_slot(&2));
        assert_eq!(5, node.last_slot(&2));
        assert_eq!(5, node.first_slot(&3));
        assert_eq!(6, node.last_slot(&3));
        assert_eq!(6, node.first_slot(&4));
        assert_eq!(6, node.last_slot(&4));
    }

    #[test]
    fn binary_search_missing_middle() {
        let node = TestNode::from_sorted_pairs(pairs(&[0, 2, 4, 6, 8]), 100);
        assert_eq!(2, node.first_slot(&3));
        assert_eq!(2, node.last_slot(&3));
    }

    #[test]
    fn binary_search_empty() {
        let node = TestNode::new(4, true);
        assert_eq!(0, node.first_slot(&7));
        assert_eq!(0, node.last_slot(&7));
    }

    #[test]
    fn accessors() {
        let node = TestNode::from_sorted_pairs(pairs(&[5, 6]), 4);
        assert_eq!((&5, &"0".to_string()), node.element_at(0));
        assert_eq!(&6, node.key_at(1));
        assert_eq!("1", node.value_at(1));
        assert_eq!(Some(&"1".to_string()), node.lookup(&6));
        assert_eq!(None, node.lookup(&7));
    }

    #[test]
    #[should_panic(expected = "node key subscript out of bounds")]
    fn key_out_of_bounds() {
        let node = TestNode::from_sorted_pairs(pairs(&[5, 6]), 4);
        node.key_at(2);
    }

    #[test]
    #[should_panic(expected = "cannot access children of a leaf node")]
    fn child_of_leaf() {
        let node = TestNode::from_sorted_pairs(pairs(&[5, 6]), 4);
        node.child_at(0);
    }

    #[test]
    #[should_panic(expected = "cannot access the child count on a leaf")]
    fn child_count_of_leaf() {
        let node = TestNode::new(4, true);
        node.num_children();
    }

    #[test]
    fn move_and_insert_raw() {
        let mut left = TestNode::from_sorted_pairs(pairs(&[1, 2, 3, 4]), 4);
        let mut right = TestNode::new(4, true);
        left.move_elements(&mut right, 2, 2);
        assert_eq!(vec![1, 2], left.keys);
        assert_eq!(vec![3, 4], right.keys);
        // Totals are the caller's business.
        assert_eq!(4, left.total_elements);
        assert_eq!(0, right.total_elements);

        left.insert_element_raw(1, (9, "n".into()), None);
        assert_eq!(vec![1, 9, 2], left.keys);
        assert_eq!(vec!["0", "n", "1"], left.values);
        assert_eq!((2, "1".to_string()), left.pop_element_raw());
    }

    #[test]
    fn insert_raw_places_right_child() {
        let leaf = |k: i32| -> NodeRef<i32, String, RcK> {
            SharedPointer::new(TestNode::from_sorted_pairs(pairs(&[k]), 2))
        };
        let mut node = TestNode::new(3, false);
        node.keys.push(10);
        node.values.push("a".into());
        node.children_mut().extend([leaf(5), leaf(15)]);
        node.insert_element_raw(1, (20, "b".into()), Some(leaf(25)));
        assert_eq!(vec![10, 20], node.keys);
        let firsts: Vec<i32> = node.children().map(|c| c.keys[0]).collect();
        assert_eq!(vec![5, 15, 25], firsts);

        let mut other = TestNode::new(3, false);
        node.move_children(&mut other, 1, 2);
        assert_eq!(1, node.children().count());
        assert_eq!(2, other.children().count());
    }

    #[test]
    #[should_panic(expected = "a right child must be given iff the node is internal")]
    fn leaf_rejects_right_child() {
        let mut node = TestNode::new(3, true);
        let child = SharedPointer::new(TestNode::new(3, true));
        node.insert_element_raw(0, (1, "a".into()), Some(child));
    }

    #[test]
    #[should_panic(expected = "cannot insert beyond node capacity")]
    fn insert_raw_respects_capacity() {
        let mut node = TestNode::from_sorted_pairs(pairs(&[1, 2]), 2);
        node.insert_element_raw(0, (0, "a".into()), None);
    }

    #[test]
    fn remove_raw_shifts_left() {
        let mut node = TestNode::from_sorted_pairs(pairs(&[1, 2, 3]), 4);
        assert_eq!((2, "1".to_string()), node.remove_element_raw(1));
        assert_eq!(vec![1, 3], node.keys);
        assert_eq!(vec!["0", "2"], node.values);
        assert_eq!(2, node.total_elements);
    }

    proptest! {
        #[test]
        fn slots_bracket_every_key(mut keys in collection::vec(0..20i32, 0..40), probe in -1..21i32) {
            keys.sort();
            let node = TestNode::from_sorted_pairs(pairs(&keys), 40);
            let first = node.first_slot(&probe);
            let last = node.last_slot(&probe);
            assert_eq!(keys.iter().position(|k| *k >= probe).unwrap_or(keys.len()), first);
            assert_eq!(keys.iter().position(|k| *k > probe).unwrap_or(keys.len()), last);
            assert_eq!(keys.iter().filter(|k| **k == probe).count(), last - first);
        }
    }
}
