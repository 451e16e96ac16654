// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Insertion into a single node, splitting it when it is full.

use archery::{SharedPointer, SharedPointerKind};
use tracing::trace;

use super::node::{Node, NodeRef};

/// What's left over when a full node splits: the promoted median and the
/// new right sibling. The node that split keeps the left half.
pub(crate) struct Splinter<K, V, P: SharedPointerKind> {
    pub(crate) median: (K, V),
    pub(crate) right: NodeRef<K, V, P>,
}

impl<K: Ord, V, P: SharedPointerKind> Node<K, V, P> {
    /// Inserts `element` at `slot`, with `right_child` placed directly
    /// after it when this is an internal node.
    ///
    /// If the node has room this is a plain shift and `None` is returned.
    /// Otherwise the node splits: it keeps the left half and the median
    /// and right half are handed back for the parent to insert.
    ///
    /// The subtree this node roots grows by exactly one element either way,
    /// because a right child always comes from a child of this node that
    /// has already been counted.
    pub(crate) fn immediately_insert(
        &mut self,
        element: (K, V),
        right_child: Option<NodeRef<K, V, P>>,
        slot: usize,
    ) -> Option<Splinter<K, V, P>> {
        assert!(slot <= self.len(), "insertion slot out of bounds");
        if !self.is_full() {
            self.insert_element_raw(slot, element, right_child);
            self.total_elements += 1;
            #[cfg(feature = "debug")]
            self.check_shallow();
            return None;
        }
        Some(self.split_insert(element, right_child, slot))
    }

    #[cold]
    fn split_insert(
        &mut self,
        element: (K, V),
        right_child: Option<NodeRef<K, V, P>>,
        slot: usize,
    ) -> Splinter<K, V, P> {
        assert!(
            self.is_leaf() == right_child.is_none(),
            "a right child must be given iff the node is internal"
        );
        let count = self.len();
        let right_median = count / 2;
        let left_median = (count - 1) / 2;
        let combined_total = self.total_elements + 1;
        let mut right = Node::new(self.capacity(), self.is_leaf());

        let median = if slot == right_median {
            trace!(capacity = self.capacity, slot, "split at median");
            self.move_elements(&mut right, right_median, count - right_median);
            if let Some(child) = right_child {
                right.children_mut().push(child);
                self.move_children(&mut right, right_median + 1, count - right_median);
            }
            element
        } else if slot > right_median {
            trace!(capacity = self.capacity, slot, "split right of median");
            self.move_elements(&mut right, right_median + 1, slot - right_median - 1);
            right.keys.push(element.0);
            right.values.push(element.1);
            self.move_elements(&mut right, right_median + 1, count - slot);
            if let Some(child) = right_child {
                self.move_children(&mut right, right_median + 1, slot - right_median);
                right.children_mut().push(child);
                self.move_children(&mut right, right_median + 1, count - slot);
            }
            self.pop_element_raw()
        } else {
            trace!(capacity = self.capacity, slot, "split left of median");
            self.move_elements(&mut right, left_median + 1, count - left_median - 1);
            if !self.is_leaf() {
                self.move_children(&mut right, left_median + 1, count - left_median);
            }
            let median = self.pop_element_raw();
            self.insert_element_raw(slot, element, right_child);
            median
        };

        self.total_elements = self.len() + self.children_total(self.len() + 1);
        right.total_elements = combined_total - self.total_elements - 1;
        #[cfg(feature = "debug")]
        {
            self.check_shallow();
            right.check_shallow();
        }
        debug_assert!(self.len().abs_diff(right.len()) <= 1);
        Splinter {
            median,
            right: SharedPointer::new(right),
        }
    }
}
