// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use archery::{SharedPointer, SharedPointerKind};
use tracing::trace;

use crate::config::MIN_CAPACITY;

/// A shared reference to a node. Cloning it never copies the node.
pub(crate) type NodeRef<K, V, P> = SharedPointer<Node<K, V, P>, P>;

/// A node in a B-tree.
///
/// Elements are stored in two parallel buffers, `keys` and `values`, each
/// allocated once with room for exactly `capacity` entries. Internal nodes
/// carry a third buffer with room for `capacity + 1` children.
///
/// Invariants:
/// * keys are ordered, duplicates allowed
/// * keys.len() == values.len() <= capacity
/// * a node is a leaf iff `children` is `None`
/// * children.len() == keys.len() + 1 for internal nodes
/// * total_elements == keys.len() + the sum of the children's total_elements
/// * every key in children[i] is between keys[i - 1] (if i > 0) and keys[i] (if i < keys.len())
#[derive(Debug)]
pub(crate) struct Node<K, V, P: SharedPointerKind> {
    pub(super) keys: Vec<K>,
    pub(super) values: Vec<V>,
    pub(super) children: Option<Vec<NodeRef<K, V, P>>>,
    pub(super) capacity: usize,
    /// The number of elements in this node's entire subtree.
    pub(super) total_elements: usize,
}

impl<K, V, P: SharedPointerKind> Node<K, V, P> {
    /// Allocates an empty node with room for `capacity` elements.
    pub(crate) fn new(capacity: usize, is_leaf: bool) -> Self {
        assert!(
            capacity >= MIN_CAPACITY,
            "node capacity must be at least {}, got {}",
            MIN_CAPACITY,
            capacity
        );
        Node {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            children: if is_leaf {
                None
            } else {
                Some(Vec::with_capacity(capacity + 1))
            },
            capacity,
            total_elements: 0,
        }
    }

    /// Builds the root that replaces `left` after it split into
    /// `left`, `median` and `right`.
    pub(crate) fn new_root(
        left: NodeRef<K, V, P>,
        median: (K, V),
        right: NodeRef<K, V, P>,
        capacity: usize,
    ) -> Self {
        let mut root = Node::new(capacity, false);
        root.total_elements = left.total_elements + right.total_elements + 1;
        root.keys.push(median.0);
        root.values.push(median.1);
        let children = root.children_mut();
        children.push(left);
        children.push(right);
        root
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Node<K, V, P> {
    /// Makes sure `this` is the only reference to its node, copying the
    /// node if it is shared, and returns the node for mutation.
    ///
    /// This is the only way to obtain a `&mut Node` for a node that has
    /// ever been shared, so every write lands in a node no other tree or
    /// index can observe.
    #[inline]
    pub(crate) fn update(this: &mut NodeRef<K, V, P>) -> &mut Self {
        if SharedPointer::get_mut(this).is_none() {
            trace!(
                elements = this.keys.len(),
                leaf = this.children.is_none(),
                "copying shared node before write"
            );
        }
        SharedPointer::make_mut(this)
    }
}

impl<K: Clone, V: Clone, P: SharedPointerKind> Clone for Node<K, V, P> {
    fn clone(&self) -> Self {
        let mut keys = Vec::with_capacity(self.capacity);
        keys.extend(self.keys.iter().cloned());
        let mut values = Vec::with_capacity(self.capacity);
        values.extend(self.values.iter().cloned());
        let children = self.children.as_ref().map(|children| {
            let mut copy = Vec::with_capacity(self.capacity + 1);
            copy.extend(children.iter().cloned());
            copy
        });
        Node {
            keys,
            values,
            children,
            capacity: self.capacity,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(any(test, feature = "debug"))]
impl<K: Ord, V, P: SharedPointerKind> Node<K, V, P> {
    /// Checks this node's own invariants, trusting the children's totals.
    pub(crate) fn check_shallow(&self) {
        assert_eq!(
            self.keys.len(),
            self.values.len(),
            "node must have equal count of keys and values"
        );
        assert!(
            self.keys.len() <= self.capacity,
            "node holds {} elements but has capacity {}",
            self.keys.len(),
            self.capacity
        );
        assert!(
            self.keys.windows(2).all(|pair| pair[0] <= pair[1]),
            "node is out of order"
        );
        let child_total: usize = match &self.children {
            Some(children) => {
                assert_eq!(
                    children.len(),
                    self.keys.len() + 1,
                    "internal node must have a child on each side of every key"
                );
                children.iter().map(|child| child.total_elements).sum()
            }
            None => 0,
        };
        assert_eq!(
            self.total_elements,
            self.keys.len() + child_total,
            "total element count does not match the subtree"
        );
    }

    /// Recursively checks every invariant of the subtree rooted here and
    /// returns its depth. All leaves must sit at the same depth.
    pub(crate) fn check_invariants(&self) -> usize {
        self.check_shallow();
        let children = match &self.children {
            None => return 0,
            Some(children) => children,
        };
        assert!(!self.keys.is_empty(), "internal node has no separator keys");
        let mut depth = None;
        for (i, child) in children.iter().enumerate() {
            assert!(!child.keys.is_empty(), "non-root node is empty");
            if i > 0 {
                let separator = &self.keys[i - 1];
                assert!(
                    child.keys.first().map_or(true, |k| k >= separator),
                    "right subtree must not hold keys below its separator"
                );
            }
            if let Some(separator) = self.keys.get(i) {
                assert!(
                    child.keys.last().map_or(true, |k| k <= separator),
                    "left subtree must not hold keys above its separator"
                );
            }
            let child_depth = child.check_invariants();
            assert_eq!(
                *depth.get_or_insert(child_depth),
                child_depth,
                "leaves are not all at the same depth"
            );
        }
        depth.unwrap_or(0) + 1
    }
}

#[cfg(test)]
impl<K: Ord + Clone, V: Clone, P: SharedPointerKind> Node<K, V, P> {
    /// Builds a leaf from unsorted pairs. Equal keys keep their input order.
    pub(crate) fn from_sorted_pairs(mut pairs: Vec<(K, V)>, capacity: usize) -> Self {
        assert!(pairs.len() <= capacity, "too many key-value pairs");
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let mut node = Node::new(capacity, true);
        for (key, value) in pairs {
            node.keys.push(key);
            node.values.push(value);
        }
        node.total_elements = node.keys.len();
        node
    }
}
