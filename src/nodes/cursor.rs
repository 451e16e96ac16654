// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::Range;

use archery::SharedPointerKind;

use super::node::NodeRef;
use crate::config::EXPECTED_MAX_DEPTH;

/// A borrowed position in a tree.
///
/// The stack holds one entry per level from the root down. Every entry but
/// the last holds the offset of the child the next entry lives in; the last
/// entry holds the slot of the element the cursor points at. Elements live
/// in internal nodes as well as leaves, so the last entry may be an
/// internal node. An empty stack is the position past either end.
#[derive(Debug)]
pub(crate) struct Cursor<'a, K, V, P: SharedPointerKind> {
    stack: Vec<(usize, &'a NodeRef<K, V, P>)>,
}

impl<'a, K, V, P: SharedPointerKind> Clone for Cursor<'a, K, V, P> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Cursor<'a, K, V, P> {
    pub(crate) fn empty() -> Self {
        Self {
            stack: Vec::with_capacity(EXPECTED_MAX_DEPTH),
        }
    }

    /// Positions the cursor at `slot` of the node reached by following the
    /// child `offsets` down from `root`.
    pub(crate) fn from_offsets(root: &'a NodeRef<K, V, P>, offsets: &[usize], slot: usize) -> Self {
        let mut cursor = Self::empty();
        let mut node = root;
        for &offset in offsets {
            cursor.stack.push((offset, node));
            node = node.child_at(offset);
        }
        assert!(slot < node.len(), "path slot out of bounds");
        cursor.stack.push((slot, node));
        cursor
    }

    /// Splits the position into the child offsets above it, the slot and
    /// the node holding the element.
    pub(crate) fn parts(&self) -> Option<(Vec<usize>, usize, &'a NodeRef<K, V, P>)> {
        let (&(slot, node), ancestors) = self.stack.split_last()?;
        let offsets = ancestors.iter().map(|&(offset, _)| offset).collect();
        Some((offsets, slot, node))
    }

    pub(crate) fn seek_to_first(&mut self, root: &'a NodeRef<K, V, P>) -> Option<(&'a K, &'a V)> {
        self.stack.clear();
        self.push_leftmost(root);
        self.peek()
    }

    pub(crate) fn seek_to_last(&mut self, root: &'a NodeRef<K, V, P>) -> Option<(&'a K, &'a V)> {
        self.stack.clear();
        self.push_rightmost(root);
        self.peek()
    }

    /// Positions the cursor at the element with in-order offset `offset`.
    /// Positions past the end leave the cursor empty.
    pub(crate) fn seek_to_offset(
        &mut self,
        root: &'a NodeRef<K, V, P>,
        offset: usize,
    ) -> Option<(&'a K, &'a V)> {
        self.stack.clear();
        if offset >= root.total_elements() {
            return None;
        }
        let mut remaining = offset;
        let mut node = root;
        'descend: loop {
            if node.is_leaf() {
                self.stack.push((remaining, node));
                break;
            }
            for (i, child) in node.children().enumerate() {
                let total = child.total_elements();
                if remaining < total {
                    self.stack.push((i, node));
                    node = child;
                    continue 'descend;
                }
                if remaining == total {
                    self.stack.push((i, node));
                    break 'descend;
                }
                remaining -= total + 1;
            }
            unreachable!("total element counts are inconsistent");
        }
        self.peek()
    }

    fn push_leftmost(&mut self, mut node: &'a NodeRef<K, V, P>) {
        while !node.is_leaf() {
            self.stack.push((0, node));
            node = node.child_at(0);
        }
        if !node.is_empty() {
            self.stack.push((0, node));
        }
    }

    fn push_rightmost(&mut self, mut node: &'a NodeRef<K, V, P>) {
        while !node.is_leaf() {
            let last = node.num_children() - 1;
            self.stack.push((last, node));
            node = node.child_at(last);
        }
        if !node.is_empty() {
            self.stack.push((node.len() - 1, node));
        }
    }

    /// Moves to the in-order successor. Moving past the last element
    /// empties the cursor.
    pub(crate) fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let &(slot, node) = self.stack.last()?;
        if !node.is_leaf() {
            if let Some(top) = self.stack.last_mut() {
                top.0 = slot + 1;
            }
            self.push_leftmost(node.child_at(slot + 1));
            return self.peek();
        }
        if slot + 1 < node.len() {
            if let Some(top) = self.stack.last_mut() {
                top.0 += 1;
            }
            return self.peek();
        }
        self.stack.pop();
        while let Some(&(offset, parent)) = self.stack.last() {
            if offset < parent.len() {
                return self.peek();
            }
            self.stack.pop();
        }
        None
    }

    /// Moves to the in-order predecessor. Moving before the first element
    /// empties the cursor.
    pub(crate) fn prev(&mut self) -> Option<(&'a K, &'a V)> {
        let &(slot, node) = self.stack.last()?;
        if !node.is_leaf() {
            self.push_rightmost(node.child_at(slot));
            return self.peek();
        }
        if slot > 0 {
            if let Some(top) = self.stack.last_mut() {
                top.0 -= 1;
            }
            return self.peek();
        }
        self.stack.pop();
        while let Some(top) = self.stack.last_mut() {
            if top.0 > 0 {
                top.0 -= 1;
                return self.peek();
            }
            self.stack.pop();
        }
        None
    }

    pub(crate) fn peek(&self) -> Option<(&'a K, &'a V)> {
        let &(slot, node) = self.stack.last()?;
        Some(node.element_at(slot))
    }

    /// The in-order offset of the current element from the start of the tree.
    pub(crate) fn position(&self) -> Option<usize> {
        let (&(slot, node), ancestors) = self.stack.split_last()?;
        let above: usize = ancestors
            .iter()
            .map(|&(offset, parent)| offset + parent.children_total(offset))
            .sum();
        Some(above + node.offset_of_slot(slot))
    }
}

/// A double-ended iterator over a contiguous run of in-order offsets.
#[derive(Debug)]
pub(crate) struct Iter<'a, K, V, P: SharedPointerKind> {
    fwd: Cursor<'a, K, V, P>,
    bwd: Cursor<'a, K, V, P>,
    remaining: usize,
}

impl<'a, K, V, P: SharedPointerKind> Iter<'a, K, V, P> {
    /// Iterates over the elements of `root` at the offsets in `range`.
    pub(crate) fn new(root: &'a NodeRef<K, V, P>, range: Range<usize>) -> Self {
        let end = range.end.min(root.total_elements());
        let start = range.start.min(end);
        let mut fwd = Cursor::empty();
        let mut bwd = Cursor::empty();
        if start < end {
            fwd.seek_to_offset(root, start);
            bwd.seek_to_offset(root, end - 1);
        }
        Self {
            fwd,
            bwd,
            remaining: end - start,
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.fwd.peek();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.fwd.next();
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, P: SharedPointerKind> DoubleEndedIterator for Iter<'a, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.bwd.peek();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.bwd.prev();
        }
        item
    }
}

impl<'a, K, V, P: SharedPointerKind> ExactSizeIterator for Iter<'a, K, V, P> {}

impl<'a, K, V, P: SharedPointerKind> Clone for Iter<'a, K, V, P> {
    fn clone(&self) -> Self {
        Self {
            fwd: self.fwd.clone(),
            bwd: self.bwd.clone(),
            remaining: self.remaining,
        }
    }
}
