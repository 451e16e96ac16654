// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Positions in a [`GenericSortedDict`][super::GenericSortedDict].

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Debug, Error, Formatter};

use archery::{SharedPointer, SharedPointerKind};

use super::GenericSortedDict;
use crate::btree::Path;
use crate::nodes::NodeRef;

const INVALID_INDEX: &str = "Attempt to use an invalid SortedDictionary index.";

/// A position in a [`GenericSortedDict`][super::GenericSortedDict]: either
/// one of its elements or the end position just past the last element.
///
/// An index belongs to the dictionary that issued it and to the state that
/// dictionary was in at the time. Any write to the dictionary invalidates
/// every index issued before it, and handing a stale index, or one issued
/// by another dictionary, to a dictionary method panics.
///
/// An index keeps the nodes it was issued against alive, so writing to a
/// dictionary while holding one of its indices copies the nodes that
/// write touches.
pub struct Index<K, V, P: SharedPointerKind> {
    path: Option<Path<K, V, P>>,
    root: NodeRef<K, V, P>,
    generation: u64,
}

impl<K, V, P: SharedPointerKind> Index<K, V, P> {
    /// Test whether this is the end index.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.path.is_none()
    }

    fn same_dict(&self, other: &Self) -> bool {
        SharedPointer::ptr_eq(&self.root, &other.root) && self.generation == other.generation
    }
}

impl<K, V, P: SharedPointerKind> Clone for Index<K, V, P> {
    fn clone(&self) -> Self {
        Index {
            path: self.path.clone(),
            root: self.root.clone(),
            generation: self.generation,
        }
    }
}

impl<K, V, P: SharedPointerKind> Debug for Index<K, V, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match &self.path {
            Some(path) => f
                .debug_struct("Index")
                .field("offsets", &path.offsets())
                .field("slot", &path.slot())
                .field("generation", &self.generation)
                .finish(),
            None => f
                .debug_struct("Index")
                .field("end", &true)
                .field("generation", &self.generation)
                .finish(),
        }
    }
}

/// Only indices issued by the same dictionary in the same state can be
/// compared; comparing any others panics.
impl<K, V, P: SharedPointerKind> PartialEq for Index<K, V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K, V, P: SharedPointerKind> Eq for Index<K, V, P> {}

impl<K, V, P: SharedPointerKind> PartialOrd for Index<K, V, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V, P: SharedPointerKind> Ord for Index<K, V, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        assert!(
            self.same_dict(other),
            "Attempt to compare indices from different SortedDictionary states."
        );
        match (&self.path, &other.path) {
            (Some(left), Some(right)) => left.cmp(right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl<K, V, P: SharedPointerKind> GenericSortedDict<K, V, P> {
    fn make_index(&self, path: Option<Path<K, V, P>>) -> Index<K, V, P> {
        Index {
            path,
            root: self.tree.root().clone(),
            generation: self.tree.generation(),
        }
    }

    fn validate(&self, index: &Index<K, V, P>) {
        assert!(
            SharedPointer::ptr_eq(&index.root, self.tree.root())
                && index.generation == self.tree.generation(),
            "{}",
            INVALID_INDEX
        );
    }

    fn element_path<'i>(&self, index: &'i Index<K, V, P>) -> &'i Path<K, V, P> {
        self.validate(index);
        match &index.path {
            Some(path) => path,
            None => panic!("Attempt to access the end index of a SortedDictionary."),
        }
    }

    /// Get the index of the first element, which is the end index when the
    /// dictionary is empty.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn start_index(&self) -> Index<K, V, P> {
        self.make_index(self.tree.first_path())
    }

    /// Get the end index, the position just past the last element.
    ///
    /// Time: O(1)
    #[must_use]
    pub fn end_index(&self) -> Index<K, V, P> {
        self.make_index(None)
    }

    /// Get the index of the element following `index`.
    ///
    /// Panics if `index` is invalid for this dictionary or is the end index.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn index_after(&self, index: &Index<K, V, P>) -> Index<K, V, P> {
        let path = self.element_path(index);
        self.make_index(path.advanced(self.tree.root()))
    }

    /// Get the index of the element preceding `index`.
    ///
    /// Panics if `index` is invalid for this dictionary or is the start
    /// index.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn index_before(&self, index: &Index<K, V, P>) -> Index<K, V, P> {
        self.validate(index);
        let path = match &index.path {
            Some(path) => path.retreated(self.tree.root()),
            None => self.tree.last_path(),
        };
        match path {
            Some(path) => self.make_index(Some(path)),
            None => panic!("Attempt to move before the start index of a SortedDictionary."),
        }
    }

    /// Get the index of the element at in-order position `offset`, or the
    /// end index when `offset` equals the length of the dictionary.
    ///
    /// Panics if `offset` is greater than the length.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn index_at(&self, offset: usize) -> Index<K, V, P> {
        assert!(offset <= self.len(), "SortedDict::index_at: offset out of bounds");
        if offset == self.len() {
            self.end_index()
        } else {
            self.make_index(Some(self.tree.path_to_element(offset)))
        }
    }

    /// Get the in-order position of `index`. The end index sits at the
    /// length of the dictionary.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn offset_of(&self, index: &Index<K, V, P>) -> usize {
        self.validate(index);
        match &index.path {
            Some(path) => self.tree.offset_of(path),
            None => self.len(),
        }
    }

    /// Get the number of steps from `from` to `to`, negative when `to`
    /// comes first.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn distance(&self, from: &Index<K, V, P>, to: &Index<K, V, P>) -> isize {
        self.offset_of(to) as isize - self.offset_of(from) as isize
    }

    /// Get the index `distance` elements away from `index`, counting
    /// backwards when `distance` is negative. The end index is one step
    /// past the last element.
    ///
    /// Panics if `index` is invalid for this dictionary, or if the result
    /// would fall before the start index or after the end index.
    ///
    /// Time: O(log n), or O(1) when the result is in the same leaf
    #[must_use]
    pub fn index_offset_by(&self, index: &Index<K, V, P>, distance: isize) -> Index<K, V, P> {
        let target = self
            .offset_of(index)
            .checked_add_signed(distance)
            .filter(|target| *target <= self.len());
        let target = match target {
            Some(target) => target,
            None => panic!("Attempt to move an index out of the bounds of a SortedDictionary."),
        };
        if target == self.len() {
            return self.end_index();
        }
        match index.path.as_ref().and_then(|path| path.shifted_in_leaf(distance)) {
            Some(path) => self.make_index(Some(path)),
            None => self.make_index(Some(self.tree.path_to_element(target))),
        }
    }

    /// Get the index `distance` elements away from `index`, or `None` if
    /// `limit` lies strictly between `index` and that position. A limit on
    /// the other side of `index` from the direction of travel is ignored,
    /// and landing exactly on `limit` succeeds.
    ///
    /// Panics if either index is invalid for this dictionary, or if the
    /// result would fall outside the dictionary.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn index_offset_by_limited(
        &self,
        index: &Index<K, V, P>,
        distance: isize,
        limit: &Index<K, V, P>,
    ) -> Option<Index<K, V, P>> {
        let to_limit = self.distance(index, limit);
        let overshoots = if distance >= 0 {
            (0..distance).contains(&to_limit)
        } else {
            (distance + 1..=0).contains(&to_limit)
        };
        if overshoots {
            None
        } else {
            Some(self.index_offset_by(index, distance))
        }
    }

    /// Get the key and value at `index`.
    ///
    /// Panics if `index` is invalid for this dictionary or is the end index.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn element(&self, index: &Index<K, V, P>) -> (&K, &V) {
        let path = self.element_path(index);
        match path.cursor(self.tree.root()).peek() {
            Some(element) => element,
            None => unreachable!("a valid path always points at an element"),
        }
    }
}

impl<K: Ord, V, P: SharedPointerKind> GenericSortedDict<K, V, P> {
    /// Get the index of the first element with `key`.
    ///
    /// Time: O(log n)
    #[must_use]
    pub fn index_of<BK>(&self, key: &BK) -> Option<Index<K, V, P>>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let path = self.tree.find_first_key(key)?;
        Some(self.make_index(Some(path)))
    }
}

impl<K: Ord + Clone, V: Clone, P: SharedPointerKind> GenericSortedDict<K, V, P> {
    /// Replace the value at `index`, returning the previous value.
    ///
    /// This invalidates every index issued before it, `index` included.
    /// Panics if `index` is invalid for this dictionary or is the end index.
    ///
    /// Time: O(log n)
    pub fn set_value_at(&mut self, index: &Index<K, V, P>, value: V) -> V {
        let path = self.element_path(index);
        self.tree.set_value(path, value)
    }
}
