// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// The number of elements a leaf node holds before it splits.
#[cfg(feature = "small-chunks")]
pub(crate) const DEFAULT_LEAF_CAPACITY: usize = 5;
#[cfg(not(feature = "small-chunks"))]
pub(crate) const DEFAULT_LEAF_CAPACITY: usize = 470;

/// The number of elements an internal node holds before it splits.
#[cfg(feature = "small-chunks")]
pub(crate) const DEFAULT_INTERNAL_CAPACITY: usize = 3;
#[cfg(not(feature = "small-chunks"))]
pub(crate) const DEFAULT_INTERNAL_CAPACITY: usize = 16;

/// The smallest capacity for which a node split is meaningful (a 2-3 tree).
pub(crate) const MIN_CAPACITY: usize = 2;

/// A rough upper bound on tree depth, used to size traversal stacks.
pub(crate) const EXPECTED_MAX_DEPTH: usize = 10;
