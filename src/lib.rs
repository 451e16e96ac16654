// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! # Sorted collections with copy-on-write sharing
//!
//! This crate provides [`SortedDict`], an ordered map backed by a B-tree
//! whose nodes are shared between copies. Cloning a dictionary is O(1):
//! the copy points at the same root node as the original. A write to
//! either copy first checks whether each node it is about to change is
//! shared, and if so copies that node, so the other copy never sees the
//! change.
//!
//! ## Positions
//!
//! Every node records how many elements its subtree holds, which makes
//! positional access ([`get_index`][GenericSortedDict::get_index],
//! [`index_at`][GenericSortedDict::index_at]) O(log n).
//!
//! Positions are represented by [`Index`][sorted_dict::Index] values. An
//! index remembers the exact state of the dictionary that issued it and is
//! checked on every use: using an index after the dictionary has been
//! written to, or with a different dictionary, panics.
//!
//! ## Threads
//!
//! The copy-on-write check is a reference count test. [`SortedDict`] uses
//! [`RcK`][shared_ptr::RcK] pointers, which makes it neither [`Send`] nor
//! [`Sync`]. To move dictionaries between threads, use
//! [`GenericSortedDict`] with [`ArcK`][shared_ptr::ArcK] (or `ArcTK` with
//! the `triomphe` feature).
//!
//! ## Node sizes
//!
//! Leaves and internal nodes have separate fixed capacities, chosen when a
//! dictionary is created. [`SortedDict::new`][GenericSortedDict::new] uses
//! 470 elements per leaf and 16 per internal node; the `small-chunks`
//! feature shrinks those to 5 and 3, which makes for deep trees in tests.
//! [`with_capacities`][GenericSortedDict::with_capacities] picks them per
//! dictionary.
//!
//! ## Feature flags
//!
//! | Feature | Description |
//! | ------- | ----------- |
//! | [`debug`](#) | Check node invariants after every split and insertion |
//! | [`small-chunks`](#) | Use tiny default node capacities |
//! | [`triomphe`](https://crates.io/crates/triomphe) | Export `ArcTK` from [`shared_ptr`] |
//! | [`proptest`](https://crates.io/crates/proptest) | Strategies for dictionaries in [`proptest`](crate::proptest) |
//! | [`arbitrary`](https://crates.io/crates/arbitrary/) | [`Arbitrary`](https://docs.rs/arbitrary/latest/arbitrary/trait.Arbitrary.html) implementation for [`GenericSortedDict`] |

#![forbid(rust_2018_idioms)]
#![deny(nonstandard_style)]
#![warn(unreachable_pub, missing_docs)]

#[macro_use]
mod util;

mod btree;
mod config;
mod nodes;

pub mod shared_ptr;
pub mod sorted_dict;

#[cfg(feature = "arbitrary")]
mod arbitrary;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

pub use crate::sorted_dict::{GenericSortedDict, SortedDict};
