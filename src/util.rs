// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Every codebase needs a `util` module.

use std::ops::{Bound, Range, RangeBounds};

/// Resolves a key range into a half-open range of in-order offsets.
///
/// `lower` returns the number of elements strictly less than a key and
/// `upper` the number of elements less than or equal to it. An inverted key
/// range resolves to an empty offset range rather than panicking.
pub(crate) fn to_offset_range<R, BK, L, U>(
    range: &R,
    len: usize,
    lower: L,
    upper: U,
) -> Range<usize>
where
    R: RangeBounds<BK>,
    BK: ?Sized,
    L: Fn(&BK) -> usize,
    U: Fn(&BK) -> usize,
{
    let start = match range.start_bound() {
        Bound::Included(key) => lower(key),
        Bound::Excluded(key) => upper(key),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(key) => upper(key),
        Bound::Excluded(key) => lower(key),
        Bound::Unbounded => len,
    };
    start..end.max(start)
}

#[cfg(test)]
macro_rules! assert_covariant {
    ($name:ident<$($gen:tt),*> in $param:ident) => {
        #[allow(dead_code, unused_assignments, unused_variables)]
        const _: () = {
            type Tmp<$param> = $name<$($gen),*>;
            fn assign<'a, 'b: 'a>(src: Tmp<&'b i32>, mut dst: Tmp<&'a i32>) {
                dst = src;
            }
        };
    }
}
