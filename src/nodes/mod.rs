// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod cursor;
mod handle;
mod node;
mod split;

pub(crate) use self::cursor::{Cursor, Iter};
pub(crate) use self::node::{Node, NodeRef};
pub(crate) use self::split::Splinter;
