//! About shared pointers. Re-export the [`archery`] crate.
//!
//! Nodes of the tree live behind an [`archery::SharedPointer`]. Copying a
//! dictionary copies one pointer; a node is only duplicated when a write
//! reaches it while another copy still refers to it.
//!
//! [`archery`]: https://docs.rs/archery/latest/

pub use archery::{ArcK, RcK, SharedPointer, SharedPointerKind};

#[cfg(feature = "triomphe")]
pub use archery::ArcTK;

/// Default shared pointer used in [`sorted_dict::SortedDict`]. This alias points to [`RcK`].
///
/// The copy-on-write uniqueness test is a reference count check, which is
/// only meaningful while one thread owns every copy. With [`RcK`] the
/// default dictionary is neither `Send` nor `Sync`. Use
/// [`GenericSortedDict`] with [`ArcK`] to share snapshots across threads.
///
/// [`sorted_dict::SortedDict`]: ../sorted_dict/type.SortedDict.html
/// [`GenericSortedDict`]: ../sorted_dict/struct.GenericSortedDict.html
/// [`RcK`]: https://docs.rs/archery/latest/archery/shared_pointer/kind/struct.RcK.html
/// [`ArcK`]: https://docs.rs/archery/latest/archery/shared_pointer/kind/struct.ArcK.html
pub type DefaultSharedPtr = RcK;
