//! NUL-terminated string key flavours.
//!
//! Two layouts share one key discipline: `StrEntry` owns its string,
//! `IndirectEntry` stores only a reference to one kept alive elsewhere.
//! Comparison runs over the bytes including the terminator, which is
//! what orders a key before every one of its extensions.

use core::ffi::c_char;
use core::ptr::NonNull;
use std::ffi::{CStr, CString};

use crate::descent::{ByteBlind, ByteKeyed, ByteSearch};
use crate::node::Node;
use crate::tree::{Flavor, Tree};

/// Caller-owned element owning its NUL-terminated key.
#[repr(C)]
pub struct StrEntry {
    node: Node,
    key: CString,
}

impl StrEntry {
    pub fn new(key: CString) -> Self {
        StrEntry {
            node: Node::new(),
            key,
        }
    }

    #[inline]
    pub fn key(&self) -> &CStr {
        &self.key
    }

    #[inline]
    pub fn in_tree(&self) -> bool {
        self.node.in_tree()
    }
}

pub struct StrFlavor;

impl ByteKeyed for StrFlavor {
    unsafe fn key_bytes<'a>(n: NonNull<Node>) -> &'a [u8] {
        let e: &'a StrEntry = unsafe { &*(n.as_ptr() as *const StrEntry) };
        e.key.to_bytes_with_nul()
    }
}

unsafe impl Flavor for StrFlavor {
    type Entry = StrEntry;
    type Key = CStr;
    type Search = ByteSearch<Self>;
    type Blind = ByteBlind<Self>;

    fn search(key: &CStr) -> Self::Search {
        ByteSearch::new(key.to_bytes_with_nul())
    }

    unsafe fn search_entry(e: NonNull<StrEntry>) -> Self::Search {
        ByteSearch::new(unsafe { &*e.as_ptr() }.key.to_bytes_with_nul())
    }

    fn blind() -> Self::Blind {
        ByteBlind::new()
    }

    unsafe fn node_of(e: NonNull<StrEntry>) -> NonNull<Node> {
        e.cast()
    }

    unsafe fn entry_of(n: NonNull<Node>) -> NonNull<StrEntry> {
        n.cast()
    }
}

/// Caller-owned element referencing a NUL-terminated key stored
/// elsewhere.
#[repr(C)]
pub struct IndirectEntry {
    node: Node,
    key: *const c_char,
}

impl IndirectEntry {
    /// The pointer is not dereferenced until the entry takes part in a
    /// tree operation.
    pub const fn new(key: *const c_char) -> Self {
        IndirectEntry {
            node: Node::new(),
            key,
        }
    }

    /// # Safety
    /// The pointer handed to [`IndirectEntry::new`] must still refer to
    /// a live NUL-terminated sequence.
    pub unsafe fn key(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.key) }
    }

    #[inline]
    pub fn in_tree(&self) -> bool {
        self.node.in_tree()
    }
}

pub struct IndirectFlavor;

impl ByteKeyed for IndirectFlavor {
    unsafe fn key_bytes<'a>(n: NonNull<Node>) -> &'a [u8] {
        let e = unsafe { &*(n.as_ptr() as *const IndirectEntry) };
        let k: &'a CStr = unsafe { CStr::from_ptr(e.key) };
        k.to_bytes_with_nul()
    }
}

unsafe impl Flavor for IndirectFlavor {
    type Entry = IndirectEntry;
    type Key = CStr;
    type Search = ByteSearch<Self>;
    type Blind = ByteBlind<Self>;

    fn search(key: &CStr) -> Self::Search {
        ByteSearch::new(key.to_bytes_with_nul())
    }

    unsafe fn search_entry(e: NonNull<IndirectEntry>) -> Self::Search {
        let k = unsafe { CStr::from_ptr((*e.as_ptr()).key) };
        ByteSearch::new(k.to_bytes_with_nul())
    }

    fn blind() -> Self::Blind {
        ByteBlind::new()
    }

    unsafe fn node_of(e: NonNull<IndirectEntry>) -> NonNull<Node> {
        e.cast()
    }

    unsafe fn entry_of(n: NonNull<Node>) -> NonNull<IndirectEntry> {
        n.cast()
    }
}

macro_rules! string_tree {
    ($(#[$doc:meta])* $Tree:ident, $Entry:ident, $Marker:ident) => {
        $(#[$doc])*
        pub struct $Tree(Tree<$Marker>);

        impl $Tree {
            pub const fn new() -> Self {
                $Tree(Tree::new())
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// # Safety
            /// `e` must be detached, address-stable and live for as long
            /// as it resides in the tree, with an unchanging key; an
            /// indirect entry's referenced key bytes must stay valid for
            /// the same span.
            pub unsafe fn insert(&mut self, e: NonNull<$Entry>) -> NonNull<$Entry> {
                unsafe { self.0.insert(e) }
            }

            pub fn lookup(&self, key: &CStr) -> Option<&$Entry> {
                self.0.lookup(key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_ge(&self, key: &CStr) -> Option<&$Entry> {
                self.0.lookup_ge(key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_gt(&self, key: &CStr) -> Option<&$Entry> {
                self.0.lookup_gt(key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_le(&self, key: &CStr) -> Option<&$Entry> {
                self.0.lookup_le(key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_lt(&self, key: &CStr) -> Option<&$Entry> {
                self.0.lookup_lt(key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn first(&self) -> Option<&$Entry> {
                self.0.first().map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn last(&self) -> Option<&$Entry> {
                self.0.last().map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn next(&self, e: &$Entry) -> Option<&$Entry> {
                self.0.next(e).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn prev(&self, e: &$Entry) -> Option<&$Entry> {
                self.0.prev(e).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn delete<'a>(&mut self, e: &'a $Entry) -> Option<&'a $Entry> {
                self.0.delete(e)
            }

            pub fn pick(&mut self, key: &CStr) -> Option<NonNull<$Entry>> {
                self.0.pick(key)
            }

            #[cfg(any(test, feature = "audit"))]
            pub fn audit(&self) -> usize {
                self.0.audit()
            }

            /// Render the topology as a Graphviz digraph.
            #[cfg(feature = "graphviz")]
            pub fn dump_dot<W: core::fmt::Write>(
                &self,
                out: &mut W,
                label: impl Fn(&$Entry) -> String,
            ) -> core::fmt::Result {
                crate::dot::dump(&self.0, out, label)
            }
        }

        impl Default for $Tree {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

string_tree!(
    /// Ordered tree over NUL-terminated strings stored inline in their
    /// entries.
    StrTree,
    StrEntry,
    StrFlavor
);

string_tree!(
    /// Ordered tree over NUL-terminated strings referenced by their
    /// entries.
    IndirectTree,
    IndirectEntry,
    IndirectFlavor
);
