//! Fixed-width integer key flavours.

use core::ptr::NonNull;

use crate::descent::{ScalarBlind, ScalarKeyed, ScalarSearch};
use crate::node::Node;
use crate::tree::{Flavor, Tree};

macro_rules! scalar_flavor {
    ($(#[$doc:meta])* $Tree:ident, $Entry:ident, $Marker:ident, $W:ty) => {
        /// Caller-owned element carrying an inline scalar key.
        #[repr(C)]
        pub struct $Entry {
            node: Node,
            key: $W,
        }

        impl $Entry {
            pub const fn new(key: $W) -> Self {
                $Entry {
                    node: Node::new(),
                    key,
                }
            }

            #[inline]
            pub fn key(&self) -> $W {
                self.key
            }

            #[inline]
            pub fn in_tree(&self) -> bool {
                self.node.in_tree()
            }
        }

        pub struct $Marker;

        impl ScalarKeyed for $Marker {
            type Word = $W;

            unsafe fn key_of(n: NonNull<Node>) -> $W {
                unsafe { (*(n.as_ptr() as *const $Entry)).key }
            }
        }

        unsafe impl Flavor for $Marker {
            type Entry = $Entry;
            type Key = $W;
            type Search = ScalarSearch<$Marker>;
            type Blind = ScalarBlind<$Marker>;

            fn search(key: &$W) -> Self::Search {
                ScalarSearch::new(*key)
            }

            unsafe fn search_entry(e: NonNull<$Entry>) -> Self::Search {
                ScalarSearch::new(unsafe { e.as_ref() }.key)
            }

            fn blind() -> Self::Blind {
                ScalarBlind::new()
            }

            unsafe fn node_of(e: NonNull<$Entry>) -> NonNull<Node> {
                e.cast()
            }

            unsafe fn entry_of(n: NonNull<Node>) -> NonNull<$Entry> {
                n.cast()
            }
        }

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

            /// Insert a caller-owned entry; on a duplicate key the
            /// incumbent is returned instead and the tree is unchanged.
            ///
            /// # Safety
            /// `e` must be detached, address-stable and live for as long
            /// as it resides in the tree, with an unchanging key.
            pub unsafe fn insert(&mut self, e: NonNull<$Entry>) -> NonNull<$Entry> {
                unsafe { self.0.insert(e) }
            }

            pub fn lookup(&self, key: $W) -> Option<&$Entry> {
                self.0.lookup(&key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_ge(&self, key: $W) -> Option<&$Entry> {
                self.0.lookup_ge(&key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_gt(&self, key: $W) -> Option<&$Entry> {
                self.0.lookup_gt(&key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_le(&self, key: $W) -> Option<&$Entry> {
                self.0.lookup_le(&key).map(|p| unsafe { &*p.as_ptr() })
            }

            pub fn lookup_lt(&self, key: $W) -> Option<&$Entry> {
                self.0.lookup_lt(&key).map(|p| unsafe { &*p.as_ptr() })
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

            /// Remove `e`; detached entries are left alone and yield
            /// `None`.
            pub fn delete<'a>(&mut self, e: &'a $Entry) -> Option<&'a $Entry> {
                self.0.delete(e)
            }

            /// Remove by key, handing the entry back to the caller.
            pub fn pick(&mut self, key: $W) -> Option<NonNull<$Entry>> {
                self.0.pick(&key)
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

scalar_flavor!(
    /// Ordered tree over 32-bit integer keys.
    U32Tree,
    U32Entry,
    U32Flavor,
    u32
);

scalar_flavor!(
    /// Ordered tree over 64-bit integer keys.
    U64Tree,
    U64Entry,
    U64Flavor,
    u64
);
