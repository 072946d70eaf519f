//! Compact binary trees: ordered intrusive containers whose elements
//! carry exactly two branch references and nothing else.
//!
//! Every element embeds a [`Node`]; the caller owns the elements and the
//! tree only ever touches their two branch slots. One record plays both
//! an internal-node role and a leaf role along any root-to-leaf path,
//! which is what keeps the per-entry overhead at two references: no
//! parent pointers, no balance bits, no sizes. Lookups, ordered walks,
//! range lookups, insertion and deletion all cost a number of steps
//! bounded by the key bit-length, with no rebalancing ever.
//!
//! One descent engine serves every key flavour:
//!
//! - [`U32Tree`] / [`U64Tree`]: inline integer keys, XOR-discriminated
//! - [`BlockTree`]: fixed-length byte blocks, ordered lexicographically
//! - [`StrTree`]: NUL-terminated strings owned by their entries
//! - [`IndirectTree`]: NUL-terminated strings referenced by their entries
//! - [`AddrTree`]: the record's own address is the key
//!
//! Keys are unique per tree; inserting a duplicate hands back the
//! incumbent entry. Trees are strictly single-threaded (`!Sync` by
//! construction); distinct trees may live on distinct threads.
//!
//! ```
//! use cbtree::{U32Entry, U32Tree};
//! use core::ptr::NonNull;
//!
//! let mut t = U32Tree::new();
//! let a = Box::new(U32Entry::new(7));
//! let b = Box::new(U32Entry::new(3));
//! unsafe {
//!     t.insert(NonNull::from(&*a));
//!     t.insert(NonNull::from(&*b));
//! }
//! assert_eq!(t.first().map(U32Entry::key), Some(3));
//! assert_eq!(t.lookup_ge(4).map(U32Entry::key), Some(7));
//! assert!(t.delete(&b).is_some());
//! assert!(!b.in_tree());
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod addr;
mod bytes;
mod descent;
#[cfg(feature = "graphviz")]
mod dot;
mod key;
mod node;
mod scalar;
mod string;
mod tree;

pub use addr::AddrTree;
pub use bytes::{BlockEntry, BlockTree};
pub use node::Node;
pub use scalar::{U32Entry, U32Tree, U64Entry, U64Tree};
pub use string::{IndirectEntry, IndirectTree, StrEntry, StrTree};
