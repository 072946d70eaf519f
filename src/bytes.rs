//! Fixed-length byte block key flavour.

use core::ptr::NonNull;

use crate::descent::{ByteBlind, ByteKeyed, ByteSearch};
use crate::node::Node;
use crate::tree::{Flavor, Tree};

/// Caller-owned element carrying an inline block of `N` key bytes.
#[repr(C)]
pub struct BlockEntry<const N: usize> {
    node: Node,
    key: [u8; N],
}

impl<const N: usize> BlockEntry<N> {
    pub const fn new(key: [u8; N]) -> Self {
        BlockEntry {
            node: Node::new(),
            key,
        }
    }

    #[inline]
    pub fn key(&self) -> &[u8; N] {
        &self.key
    }

    #[inline]
    pub fn in_tree(&self) -> bool {
        self.node.in_tree()
    }
}

pub struct BlockFlavor<const N: usize>;

impl<const N: usize> ByteKeyed for BlockFlavor<N> {
    unsafe fn key_bytes<'a>(n: NonNull<Node>) -> &'a [u8] {
        let e: &'a BlockEntry<N> = unsafe { &*(n.as_ptr() as *const BlockEntry<N>) };
        &e.key
    }
}

unsafe impl<const N: usize> Flavor for BlockFlavor<N> {
    type Entry = BlockEntry<N>;
    type Key = [u8; N];
    type Search = ByteSearch<Self>;
    type Blind = ByteBlind<Self>;

    fn search(key: &[u8; N]) -> Self::Search {
        ByteSearch::new(key)
    }

    unsafe fn search_entry(e: NonNull<Self::Entry>) -> Self::Search {
        ByteSearch::new(&unsafe { &*e.as_ptr() }.key)
    }

    fn blind() -> Self::Blind {
        ByteBlind::new()
    }

    unsafe fn node_of(e: NonNull<Self::Entry>) -> NonNull<Node> {
        e.cast()
    }

    unsafe fn entry_of(n: NonNull<Node>) -> NonNull<Self::Entry> {
        n.cast()
    }
}

/// Ordered tree over fixed-length byte blocks, compared lexicographically.
pub struct BlockTree<const N: usize>(Tree<BlockFlavor<N>>);

impl<const N: usize> BlockTree<N> {
    pub const fn new() -> Self {
        BlockTree(Tree::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Safety
    /// `e` must be detached, address-stable and live for as long as it
    /// resides in the tree, with an unchanging key.
    pub unsafe fn insert(&mut self, e: NonNull<BlockEntry<N>>) -> NonNull<BlockEntry<N>> {
        unsafe { self.0.insert(e) }
    }

    pub fn lookup(&self, key: &[u8; N]) -> Option<&BlockEntry<N>> {
        self.0.lookup(key).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_ge(&self, key: &[u8; N]) -> Option<&BlockEntry<N>> {
        self.0.lookup_ge(key).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_gt(&self, key: &[u8; N]) -> Option<&BlockEntry<N>> {
        self.0.lookup_gt(key).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_le(&self, key: &[u8; N]) -> Option<&BlockEntry<N>> {
        self.0.lookup_le(key).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_lt(&self, key: &[u8; N]) -> Option<&BlockEntry<N>> {
        self.0.lookup_lt(key).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn first(&self) -> Option<&BlockEntry<N>> {
        self.0.first().map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn last(&self) -> Option<&BlockEntry<N>> {
        self.0.last().map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn next(&self, e: &BlockEntry<N>) -> Option<&BlockEntry<N>> {
        self.0.next(e).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn prev(&self, e: &BlockEntry<N>) -> Option<&BlockEntry<N>> {
        self.0.prev(e).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn delete<'a>(&mut self, e: &'a BlockEntry<N>) -> Option<&'a BlockEntry<N>> {
        self.0.delete(e)
    }

    pub fn pick(&mut self, key: &[u8; N]) -> Option<NonNull<BlockEntry<N>>> {
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
        label: impl Fn(&BlockEntry<N>) -> String,
    ) -> core::fmt::Result {
        crate::dot::dump(&self.0, out, label)
    }
}

impl<const N: usize> Default for BlockTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{smoke, SmokeMap};
    use core::ptr::NonNull;

    struct H {
        tree: BlockTree<4>,
        ents: Vec<Box<BlockEntry<4>>>,
    }

    impl H {
        fn new() -> Self {
            H {
                tree: BlockTree::new(),
                ents: Vec::new(),
            }
        }
    }

    // big-endian blocks order the same way the integers do
    impl SmokeMap for H {
        fn insert(&mut self, k: u32) -> bool {
            let e = Box::new(BlockEntry::new(k.to_be_bytes()));
            let p = NonNull::from(&*e);
            self.ents.push(e);
            unsafe { self.tree.insert(p) == p }
        }

        fn remove(&mut self, k: u32) -> bool {
            self.tree.pick(&k.to_be_bytes()).is_some()
        }

        fn get(&self, k: u32) -> bool {
            self.tree.lookup(&k.to_be_bytes()).is_some()
        }

        fn first_key(&self) -> Option<u32> {
            self.tree.first().map(|e| u32::from_be_bytes(*e.key()))
        }

        fn last_key(&self) -> Option<u32> {
            self.tree.last().map(|e| u32::from_be_bytes(*e.key()))
        }

        fn next_key(&self, k: u32) -> Option<u32> {
            let e = self.tree.lookup(&k.to_be_bytes())?;
            self.tree.next(e).map(|e| u32::from_be_bytes(*e.key()))
        }

        fn prev_key(&self, k: u32) -> Option<u32> {
            let e = self.tree.lookup(&k.to_be_bytes())?;
            self.tree.prev(e).map(|e| u32::from_be_bytes(*e.key()))
        }

        fn ge_key(&self, k: u32) -> Option<u32> {
            self.tree
                .lookup_ge(&k.to_be_bytes())
                .map(|e| u32::from_be_bytes(*e.key()))
        }

        fn le_key(&self, k: u32) -> Option<u32> {
            self.tree
                .lookup_le(&k.to_be_bytes())
                .map(|e| u32::from_be_bytes(*e.key()))
        }

        fn population(&self) -> usize {
            self.tree.audit()
        }
    }

    #[test]
    fn smoke_blocks() {
        smoke(&mut H::new());
    }

    #[test]
    fn lexicographic_walk() {
        let mut t = BlockTree::<3>::new();
        let keys: [[u8; 3]; 5] = [*b"abc", *b"abd", *b"aaa", *b"zzz", *b"mmm"];
        let ents: Vec<Box<BlockEntry<3>>> =
            keys.iter().map(|&k| Box::new(BlockEntry::new(k))).collect();
        for e in &ents {
            unsafe { t.insert(NonNull::from(&**e)) };
        }
        assert_eq!(t.first().unwrap().key(), b"aaa");
        assert_eq!(t.last().unwrap().key(), b"zzz");
        assert_eq!(t.lookup_ge(b"abz").unwrap().key(), b"mmm");
        assert_eq!(t.lookup_lt(b"abc").unwrap().key(), b"aaa");

        let mut got = Vec::new();
        let mut cur = t.first();
        while let Some(e) = cur {
            got.push(*e.key());
            cur = t.next(e);
        }
        assert_eq!(got, [*b"aaa", *b"abc", *b"abd", *b"mmm", *b"zzz"]);
    }

    #[test]
    fn delete_rewires_node_role() {
        let mut t = BlockTree::<2>::new();
        let ents: Vec<Box<BlockEntry<2>>> = [*b"aa", *b"ab", *b"ba", *b"bb"]
            .iter()
            .map(|&k| Box::new(BlockEntry::new(k)))
            .collect();
        for e in &ents {
            unsafe { t.insert(NonNull::from(&**e)) };
        }
        // remove a record whose node and leaf roles sit apart
        assert!(t.delete(&ents[2]).is_some());
        assert_eq!(t.audit(), 3);
        assert_eq!(t.lookup_ge(b"b_").unwrap().key(), b"bb");
        assert!(t.lookup(b"ba").is_none());
    }
}
