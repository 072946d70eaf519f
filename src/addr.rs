//! Address key flavour: the record's own identity is the key.
//!
//! No key material is stored at all; two branch references per element
//! is the entire footprint. Ordering follows the numeric value of the
//! record addresses, which makes this flavour a compact membership set
//! over caller-owned records.

use core::ptr::NonNull;

use crate::descent::{ScalarBlind, ScalarKeyed, ScalarSearch};
use crate::node::Node;
use crate::tree::{Flavor, Tree};

pub struct AddrFlavor;

impl ScalarKeyed for AddrFlavor {
    type Word = usize;

    unsafe fn key_of(n: NonNull<Node>) -> usize {
        n.as_ptr() as usize
    }
}

unsafe impl Flavor for AddrFlavor {
    type Entry = Node;
    type Key = Node;
    type Search = ScalarSearch<AddrFlavor>;
    type Blind = ScalarBlind<AddrFlavor>;

    fn search(key: &Node) -> Self::Search {
        ScalarSearch::new(key as *const Node as usize)
    }

    unsafe fn search_entry(e: NonNull<Node>) -> Self::Search {
        ScalarSearch::new(e.as_ptr() as usize)
    }

    fn blind() -> Self::Blind {
        ScalarBlind::new()
    }

    unsafe fn node_of(e: NonNull<Node>) -> NonNull<Node> {
        e
    }

    unsafe fn entry_of(n: NonNull<Node>) -> NonNull<Node> {
        n
    }
}

/// Ordered set of records keyed by their own addresses.
pub struct AddrTree(Tree<AddrFlavor>);

impl AddrTree {
    pub const fn new() -> Self {
        AddrTree(Tree::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Safety
    /// `n` must be detached, address-stable and live for as long as it
    /// resides in the tree.
    pub unsafe fn insert(&mut self, n: NonNull<Node>) -> NonNull<Node> {
        unsafe { self.0.insert(n) }
    }

    /// Membership probe; the address of `n` is the key looked up.
    pub fn contains(&self, n: &Node) -> bool {
        self.0.lookup(n).is_some()
    }

    pub fn lookup_ge(&self, n: &Node) -> Option<&Node> {
        self.0.lookup_ge(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_gt(&self, n: &Node) -> Option<&Node> {
        self.0.lookup_gt(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_le(&self, n: &Node) -> Option<&Node> {
        self.0.lookup_le(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn lookup_lt(&self, n: &Node) -> Option<&Node> {
        self.0.lookup_lt(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn first(&self) -> Option<&Node> {
        self.0.first().map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn last(&self) -> Option<&Node> {
        self.0.last().map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn next(&self, n: &Node) -> Option<&Node> {
        self.0.next(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn prev(&self, n: &Node) -> Option<&Node> {
        self.0.prev(n).map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn delete<'a>(&mut self, n: &'a Node) -> Option<&'a Node> {
        self.0.delete(n)
    }

    /// Remove by address, handing the record back to the caller.
    pub fn pick(&mut self, n: &Node) -> Option<NonNull<Node>> {
        self.0.pick(n)
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
        label: impl Fn(&Node) -> String,
    ) -> core::fmt::Result {
        crate::dot::dump(&self.0, out, label)
    }
}

impl Default for AddrTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate rand;
    use super::*;
    use rand::prelude::*;

    #[test]
    fn hundred_records_walk_in_address_order() {
        let nodes: Vec<Box<Node>> = (0..100).map(|_| Box::new(Node::new())).collect();
        let mut order: Vec<usize> = (0..100).collect();
        order.shuffle(&mut rand::thread_rng());

        let mut t = AddrTree::new();
        for &i in &order {
            let p = NonNull::from(&*nodes[i]);
            assert_eq!(unsafe { t.insert(p) }, p);
        }
        assert_eq!(t.audit(), 100);

        let mut addrs: Vec<usize> = nodes
            .iter()
            .map(|n| &**n as *const Node as usize)
            .collect();
        addrs.sort_unstable();
        assert_eq!(t.first().map(|n| n as *const Node as usize), addrs.first().copied());
        assert_eq!(t.last().map(|n| n as *const Node as usize), addrs.last().copied());

        let mut got = Vec::new();
        let mut cur = t.first();
        while let Some(n) = cur {
            got.push(n as *const Node as usize);
            cur = t.next(n);
        }
        assert_eq!(got, addrs);
    }

    #[test]
    fn delete_and_reinsert_same_record() {
        let nodes: Vec<Box<Node>> = (0..10).map(|_| Box::new(Node::new())).collect();
        let mut t = AddrTree::new();
        for n in &nodes {
            unsafe { t.insert(NonNull::from(&**n)) };
        }
        let victim = &*nodes[4];
        assert!(t.contains(victim));
        assert!(t.delete(victim).is_some());
        assert!(!victim.in_tree());
        assert!(!t.contains(victim));
        assert!(t.delete(victim).is_none());

        unsafe { t.insert(NonNull::from(victim)) };
        assert!(t.contains(victim));
        assert_eq!(t.audit(), 10);
    }

    #[test]
    fn bounded_lookups_follow_addresses() {
        let nodes: Vec<Box<Node>> = (0..16).map(|_| Box::new(Node::new())).collect();
        let mut t = AddrTree::new();
        for n in &nodes {
            unsafe { t.insert(NonNull::from(&**n)) };
        }
        let mut sorted: Vec<&Node> = nodes.iter().map(|n| &**n).collect();
        sorted.sort_unstable_by_key(|n| *n as *const Node as usize);

        let mid = sorted[7];
        assert!(core::ptr::eq(t.lookup_ge(mid).unwrap(), mid));
        assert!(core::ptr::eq(t.lookup_gt(mid).unwrap(), sorted[8]));
        assert!(core::ptr::eq(t.lookup_lt(mid).unwrap(), sorted[6]));
        assert!(t.lookup_lt(sorted[0]).is_none());
        assert!(t.lookup_gt(sorted[15]).is_none());
    }
}
