//! Generic operation layer.
//!
//! `Tree<F>` resolves the whole operation surface for any key flavour by
//! delegating to the two walkers in `descent`. Flavours only describe
//! how their entry embeds the record and how to build the key
//! disciplines; everything else is shared.

use core::cell::Cell;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::descent::{seek_edge, seek_key, Discipline, Search, Seek, SeekMask};
use crate::node::{Link, Node};

/// A key flavour: entry layout plus the disciplines that compare it.
///
/// # Safety
/// `node_of` and `entry_of` must be exact inverses for live entries, and
/// the disciplines must order the flavour's key space totally and
/// consistently with `goes_right`.
pub unsafe trait Flavor {
    /// Caller-owned element type embedding a [`Node`].
    type Entry;
    /// Borrowed key used for key-parameterised calls.
    type Key: ?Sized;
    type Search: Search;
    type Blind: Discipline;

    /// Discipline keyed by a caller-supplied key. The key must stay
    /// live for every use of the returned discipline; the operations
    /// here never hold one past their own call.
    fn search(key: &Self::Key) -> Self::Search;

    /// Discipline keyed by the entry's own key.
    ///
    /// # Safety
    /// `e` must be live for as long as the returned discipline is used.
    unsafe fn search_entry(e: NonNull<Self::Entry>) -> Self::Search;

    fn blind() -> Self::Blind;

    /// # Safety
    /// `e` must refer to a live entry.
    unsafe fn node_of(e: NonNull<Self::Entry>) -> NonNull<Node>;

    /// # Safety
    /// `n` must be the node of a live entry of this flavour.
    unsafe fn entry_of(n: NonNull<Node>) -> NonNull<Self::Entry>;
}

/// An ordered tree of caller-owned entries.
///
/// The tree stores nothing but one root reference; entries carry the
/// whole topology in their two branch slots. Mutating operations take
/// `&mut self`, giving each operation exclusive use of the pointer
/// fabric for its duration.
pub struct Tree<F: Flavor> {
    root: Cell<Link>,
    _marker: PhantomData<F>,
}

impl<F: Flavor> Tree<F> {
    pub const fn new() -> Self {
        Tree {
            root: Cell::new(None),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.get().is_none()
    }

    /// Insert a caller-owned entry. Returns `e` on success, or the
    /// incumbent entry when the key is already present (the submitted
    /// entry is left untouched; callers tell the cases apart by
    /// identity).
    ///
    /// # Safety
    /// `e` must be detached, address-stable while it resides in the
    /// tree, and must outlive its residency. Its key must not change
    /// while it is in the tree.
    pub unsafe fn insert(&mut self, e: NonNull<F::Entry>) -> NonNull<F::Entry> {
        let node = unsafe { F::node_of(e) };
        debug_assert!(!unsafe { node.as_ref() }.in_tree());

        if self.root.get().is_none() {
            unsafe { node.as_ref() }.set_self();
            self.root.set(Some(node));
            return e;
        }

        let s = unsafe { F::search_entry(e) };
        let sk = unsafe { seek_key(&self.root, &s, SeekMask::empty()) };
        if !sk.mismatched && unsafe { s.hits(sk.leaf) } {
            return unsafe { F::entry_of(sk.leaf) };
        }

        // splice in: one branch is the entry's own leaf, the other the
        // subtree it displaces at the locus
        let q = sk.leaf;
        let n = unsafe { node.as_ref() };
        let nside = unsafe { s.goes_right(q) } as usize;
        n.branch(nside).set(Some(node));
        n.branch(1 - nside).set(Some(q));
        sk.slot.set(Some(node));
        e
    }

    pub fn lookup(&self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let s = F::search(key);
        let sk = unsafe { seek_key(&self.root, &s, SeekMask::empty()) };
        if !sk.mismatched && unsafe { s.hits(sk.leaf) } {
            Some(unsafe { F::entry_of(sk.leaf) })
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let n = unsafe { seek_edge(&self.root, &F::blind(), 0, 0) };
        Some(unsafe { F::entry_of(n) })
    }

    pub fn last(&self) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let n = unsafe { seek_edge(&self.root, &F::blind(), 1, 1) };
        Some(unsafe { F::entry_of(n) })
    }

    /// Successor of an entry that currently resides in this tree.
    pub fn next(&self, e: &F::Entry) -> Option<NonNull<F::Entry>> {
        self.neighbour(e, 1)
    }

    /// Predecessor of an entry that currently resides in this tree.
    pub fn prev(&self, e: &F::Entry) -> Option<NonNull<F::Entry>> {
        self.neighbour(e, 0)
    }

    fn neighbour(&self, e: &F::Entry, dir: usize) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let ep = NonNull::from(e);
        let mask = if dir == 1 {
            SeekMask::ALT_NEXT
        } else {
            SeekMask::ALT_PREV
        };
        let s = unsafe { F::search_entry(ep) };
        let sk = unsafe { seek_key(&self.root, &s, mask) };
        if sk.mismatched || sk.leaf != unsafe { F::node_of(ep) } {
            return None;
        }
        let fork = sk.alt[dir]?;
        let n = unsafe { seek_edge(fork, &F::blind(), dir, 1 - dir) };
        Some(unsafe { F::entry_of(n) })
    }

    pub fn lookup_ge(&self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.bounded(key, 1, true)
    }

    pub fn lookup_gt(&self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.bounded(key, 1, false)
    }

    pub fn lookup_le(&self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.bounded(key, 0, true)
    }

    pub fn lookup_lt(&self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.bounded(key, 0, false)
    }

    /// Nearest record on the `dir` side of `key` (1 = at-or-above,
    /// 0 = at-or-below); `inclusive` admits an exact match.
    fn bounded(&self, key: &F::Key, dir: usize, inclusive: bool) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let mask = if dir == 1 {
            SeekMask::ALT_NEXT
        } else {
            SeekMask::ALT_PREV
        };
        let s = F::search(key);
        let sk = unsafe { seek_key(&self.root, &s, mask) };

        if !sk.mismatched && unsafe { s.hits(sk.leaf) } {
            if inclusive {
                return Some(unsafe { F::entry_of(sk.leaf) });
            }
            let fork = sk.alt[dir]?;
            let n = unsafe { seek_edge(fork, &F::blind(), dir, 1 - dir) };
            return Some(unsafe { F::entry_of(n) });
        }

        // key absent: everything under the terminating slot sits on one
        // side of it, decided by any key of that subtree
        let below = unsafe { s.goes_right(sk.leaf) };
        if below == (dir == 1) {
            // the locus subtree is on the wrong side; cross the last
            // fork that went the other way
            let fork = sk.alt[dir]?;
            let n = unsafe { seek_edge(fork, &F::blind(), dir, 1 - dir) };
            Some(unsafe { F::entry_of(n) })
        } else if sk.mismatched {
            let n = unsafe { seek_edge(sk.slot, &F::blind(), 1 - dir, 1 - dir) };
            Some(unsafe { F::entry_of(n) })
        } else {
            Some(unsafe { F::entry_of(sk.leaf) })
        }
    }

    /// Remove an entry from the tree. Returns the entry when it was
    /// resident, `None` when it was detached or resides elsewhere;
    /// removal of a detached entry mutates nothing.
    pub fn delete<'a>(&mut self, e: &'a F::Entry) -> Option<&'a F::Entry> {
        let ep = NonNull::from(e);
        let node = unsafe { F::node_of(ep) };
        if !unsafe { node.as_ref() }.in_tree() {
            return None;
        }
        self.root.get()?;
        let s = unsafe { F::search_entry(ep) };
        let sk = unsafe { seek_key(&self.root, &s, SeekMask::NODE) };
        if sk.mismatched || sk.leaf != node {
            return None;
        }
        unsafe { self.unlink(&sk) };
        Some(e)
    }

    /// Locate by key and remove in one descent; the caller gains
    /// custody of the returned entry.
    pub fn pick(&mut self, key: &F::Key) -> Option<NonNull<F::Entry>> {
        self.root.get()?;
        let s = F::search(key);
        let sk = unsafe { seek_key(&self.root, &s, SeekMask::NODE) };
        if sk.mismatched || !unsafe { s.hits(sk.leaf) } {
            return None;
        }
        unsafe { self.unlink(&sk) };
        Some(unsafe { F::entry_of(sk.leaf) })
    }

    /// Unsplice the leaf located by `sk` and re-home its node role.
    ///
    /// # Safety
    /// `sk` must come from a `SeekMask::NODE` descent over this tree
    /// that terminated on the leaf to remove, without a mismatch.
    unsafe fn unlink(&self, sk: &Seek<'_>) {
        let ret = sk.leaf;
        match sk.lparent {
            // the leaf occupies the root slot: the tree had one entry
            None => sk.slot.set(None),
            Some(lp) => {
                let lpr = unsafe { &*lp.as_ptr() };
                let sib = lpr.branch(1 - sk.lpside).get();
                // the sibling takes the leaf parent's node position
                sk.parent_slot.unwrap().set(sib);
                if lp != ret {
                    let rr = unsafe { &*ret.as_ptr() };
                    if rr.branch(0).get() == rr.branch(1).get() {
                        // removed record never played a node role; its
                        // parent stops playing one as well
                        lpr.set_self();
                    } else {
                        // the leaf parent, now spare, takes over the
                        // removed record's node role
                        lpr.branch(0).set(rr.branch(0).get());
                        lpr.branch(1).set(rr.branch(1).get());
                        sk.node_slot.unwrap().set(Some(lp));
                    }
                }
            }
        }
        unsafe { ret.as_ref() }.detach();
    }

    #[cfg(feature = "graphviz")]
    pub(crate) fn root_link(&self) -> Link {
        self.root.get()
    }

    /// Re-walk the whole topology checking the structural rules: every
    /// split strictly finer than its parent's, every record's leaf
    /// position reached exactly once. Returns the number of resident
    /// entries.
    #[cfg(any(test, feature = "audit"))]
    pub fn audit(&self) -> usize {
        match self.root.get() {
            None => 0,
            Some(top) => {
                let d = F::blind();
                unsafe { audit_from(top, d.top(), &d) }
            }
        }
    }
}

impl<F: Flavor> Default for Tree<F> {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(any(test, feature = "audit"))]
unsafe fn audit_from<D: Discipline>(p: NonNull<Node>, prev: D::Split, d: &D) -> usize {
    let pr = unsafe { &*p.as_ptr() };
    let l = pr.branch(0).get();
    let r = pr.branch(1).get();
    if l == r {
        return 1;
    }
    let (l, r) = (l.unwrap(), r.unwrap());
    let split = unsafe { d.split(l, r) };
    if d.reentered(split, prev) {
        return 1;
    }
    let mut n = 0;
    for c in [l, r] {
        if c == p {
            n += 1;
        } else {
            n += unsafe { audit_from(c, split, d) };
        }
    }
    n
}
