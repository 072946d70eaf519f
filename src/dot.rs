//! Graphviz rendering of the internal topology, for debugging only.
//!
//! Node-role edges are drawn solid and leaf-role edges dashed, so the
//! dual role of each record is visible: every record appears once as a
//! box and is reached by exactly one dashed edge.

use core::fmt::{self, Write};
use core::ptr::NonNull;

use crate::descent::Discipline;
use crate::node::Node;
use crate::tree::{Flavor, Tree};

pub fn dump<F, W, L>(tree: &Tree<F>, out: &mut W, label: L) -> fmt::Result
where
    F: Flavor,
    W: Write,
    L: Fn(&F::Entry) -> String,
{
    writeln!(out, "digraph cbtree {{")?;
    writeln!(out, "  node [shape=box];")?;
    if let Some(top) = tree.root_link() {
        let d = F::blind();
        writeln!(out, "  root [shape=plaintext];")?;
        if unsafe { is_leaf::<F>(top, d.top(), &d) } {
            unsafe { emit_leaf::<F, W, L>(top, out, &label)? };
            writeln!(out, "  root -> \"n{:x}\" [style=dashed];", top.as_ptr() as usize)?;
        } else {
            writeln!(out, "  root -> \"n{:x}\";", top.as_ptr() as usize)?;
            unsafe { walk::<F, W, L>(top, &d, out, &label)? };
        }
    }
    writeln!(out, "}}")
}

unsafe fn is_leaf<F: Flavor>(
    c: NonNull<Node>,
    prev: <F::Blind as Discipline>::Split,
    d: &F::Blind,
) -> bool {
    let cr = unsafe { &*c.as_ptr() };
    let (l, r) = (cr.branch(0).get(), cr.branch(1).get());
    if l == r {
        return true;
    }
    let split = unsafe { d.split(l.unwrap(), r.unwrap()) };
    d.reentered(split, prev)
}

unsafe fn emit_leaf<F, W, L>(c: NonNull<Node>, out: &mut W, label: &L) -> fmt::Result
where
    F: Flavor,
    W: Write,
    L: Fn(&F::Entry) -> String,
{
    let e = unsafe { F::entry_of(c) };
    writeln!(
        out,
        "  \"n{:x}\" [label=\"{}\"];",
        c.as_ptr() as usize,
        label(unsafe { &*e.as_ptr() })
    )
}

unsafe fn walk<F, W, L>(
    p: NonNull<Node>,
    d: &F::Blind,
    out: &mut W,
    label: &L,
) -> fmt::Result
where
    F: Flavor,
    W: Write,
    L: Fn(&F::Entry) -> String,
{
    let pr = unsafe { &*p.as_ptr() };
    let l = pr.branch(0).get().unwrap();
    let r = pr.branch(1).get().unwrap();
    let split = unsafe { d.split(l, r) };
    for (side, c) in [(0usize, l), (1usize, r)] {
        if c == p || unsafe { is_leaf::<F>(c, split, d) } {
            unsafe { emit_leaf::<F, W, L>(c, out, label)? };
            writeln!(
                out,
                "  \"n{:x}\" -> \"n{:x}\" [style=dashed, label=\"{side}\"];",
                p.as_ptr() as usize,
                c.as_ptr() as usize
            )?;
        } else {
            writeln!(
                out,
                "  \"n{:x}\" -> \"n{:x}\" [label=\"{side}\"];",
                p.as_ptr() as usize,
                c.as_ptr() as usize
            )?;
            unsafe { walk::<F, W, L>(c, d, out, label)? };
        }
    }
    Ok(())
}
