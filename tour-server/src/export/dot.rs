//! Graphviz DOT rendering of the index structure.
//!
//! Each node becomes a record whose fields are the labels of its entries.
//! Nodes are numbered in preorder starting at `n0` for the root.

use std::fmt::Write;

use crate::index::{NodeId, OrderedIndex};

/// Render the tree shape of `index` as a DOT digraph.
///
/// An empty index renders as a single empty record.
pub fn to_dot(index: &OrderedIndex) -> String {
    let mut out = String::from("digraph OrderedIndex {\n    node [shape=record];\n");
    let mut next = 0;
    write_node(index, index.root(), &mut next, &mut out);
    out.push_str("}\n");
    out
}

/// Emit `id` and its subtree, returning the DOT name given to `id`.
fn write_node(index: &OrderedIndex, id: NodeId, next: &mut usize, out: &mut String) -> usize {
    let name = *next;
    *next += 1;

    let node = index.node(id);
    let fields: Vec<String> = node
        .entries()
        .iter()
        .map(|entity| escape(&entity.label()))
        .collect();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "    n{name} [label=\"{{{}}}\"];", fields.join("|"));

    for &child in node.children() {
        let child_name = write_node(index, child, next, out);
        let _ = writeln!(out, "    n{name} -> n{child_name};");
    }
    name
}

/// Escape text for use inside a quoted record label.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' | '}' | '|' | '<' | '>' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
