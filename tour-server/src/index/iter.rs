//! In-order traversal of the ordered index.

use crate::domain::Entity;

use super::tree::{NodeId, OrderedIndex};

/// Lazy in-order iterator over an [`OrderedIndex`].
///
/// Keeps an explicit stack of `(node, next entry position)` frames, one per
/// level of the current descent, so memory is bounded by the tree height.
pub struct Iter<'a> {
    index: &'a OrderedIndex,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iter<'a> {
    pub(super) fn new(index: &'a OrderedIndex) -> Self {
        let mut iter = Self {
            index,
            stack: Vec::with_capacity(index.height()),
        };
        iter.descend_leftmost(index.root());
        iter
    }

    fn descend_leftmost(&mut self, mut node: NodeId) {
        loop {
            self.stack.push((node, 0));
            match self.index.node(node).children().first() {
                Some(&child) => node = child,
                None => return,
            }
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        loop {
            let (id, pos) = *self.stack.last()?;
            let node = index.node(id);

            if pos < node.entries().len() {
                if let Some(frame) = self.stack.last_mut() {
                    frame.1 += 1;
                }
                if !node.is_leaf() {
                    self.descend_leftmost(node.children()[pos + 1]);
                }
                return Some(&node.entries()[pos]);
            }

            self.stack.pop();
        }
    }
}
