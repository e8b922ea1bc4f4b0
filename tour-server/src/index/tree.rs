//! Arena-backed B-tree keyed by place id.
//!
//! Nodes live in a `Vec` and refer to their children by [`NodeId`], so the
//! tree has a single owner and no reference cycles. Nodes are never freed:
//! the index only grows, and a split always allocates exactly one sibling.

use tracing::{debug, trace, warn};

use crate::domain::{Comment, Entity, EntityId};

use super::error::IndexError;
use super::iter::Iter;

/// Position of a node in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A node of the B-tree.
///
/// Entries are sorted by id. An internal node has exactly one more child
/// than it has entries; a leaf has none.
#[derive(Debug, Clone, Default)]
pub struct Node {
    entries: Vec<Entity>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn entries(&self) -> &[Entity] {
        &self.entries
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the first entry whose id is not less than `id`.
    fn lower_bound(&self, id: EntityId) -> usize {
        self.entries.partition_point(|e| e.id() < id)
    }
}

/// Where a search found an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub node: NodeId,
    pub position: usize,
}

/// Shape summary of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub len: usize,
    pub height: usize,
    pub nodes: usize,
    pub min_degree: usize,
}

/// In-memory B-tree of places, ordered by [`EntityId`].
///
/// With minimum degree `t`, every node holds at most `2t - 1` entries and
/// every node but the root holds at least `t - 1`. All leaves sit at the
/// same depth.
///
/// # Examples
///
/// ```
/// use tour_server::domain::{Entity, EntityId};
/// use tour_server::index::OrderedIndex;
///
/// let mut index = OrderedIndex::new(3).unwrap();
/// index.insert(Entity::lodging(10, "Hotel Sol", 14.1, -90.5, 100.0, 4.5).unwrap()).unwrap();
/// index.insert(Entity::lodging(5, "Eco Lodge", 14.0, -90.6, 80.0, 4.2).unwrap()).unwrap();
///
/// let ids: Vec<u64> = index.iter().map(|e| e.id().0).collect();
/// assert_eq!(ids, vec![5, 10]);
/// assert!(index.search(EntityId(99)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct OrderedIndex {
    min_degree: usize,
    nodes: Vec<Node>,
    root: NodeId,
    len: usize,
}

impl OrderedIndex {
    /// Create an empty index with minimum degree `min_degree` (at least 2).
    pub fn new(min_degree: usize) -> Result<Self, IndexError> {
        if min_degree < 2 {
            return Err(IndexError::InvalidMinDegree(min_degree));
        }
        Ok(Self {
            min_degree,
            nodes: vec![Node::default()],
            root: NodeId(0),
            len: 0,
        })
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Maximum number of entries a node may hold.
    pub fn max_entries(&self) -> usize {
        2 * self.min_degree - 1
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node by id.
    ///
    /// Panics if `id` did not come from this index.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of levels; an empty index has height 1 (its empty root leaf).
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.node(self.root);
        while let Some(&first) = current.children.first() {
            height += 1;
            current = self.node(first);
        }
        height
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            len: self.len,
            height: self.height(),
            nodes: self.nodes.len(),
            min_degree: self.min_degree,
        }
    }

    /// Find the node and in-node position holding `id`.
    pub fn search(&self, id: EntityId) -> Option<Location> {
        let mut current = self.root;
        loop {
            let node = self.node(current);
            let pos = node.lower_bound(id);

            if node.entries.get(pos).is_some_and(|e| e.id() == id) {
                return Some(Location {
                    node: current,
                    position: pos,
                });
            }

            if node.is_leaf() {
                return None;
            }
            current = node.children[pos];
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.search(id).map(|loc| &self.node(loc.node).entries[loc.position])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.search(id).is_some()
    }

    /// Insert an entity.
    ///
    /// If the id is already present the index is left untouched and
    /// [`IndexError::DuplicateKey`] is returned; callers may log and carry on.
    pub fn insert(&mut self, entity: Entity) -> Result<(), IndexError> {
        let id = entity.id();
        if self.contains(id) {
            warn!(%id, "place already registered, insert ignored");
            return Err(IndexError::DuplicateKey(id));
        }

        if self.node(self.root).entries.len() == self.max_entries() {
            let old_root = self.root;
            let new_root = self.alloc(Node {
                entries: Vec::new(),
                children: vec![old_root],
            });
            self.split_child(new_root, 0);
            self.root = new_root;
            debug!(height = self.height(), "index grew a new root");
        }

        self.insert_non_full(self.root, entity);
        self.len += 1;
        trace!(%id, len = self.len, "inserted place");
        Ok(())
    }

    /// Append a comment to an indexed place. Returns false if `id` is absent.
    pub fn annotate(&mut self, id: EntityId, comment: Comment) -> bool {
        match self.search(id) {
            Some(loc) => {
                self.nodes[loc.node.0].entries[loc.position].add_comment(comment);
                true
            }
            None => false,
        }
    }

    /// Lazy in-order traversal. Each call walks the tree afresh.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Descend from a non-full node, splitting full children before
    /// entering them so the target leaf always has room.
    fn insert_non_full(&mut self, start: NodeId, entity: Entity) {
        let id = entity.id();
        let mut current = start;
        loop {
            let node = &self.nodes[current.0];
            let mut pos = node.lower_bound(id);

            if node.is_leaf() {
                self.nodes[current.0].entries.insert(pos, entity);
                return;
            }

            let child = node.children[pos];
            if self.nodes[child.0].entries.len() == self.max_entries() {
                self.split_child(current, pos);
                if id > self.nodes[current.0].entries[pos].id() {
                    pos += 1;
                }
            }
            current = self.nodes[current.0].children[pos];
        }
    }

    /// Split the full child at `index` of `parent`.
    ///
    /// The median entry moves up into `parent`; the upper `t - 1` entries
    /// (and upper `t` children) move to a new sibling placed right after
    /// the split child.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let t = self.min_degree;
        let full = self.nodes[parent.0].children[index];

        let (median, sibling) = {
            let node = &mut self.nodes[full.0];
            let upper_entries = node.entries.split_off(t);
            let median = node.entries.remove(t - 1);
            let upper_children = if node.is_leaf() {
                Vec::new()
            } else {
                node.children.split_off(t)
            };
            (
                median,
                Node {
                    entries: upper_entries,
                    children: upper_children,
                },
            )
        };

        let sibling = self.alloc(sibling);
        let parent = &mut self.nodes[parent.0];
        parent.children.insert(index + 1, sibling);
        parent.entries.insert(index, median);
    }
}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = &'a Entity;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
