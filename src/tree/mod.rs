//! The display tree and everything that builds it.

mod builder;
mod compact;
mod incremental;
mod registry;

use std::{collections::HashMap, ops::Index};

use crate::{
    document::{DocumentHandle, DocumentId},
    options::LeafLabel,
};

pub use builder::TreeBuilder;
pub use compact::{compact, strip_common_prefixes};
pub use incremental::{InsertOutcome, RemoveOutcome};
pub use registry::NodeRegistry;

/// Identifies a node in a [`DisplayTree`].
///
/// Directory ids are stable for the life of a panel. Leaf ids are handed out
/// fresh every time a leaf is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Invisible anchor; exactly one per tree.
    Root,

    Directory {
        /// Text shown for this directory. After prefix stripping this is a
        /// suffix of `canonical_path`.
        label: String,

        /// Identity key; never changes once the node exists.
        canonical_path: String,
    },

    Leaf(DocumentHandle),
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    id: NodeId,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    connected: bool,
    expanded: bool,
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent link, for traversal only.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        match &self.kind {
            NodeKind::Leaf(document) => Some(document),
            _ => None,
        }
    }

    pub fn canonical_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Directory { canonical_path, .. } => Some(canonical_path),
            _ => None,
        }
    }
}

/// Root-to-node chain of ids, the way a tree widget addresses rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<NodeId>);

impl NodePath {
    pub fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    pub fn last(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<NodePath> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(NodePath(rest.to_vec())),
            _ => None,
        }
    }

    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

/// Arena holding the root, every registered directory and the current
/// leaves. Ownership runs root -> directory -> directory or leaf through the
/// `children` lists; `parent` links never own anything.
#[derive(Debug)]
pub struct DisplayTree {
    nodes: HashMap<NodeId, TreeNode>,
    root: NodeId,
    next_id: u64,
    leaf_label: LeafLabel,
}

impl DisplayTree {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            TreeNode {
                id: root,
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                connected: true,
                expanded: true,
            },
        );

        Self {
            nodes,
            root,
            next_id: 1,
            leaf_label: LeafLabel::default(),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn leaf_label(&self) -> LeafLabel {
        self.leaf_label
    }

    /// Text a widget should show for a node.
    pub fn label(&self, id: NodeId) -> &str {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Directory { label, .. }) => label,
            Some(NodeKind::Leaf(document)) => match self.leaf_label {
                LeafLabel::Name => document.name(),
                LeafLabel::FullPath => document.path(),
            },
            Some(NodeKind::Root) | None => "",
        }
    }

    pub fn document(&self, id: NodeId) -> Option<&DocumentHandle> {
        self.nodes.get(&id)?.document()
    }

    /// Nodes reachable from `id`, in display (pre-order) order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.nodes.contains_key(&id) {
            vec![id]
        } else {
            Vec::new()
        };

        Descendants { stack, tree: self }
    }

    /// Leaves in the order a widget lists them.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.descendants(self.root).filter(|node| node.is_leaf())
    }

    pub fn find_leaf(&self, document: DocumentId) -> Option<NodeId> {
        self.leaves()
            .find(|node| node.document().map(DocumentHandle::id) == Some(document))
            .map(TreeNode::id)
    }

    /// Builds the root-to-node path of a node that is reachable from the
    /// root. Returns `None` for detached nodes.
    pub fn node_path(&self, id: NodeId) -> Option<NodePath> {
        let mut ids = vec![id];
        let mut current = self.nodes.get(&id)?;

        while let Some(parent) = current.parent {
            ids.push(parent);
            current = self.nodes.get(&parent)?;
        }

        if current.id != self.root {
            return None;
        }

        ids.reverse();
        Some(NodePath(ids))
    }

    /// Checks that every step of `path` is still a parent/child pair in this
    /// tree and returns the node it ends at.
    pub fn resolve(&self, path: &NodePath) -> Option<NodeId> {
        let (first, rest) = path.0.split_first()?;
        if *first != self.root {
            return None;
        }

        let mut current = *first;
        for &next in rest {
            if !self.children(current).contains(&next) {
                return None;
            }
            current = next;
        }

        Some(current)
    }

    pub(crate) fn set_leaf_label(&mut self, leaf_label: LeafLabel) {
        self.leaf_label = leaf_label;
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn insert_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            TreeNode {
                id,
                kind,
                parent: None,
                children: Vec::new(),
                connected: false,
                expanded: false,
            },
        );

        id
    }

    /// Appends `child` to `parent` and marks it connected.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.connected = true;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    pub(crate) fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get_mut(&id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default()
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = children;
        }
    }

    /// Drops every leaf from the arena. Directories stay where they are.
    pub(crate) fn clear_leaves(&mut self) {
        self.nodes.retain(|_, node| !node.is_leaf());
    }

    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<TreeNode> {
        if id == self.root {
            return None;
        }
        self.nodes.remove(&id)
    }
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for DisplayTree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[&id]
    }
}

pub struct Descendants<'a> {
    stack: Vec<NodeId>,
    tree: &'a DisplayTree,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let Some(node) = self.tree.nodes.get(&id) else {
                continue;
            };

            self.stack.extend(node.children.iter().rev().copied());
            return Some(node);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::DocumentId;

    #[test]
    fn paths_follow_parent_links() {
        let mut tree = DisplayTree::new();
        let root = tree.root_id();
        let dir = tree.insert_node(NodeKind::Directory {
            label: "/a".to_owned(),
            canonical_path: "/a".to_owned(),
        });
        let leaf = tree.insert_node(NodeKind::Leaf(DocumentHandle::new(
            DocumentId::new(1),
            "/a/x.txt",
        )));
        tree.link(root, dir);
        tree.link(dir, leaf);

        let path = tree.node_path(leaf).unwrap();
        assert_eq!(path.ids(), &[root, dir, leaf]);
        assert_eq!(tree.resolve(&path), Some(leaf));
        assert_eq!(path.parent().and_then(|parent| parent.last()), Some(dir));
    }

    #[test]
    fn detached_nodes_have_no_path() {
        let mut tree = DisplayTree::new();
        let dir = tree.insert_node(NodeKind::Directory {
            label: "/a".to_owned(),
            canonical_path: "/a".to_owned(),
        });

        assert_eq!(tree.node_path(dir), None);
        assert_eq!(tree.descendants(tree.root_id()).count(), 1);
    }

    #[test]
    fn stale_paths_do_not_resolve() {
        let mut tree = DisplayTree::new();
        let root = tree.root_id();
        let dir = tree.insert_node(NodeKind::Directory {
            label: "/a".to_owned(),
            canonical_path: "/a".to_owned(),
        });

        let stale = NodePath::new(vec![root, dir]);
        assert_eq!(tree.resolve(&stale), None);

        tree.link(root, dir);
        assert_eq!(tree.resolve(&stale), Some(dir));
    }
}
