//! Point edits that change a single leaf without a full rebuild.
//!
//! Each edit first checks that a full rebuild would produce the same shape.
//! When it can't prove that, it leaves the tree alone and reports that a
//! rebuild is needed. No edit here creates, removes or relabels a directory.

use crate::document::{DocumentHandle, DocumentId};

use super::{DisplayTree, NodeId, NodeKind, NodePath, NodeRegistry, TreeBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(NodeId),
    NeedsRebuild,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed {
        parent: NodePath,
        index: usize,
        node: NodeId,
    },
    NotFound,
    NeedsRebuild,
}

impl TreeBuilder {
    /// Adds a leaf for `document` at its sorted position, provided the
    /// directory it belongs in is already shown.
    pub fn insert_leaf(
        &self,
        tree: &mut DisplayTree,
        registry: &NodeRegistry,
        document: &DocumentHandle,
    ) -> InsertOutcome {
        if tree.find_leaf(document.id()).is_some() {
            return InsertOutcome::NeedsRebuild;
        }

        let parent = match document.directory() {
            None => tree.root_id(),
            Some(directory) => match registry.get(directory) {
                Some(id) if tree[id].is_connected() => id,
                _ => return InsertOutcome::NeedsRebuild,
            },
        };

        let leaf = tree.insert_node(NodeKind::Leaf(document.clone()));
        let index = tree
            .children(parent)
            .partition_point(|&sibling| self.compare_nodes(tree, sibling, leaf).is_lt());
        tree.insert_child(parent, index, leaf);

        log::debug!("Inserted {} as {:?} without a rebuild", document.path(), leaf);

        InsertOutcome::Inserted(leaf)
    }

    /// Removes the leaf for `document` if its directory would still be
    /// shown the same way afterwards.
    pub fn remove_leaf(&self, tree: &mut DisplayTree, document: DocumentId) -> RemoveOutcome {
        let Some(leaf) = tree.find_leaf(document) else {
            return RemoveOutcome::NotFound;
        };
        let Some(parent) = tree[leaf].parent() else {
            return RemoveOutcome::NeedsRebuild;
        };

        let remaining: Vec<NodeId> = tree
            .children(parent)
            .iter()
            .copied()
            .filter(|&child| child != leaf)
            .collect();

        let parent_survives = parent == tree.root_id()
            || match remaining.as_slice() {
                [] => false,
                [only] => tree[*only].is_leaf(),
                _ => true,
            };
        if !parent_survives {
            return RemoveOutcome::NeedsRebuild;
        }

        let Some(parent_path) = tree.node_path(parent) else {
            return RemoveOutcome::NeedsRebuild;
        };
        let index = tree
            .children(parent)
            .iter()
            .position(|&child| child == leaf)
            .unwrap_or(remaining.len());

        tree.set_children(parent, remaining);
        tree.remove_node(leaf);

        log::debug!("Removed leaf {:?} for document {} without a rebuild", leaf, document);

        RemoveOutcome::Removed {
            parent: parent_path,
            index,
            node: leaf,
        }
    }
}

impl DisplayTree {
    /// Swaps in a fresh copy of a document for its existing leaf. Returns
    /// `None` if the document has no leaf or if its path changed, since a new
    /// path can mean a new place in the tree.
    pub fn update_leaf(&mut self, document: &DocumentHandle) -> Option<NodeId> {
        let id = self.find_leaf(document.id())?;
        let node = self.get_mut(id)?;

        match &mut node.kind {
            NodeKind::Leaf(existing) if existing.path() == document.path() => {
                *existing = document.clone();
                Some(id)
            }
            _ => None,
        }
    }

    pub(crate) fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.connected = true;
        }
        if let Some(node) = self.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
    }
}
