use std::cmp::Ordering;

use crate::{
    document::DocumentHandle,
    options::{Grouping, PanelOptions},
    path_key::{parent_of, PathKey},
};

use super::{compact, strip_common_prefixes, DisplayTree, NodeId, NodeKind, NodeRegistry};

/// Turns the current set of open documents into a display tree.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    key: PathKey,
    grouping: Grouping,
}

impl TreeBuilder {
    pub fn new(key: PathKey, grouping: Grouping) -> Self {
        Self { key, grouping }
    }

    pub fn from_options(options: &PanelOptions) -> Self {
        Self::new(options.path_key(), options.grouping)
    }

    pub fn key(&self) -> &PathKey {
        &self.key
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// Rebuilds `tree` from `documents` and returns the root.
    ///
    /// Directory nodes come from `registry` and keep their ids; every leaf of
    /// the previous build is dropped and recreated.
    pub fn build(
        &self,
        tree: &mut DisplayTree,
        registry: &mut NodeRegistry,
        documents: &[DocumentHandle],
    ) -> NodeId {
        let mut sorted: Vec<&DocumentHandle> = documents.iter().collect();
        sorted.sort_by(|a, b| self.compare_documents(a, b));

        registry.reset_all(tree);
        tree.clear_leaves();
        let root = tree.root_id();
        tree.take_children(root);

        for document in sorted {
            let parent = match document.directory() {
                Some(directory) => self.attach_directory_chain(tree, registry, directory),
                None => {
                    log::debug!(
                        "Document {} has no directory, placing it under the root",
                        document.path()
                    );
                    root
                }
            };

            let leaf = tree.insert_node(NodeKind::Leaf(document.clone()));
            tree.link(parent, leaf);
        }

        compact(tree, root);
        strip_common_prefixes(tree, &self.key, root, "");
        self.sort_children(tree, root);

        log::debug!(
            "Built tree from {} documents using {} registered directories",
            documents.len(),
            registry.len()
        );

        root
    }

    /// Gets the directory node for `path` and makes sure it is linked into
    /// the tree, attaching its ancestors first when grouping hierarchically.
    /// Linking a node that is already connected does nothing.
    fn attach_directory_chain(
        &self,
        tree: &mut DisplayTree,
        registry: &mut NodeRegistry,
        path: &str,
    ) -> NodeId {
        let id = registry.get_or_create(tree, path);
        if tree[id].is_connected() {
            return id;
        }

        let parent = match self.grouping {
            Grouping::Flat => tree.root_id(),
            Grouping::Hierarchical => match parent_of(path) {
                Some(parent_path) => self.attach_directory_chain(tree, registry, &parent_path),
                None => tree.root_id(),
            },
        };

        tree.link(parent, id);
        id
    }

    fn compare_documents(&self, a: &DocumentHandle, b: &DocumentHandle) -> Ordering {
        let directories = match (a.directory(), b.directory()) {
            (Some(a), Some(b)) => self.key.compare(a, b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        directories
            .then_with(|| self.key.compare(a.name(), b.name()))
            .then_with(|| a.id().cmp(&b.id()))
    }

    /// Sibling order: directories by canonical path, then documents by name,
    /// full path and identity.
    pub(crate) fn compare_nodes(&self, tree: &DisplayTree, a: NodeId, b: NodeId) -> Ordering {
        match (tree[a].kind(), tree[b].kind()) {
            (
                NodeKind::Directory {
                    canonical_path: a, ..
                },
                NodeKind::Directory {
                    canonical_path: b, ..
                },
            ) => self.key.compare(a, b),
            (NodeKind::Directory { .. }, _) => Ordering::Less,
            (_, NodeKind::Directory { .. }) => Ordering::Greater,
            (NodeKind::Leaf(a), NodeKind::Leaf(b)) => self
                .key
                .compare(a.name(), b.name())
                .then_with(|| self.key.compare(a.path(), b.path()))
                .then_with(|| a.id().cmp(&b.id())),
            _ => Ordering::Equal,
        }
    }

    fn sort_children(&self, tree: &mut DisplayTree, id: NodeId) {
        let mut children = tree.take_children(id);
        children.sort_by(|&a, &b| self.compare_nodes(tree, a, b));

        for &child in &children {
            self.sort_children(tree, child);
        }

        tree.set_children(id, children);
    }
}
