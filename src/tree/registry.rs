use std::collections::HashMap;

use super::{DisplayTree, NodeId, NodeKind};

/// Maps canonical directory paths to their directory nodes.
///
/// A path gets a node the first time any build needs it and keeps that node
/// until the panel goes away, so a `NodeId` seen in one build names the same
/// directory in every later build. Entries are never removed; the registry
/// is bounded by the number of distinct directories seen in a session.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    path_to_id: HashMap<String, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the directory node for `canonical_path`, creating it in `tree`
    /// if this path has never been seen.
    pub fn get_or_create(&mut self, tree: &mut DisplayTree, canonical_path: &str) -> NodeId {
        if let Some(&id) = self.path_to_id.get(canonical_path) {
            return id;
        }

        let id = tree.insert_node(NodeKind::Directory {
            label: canonical_path.to_owned(),
            canonical_path: canonical_path.to_owned(),
        });
        self.path_to_id.insert(canonical_path.to_owned(), id);

        log::trace!("Registered directory node {:?} for {}", id, canonical_path);

        id
    }

    pub fn get(&self, canonical_path: &str) -> Option<NodeId> {
        self.path_to_id.get(canonical_path).copied()
    }

    /// Clears children and `connected` on every registered directory and
    /// restores each label to the full canonical path.
    ///
    /// The `expanded` flag is left alone: it carries the state captured
    /// before the build over to the restore that follows it.
    pub fn reset_all(&self, tree: &mut DisplayTree) {
        for &id in self.path_to_id.values() {
            let Some(node) = tree.get_mut(id) else {
                continue;
            };

            node.children.clear();
            node.parent = None;
            node.connected = false;

            if let NodeKind::Directory {
                label,
                canonical_path,
            } = &mut node.kind
            {
                label.clone_from(canonical_path);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.path_to_id
            .iter()
            .map(|(path, &id)| (path.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_to_id.is_empty()
    }
}
