//! Carries expanded directories across a rebuild.
//!
//! Before a rebuild, the widget's expanded paths are written onto the
//! directory nodes themselves. Directory nodes survive rebuilds (see
//! [`NodeRegistry`]), so afterwards the flags can be read back and turned
//! into expand calls on the new tree.

use crate::{
    tree::{DisplayTree, NodeRegistry},
    widget::TreeWidget,
};

/// Records which directories `widget` currently shows expanded.
///
/// Every reachable directory is cleared first. Expanded paths that don't end
/// at a registered directory (leaves, stale rows) are skipped.
pub fn snapshot(tree: &mut DisplayTree, registry: &NodeRegistry, widget: &dyn TreeWidget) {
    let reachable: Vec<_> = tree
        .descendants(tree.root_id())
        .filter(|node| node.is_directory())
        .map(|node| node.id())
        .collect();

    for id in reachable {
        if let Some(node) = tree.get_mut(id) {
            node.set_expanded(false);
        }
    }

    for path in widget.expanded_paths() {
        let Some(canonical_path) = path
            .last()
            .and_then(|id| tree.get(id))
            .and_then(|node| node.canonical_path())
        else {
            continue;
        };

        if let Some(node) = registry.get(canonical_path).and_then(|id| tree.get_mut(id)) {
            node.set_expanded(true);
        }
    }
}

/// Expands every shown directory whose flag was set by [`snapshot`].
///
/// Flags on directories that did not make it into the new tree are thrown
/// away, so such a directory comes back collapsed if it ever reappears.
pub fn restore(tree: &mut DisplayTree, registry: &NodeRegistry, widget: &mut dyn TreeWidget) {
    let to_expand: Vec<_> = tree
        .descendants(tree.root_id())
        .filter(|node| node.is_directory() && node.is_expanded())
        .map(|node| node.id())
        .collect();

    for id in to_expand {
        if let Some(path) = tree.node_path(id) {
            widget.expand(&path);
        }
    }

    for (_, id) in registry.iter() {
        if let Some(node) = tree.get_mut(id) {
            if !node.is_connected() {
                node.set_expanded(false);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        document::{DocumentHandle, DocumentId},
        options::Grouping,
        path_key::PathKey,
        tree::TreeBuilder,
        widget::HeadlessWidget,
    };

    fn documents(paths: &[&str]) -> Vec<DocumentHandle> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| DocumentHandle::new(DocumentId::new(index as u64 + 1), *path))
            .collect()
    }

    struct Fixture {
        builder: TreeBuilder,
        tree: DisplayTree,
        registry: NodeRegistry,
        widget: HeadlessWidget,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                builder: TreeBuilder::new(PathKey::default(), Grouping::Hierarchical),
                tree: DisplayTree::new(),
                registry: NodeRegistry::new(),
                widget: HeadlessWidget::new(),
            }
        }

        fn rebuild(&mut self, paths: &[&str]) {
            snapshot(&mut self.tree, &self.registry, &self.widget);
            self.builder
                .build(&mut self.tree, &mut self.registry, &documents(paths));
            self.widget.tree_replaced(&self.tree);
            restore(&mut self.tree, &self.registry, &mut self.widget);
        }

        fn expand(&mut self, canonical_path: &str) {
            let id = self.registry.get(canonical_path).unwrap();
            let path = self.tree.node_path(id).unwrap();
            self.widget.expand(&path);
        }

        fn is_expanded(&self, canonical_path: &str) -> bool {
            self.widget
                .is_expanded(self.registry.get(canonical_path).unwrap())
        }
    }

    #[test]
    fn expansion_survives_unrelated_change() {
        let mut fixture = Fixture::new();
        fixture.rebuild(&["/a/x.txt", "/a/b/c/y.txt"]);
        fixture.expand("/a/b/c");

        fixture.rebuild(&["/a/x.txt", "/a/b/c/y.txt", "/q/z.txt"]);

        assert!(fixture.is_expanded("/a/b/c"));
        assert!(!fixture.is_expanded("/a"));
    }

    #[test]
    fn elided_directory_is_dropped_quietly() {
        let mut fixture = Fixture::new();
        fixture.rebuild(&["/a/x.txt", "/a/b/c/y.txt"]);
        fixture.expand("/a");

        // With x.txt gone, /a only leads to /a/b/c and is elided.
        fixture.rebuild(&["/a/b/c/y.txt"]);
        assert!(!fixture.is_expanded("/a"));
        assert!(!fixture.is_expanded("/a/b/c"));

        // /a is back, but it was not expanded in the meantime.
        fixture.rebuild(&["/a/x.txt", "/a/b/c/y.txt"]);
        assert!(!fixture.is_expanded("/a"));
        assert!(fixture.widget.expanded_paths().is_empty());
    }

    #[test]
    fn stale_widget_paths_are_ignored() {
        let mut fixture = Fixture::new();
        fixture.rebuild(&["/a/x.txt", "/a/y.txt"]);

        let leaf = fixture.tree.find_leaf(DocumentId::new(1)).unwrap();
        let leaf_path = fixture.tree.node_path(leaf).unwrap();
        fixture.widget.expand(&leaf_path);

        fixture.rebuild(&["/a/x.txt", "/a/y.txt"]);

        assert!(fixture.widget.expanded_paths().is_empty());
    }
}
