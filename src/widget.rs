//! The interface to whatever draws the tree.

use crate::tree::{DisplayTree, NodeId, NodePath};

/// A tree view that shows a [`DisplayTree`].
///
/// The panel calls these on the UI thread. Paths handed to the widget are
/// valid for the tree passed to the most recent `tree_replaced`.
pub trait TreeWidget {
    /// The whole tree changed. Widgets treat this like a new model: nothing
    /// is expanded or selected until the panel says so.
    fn tree_replaced(&mut self, tree: &DisplayTree);

    fn expanded_paths(&self) -> Vec<NodePath>;

    fn expand(&mut self, path: &NodePath);

    fn collapse(&mut self, path: &NodePath);

    fn selected_path(&self) -> Option<NodePath>;

    fn select(&mut self, path: &NodePath);

    /// A row's content changed but its position did not.
    fn node_changed(&mut self, tree: &DisplayTree, path: &NodePath);

    fn node_inserted(&mut self, tree: &DisplayTree, path: &NodePath);

    fn node_removed(&mut self, parent: &NodePath, index: usize, node: NodeId);
}

/// What a [`HeadlessWidget`] was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Replaced,
    Changed(NodeId),
    Inserted(NodeId),
    Removed(NodeId),
}

/// A widget with no screen. It keeps the same expansion and selection state
/// a real tree view would, and records every update it receives.
///
/// Like most tree views, selecting a row expands its ancestors so that the
/// selection is visible.
#[derive(Debug, Default)]
pub struct HeadlessWidget {
    expanded: Vec<NodePath>,
    selected: Option<NodePath>,
    events: Vec<WidgetEvent>,
}

impl HeadlessWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.iter().any(|path| path.last() == Some(id))
    }

    /// A node is visible when every ancestor below the root is expanded.
    pub fn is_visible(&self, tree: &DisplayTree, id: NodeId) -> bool {
        let Some(path) = tree.node_path(id) else {
            return false;
        };

        let ids = path.ids();
        ids.iter()
            .take(ids.len().saturating_sub(1))
            .skip(1)
            .all(|&ancestor| self.is_expanded(ancestor))
    }

    pub fn events(&self) -> &[WidgetEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }
}

impl TreeWidget for HeadlessWidget {
    fn tree_replaced(&mut self, _tree: &DisplayTree) {
        self.expanded.clear();
        self.selected = None;
        self.events.push(WidgetEvent::Replaced);
    }

    fn expanded_paths(&self) -> Vec<NodePath> {
        self.expanded.clone()
    }

    fn expand(&mut self, path: &NodePath) {
        if !self.expanded.contains(path) {
            self.expanded.push(path.clone());
        }
    }

    fn collapse(&mut self, path: &NodePath) {
        self.expanded.retain(|expanded| !expanded.starts_with(path));
    }

    fn selected_path(&self) -> Option<NodePath> {
        self.selected.clone()
    }

    fn select(&mut self, path: &NodePath) {
        let ids = path.ids();
        for end in 2..ids.len() {
            self.expand(&NodePath::new(ids[..end].to_vec()));
        }

        self.selected = Some(path.clone());
    }

    fn node_changed(&mut self, _tree: &DisplayTree, path: &NodePath) {
        if let Some(id) = path.last() {
            self.events.push(WidgetEvent::Changed(id));
        }
    }

    fn node_inserted(&mut self, _tree: &DisplayTree, path: &NodePath) {
        if let Some(id) = path.last() {
            self.events.push(WidgetEvent::Inserted(id));
        }
    }

    fn node_removed(&mut self, _parent: &NodePath, _index: usize, node: NodeId) {
        if self.selected.as_ref().and_then(NodePath::last) == Some(node) {
            self.selected = None;
        }
        self.expanded.retain(|path| !path.ids().contains(&node));
        self.events.push(WidgetEvent::Removed(node));
    }
}
