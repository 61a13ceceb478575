//! Decides how a document change reaches the tree.
//!
//! Most changes are handled by a full rebuild, which is deferred to the next
//! idle point so that a burst of notifications costs one build. Changes that
//! can't move anything are applied to the existing tree right away.

use std::collections::VecDeque;

use crate::{
    document::{DocumentEvent, DocumentEventKind},
    tree::{DisplayTree, InsertOutcome, NodeId, NodeRegistry, RemoveOutcome, TreeBuilder},
    widget::TreeWidget,
};

/// Work queued for the next idle point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTask {
    Rebuild,
}

/// What [`RebuildScheduler::apply_incremental`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A leaf's document was refreshed in place.
    Updated(NodeId),
    Inserted(NodeId),
    Removed(NodeId),

    /// The event had nothing to change.
    Ignored,

    /// The event was left to a full rebuild.
    Deferred,
}

#[derive(Debug, Default)]
pub struct RebuildScheduler {
    /// Set while a `Rebuild` task sits in `queue`.
    pending: bool,
    queue: VecDeque<IdleTask>,
    rebuilds: u64,
    structural_updates: bool,
}

impl RebuildScheduler {
    pub fn new(structural_updates: bool) -> Self {
        Self {
            structural_updates,
            ..Self::default()
        }
    }

    pub fn set_structural_updates(&mut self, structural_updates: bool) {
        self.structural_updates = structural_updates;
    }

    /// Queues a rebuild unless one is already waiting. Returns whether a new
    /// task was queued.
    pub fn request_rebuild(&mut self) -> bool {
        if self.pending {
            log::trace!("Rebuild already pending, coalescing request");
            return false;
        }

        self.pending = true;
        self.queue.push_back(IdleTask::Rebuild);
        log::trace!("Queued rebuild");
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn next_task(&mut self) -> Option<IdleTask> {
        self.queue.pop_front()
    }

    /// Called once the queued rebuild has run. Requests made after this
    /// queue a new rebuild.
    pub fn finish_rebuild(&mut self) {
        self.pending = false;
        self.rebuilds += 1;
    }

    /// Number of rebuilds finished so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Routes one document event: a point edit when the tree can take it,
    /// otherwise a rebuild request.
    pub fn apply_incremental(
        &mut self,
        event: &DocumentEvent,
        builder: &TreeBuilder,
        tree: &mut DisplayTree,
        registry: &NodeRegistry,
        widget: &mut dyn TreeWidget,
    ) -> Applied {
        let document = &event.document;

        match event.kind {
            DocumentEventKind::DirtyChanged => {
                let Some(id) = tree.update_leaf(document) else {
                    log::debug!(
                        "No leaf to refresh for {} ({}), rebuilding",
                        document.path(),
                        document.id()
                    );
                    return self.defer();
                };

                if let Some(path) = tree.node_path(id) {
                    widget.node_changed(tree, &path);
                }
                Applied::Updated(id)
            }

            DocumentEventKind::Created if self.structural_updates && !self.pending => {
                match builder.insert_leaf(tree, registry, document) {
                    InsertOutcome::Inserted(id) => {
                        if let Some(path) = tree.node_path(id) {
                            widget.node_inserted(tree, &path);
                        }
                        Applied::Inserted(id)
                    }
                    InsertOutcome::NeedsRebuild => self.defer(),
                }
            }

            DocumentEventKind::Closed if self.structural_updates && !self.pending => {
                match builder.remove_leaf(tree, document.id()) {
                    RemoveOutcome::Removed {
                        parent,
                        index,
                        node,
                    } => {
                        widget.node_removed(&parent, index, node);
                        Applied::Removed(node)
                    }
                    RemoveOutcome::NotFound => Applied::Ignored,
                    RemoveOutcome::NeedsRebuild => self.defer(),
                }
            }

            DocumentEventKind::Created
            | DocumentEventKind::Closed
            | DocumentEventKind::Saved
            | DocumentEventKind::ModeChanged => self.defer(),
        }
    }

    fn defer(&mut self) -> Applied {
        self.request_rebuild();
        Applied::Deferred
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        document::{DocumentHandle, DocumentId},
        options::Grouping,
        path_key::PathKey,
        widget::{HeadlessWidget, WidgetEvent},
    };

    struct Fixture {
        scheduler: RebuildScheduler,
        builder: TreeBuilder,
        tree: DisplayTree,
        registry: NodeRegistry,
        widget: HeadlessWidget,
        documents: Vec<DocumentHandle>,
    }

    impl Fixture {
        fn new(structural_updates: bool, paths: &[&str]) -> Self {
            let documents: Vec<_> = paths
                .iter()
                .enumerate()
                .map(|(index, path)| {
                    DocumentHandle::new(DocumentId::new(index as u64 + 1), *path)
                })
                .collect();

            let builder = TreeBuilder::new(PathKey::default(), Grouping::Hierarchical);
            let mut tree = DisplayTree::new();
            let mut registry = NodeRegistry::new();
            builder.build(&mut tree, &mut registry, &documents);

            Self {
                scheduler: RebuildScheduler::new(structural_updates),
                builder,
                tree,
                registry,
                widget: HeadlessWidget::new(),
                documents,
            }
        }

        fn apply(&mut self, kind: DocumentEventKind, document: DocumentHandle) -> Applied {
            self.scheduler.apply_incremental(
                &DocumentEvent::new(kind, document),
                &self.builder,
                &mut self.tree,
                &self.registry,
                &mut self.widget,
            )
        }
    }

    #[test]
    fn requests_coalesce_until_finished() {
        let mut scheduler = RebuildScheduler::default();

        let queued: Vec<bool> = (0..5).map(|_| scheduler.request_rebuild()).collect();
        assert_eq!(queued, vec![true, false, false, false, false]);

        assert_eq!(scheduler.next_task(), Some(IdleTask::Rebuild));
        assert_eq!(scheduler.next_task(), None);
        assert!(scheduler.is_pending());

        scheduler.finish_rebuild();
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.rebuild_count(), 1);

        assert!(scheduler.request_rebuild());
    }

    #[test]
    fn dirty_change_is_a_point_update() {
        let mut fixture = Fixture::new(false, &["/a/x.txt", "/a/y.txt"]);
        let before = fixture.tree.find_leaf(DocumentId::new(1)).unwrap();

        let dirty = fixture.documents[0].clone().dirty(true);
        let applied = fixture.apply(DocumentEventKind::DirtyChanged, dirty);

        assert_eq!(applied, Applied::Updated(before));
        assert_eq!(fixture.widget.events(), &[WidgetEvent::Changed(before)]);
        assert!(fixture.tree.document(before).unwrap().is_dirty());
        assert!(!fixture.scheduler.is_pending());
    }

    #[test]
    fn dirty_change_for_unknown_leaf_rebuilds() {
        let mut fixture = Fixture::new(false, &["/a/x.txt"]);

        let stranger = DocumentHandle::new(DocumentId::new(9), "/b/z.txt").dirty(true);
        let applied = fixture.apply(DocumentEventKind::DirtyChanged, stranger);

        assert_eq!(applied, Applied::Deferred);
        assert!(fixture.scheduler.is_pending());
    }

    #[test]
    fn structural_events_rebuild_by_default() {
        let mut fixture = Fixture::new(false, &["/a/x.txt", "/a/y.txt"]);

        let new = DocumentHandle::new(DocumentId::new(3), "/a/z.txt");
        assert_eq!(
            fixture.apply(DocumentEventKind::Created, new),
            Applied::Deferred
        );

        let saved = fixture.documents[0].clone();
        assert_eq!(
            fixture.apply(DocumentEventKind::Saved, saved),
            Applied::Deferred
        );

        assert_eq!(fixture.scheduler.next_task(), Some(IdleTask::Rebuild));
        assert_eq!(fixture.scheduler.next_task(), None);
        assert!(fixture.widget.events().is_empty());
    }

    #[test]
    fn structural_updates_insert_and_remove_in_place() {
        let mut fixture = Fixture::new(true, &["/a/x.txt", "/a/y.txt"]);

        let new = DocumentHandle::new(DocumentId::new(3), "/a/z.txt");
        let Applied::Inserted(inserted) = fixture.apply(DocumentEventKind::Created, new) else {
            panic!("expected an in-place insert");
        };

        let closed = fixture.documents[0].clone();
        let Applied::Removed(removed) = fixture.apply(DocumentEventKind::Closed, closed) else {
            panic!("expected an in-place removal");
        };

        assert_eq!(
            fixture.widget.events(),
            &[WidgetEvent::Inserted(inserted), WidgetEvent::Removed(removed)]
        );
        assert!(!fixture.scheduler.is_pending());
    }

    #[test]
    fn structural_updates_wait_behind_pending_rebuild() {
        let mut fixture = Fixture::new(true, &["/a/x.txt", "/a/y.txt"]);
        fixture.scheduler.request_rebuild();

        let new = DocumentHandle::new(DocumentId::new(3), "/a/z.txt");
        assert_eq!(
            fixture.apply(DocumentEventKind::Created, new),
            Applied::Deferred
        );
        assert!(fixture.widget.events().is_empty());
        assert_eq!(fixture.tree.find_leaf(DocumentId::new(3)), None);
    }
}
