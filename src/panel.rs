//! The buffer list panel: glue between a document source, the display tree
//! and a tree widget.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::{
    document::{DocumentEvent, DocumentEventKind, DocumentHandle, DocumentId, DocumentSource},
    expansion,
    options::PanelOptions,
    scheduler::{Applied, IdleTask, RebuildScheduler},
    tree::{DisplayTree, NodeId, NodePath, NodeRegistry, TreeBuilder},
    widget::TreeWidget,
};

/// What the widget had selected before a rebuild, in terms that survive one.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Document(DocumentId),
    Directory(String),
}

/// Owns one display tree and keeps it in step with a [`DocumentSource`].
///
/// Everything here runs on the thread that owns the panel. Document events
/// are queued by the source and only looked at in [`process_events`]; full
/// rebuilds wait for [`run_idle_tasks`].
///
/// [`process_events`]: BufferListPanel::process_events
/// [`run_idle_tasks`]: BufferListPanel::run_idle_tasks
pub struct BufferListPanel<S, W> {
    options: PanelOptions,
    builder: TreeBuilder,
    registry: NodeRegistry,
    tree: DisplayTree,
    scheduler: RebuildScheduler,
    source: Arc<S>,
    events: Receiver<DocumentEvent>,
    widget: W,
    current: Option<DocumentId>,
}

impl<S: DocumentSource, W: TreeWidget> BufferListPanel<S, W> {
    /// Subscribes to `source` and builds the first tree right away, so the
    /// widget has something to show before the first idle point.
    pub fn new(source: Arc<S>, widget: W, options: PanelOptions) -> Self {
        let events = source.subscribe();

        let mut tree = DisplayTree::new();
        tree.set_leaf_label(options.leaf_label);

        let mut panel = Self {
            builder: TreeBuilder::from_options(&options),
            scheduler: RebuildScheduler::new(options.incremental_structure_updates),
            registry: NodeRegistry::new(),
            tree,
            source,
            events,
            widget,
            current: None,
            options,
        };

        panel.rebuild_now();
        panel
    }

    pub fn display_tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    /// Applies new options. Anything that changes the shape or labels of the
    /// tree takes effect with the next rebuild, which is requested here.
    pub fn set_options(&mut self, options: PanelOptions) {
        if options == self.options {
            return;
        }

        log::debug!("Panel options changed to {:?}", options);

        self.builder = TreeBuilder::from_options(&options);
        self.tree.set_leaf_label(options.leaf_label);
        self.scheduler
            .set_structural_updates(options.incremental_structure_updates);
        self.options = options;

        self.scheduler.request_rebuild();
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Number of full builds so far, including the one made on construction.
    pub fn rebuild_count(&self) -> u64 {
        self.scheduler.rebuild_count()
    }

    pub fn request_rebuild(&mut self) -> bool {
        self.scheduler.request_rebuild()
    }

    /// Drains every queued document event. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let events: Vec<DocumentEvent> = self.events.try_iter().collect();

        for event in &events {
            self.handle_event(event);
        }

        events.len()
    }

    pub fn handle_event(&mut self, event: &DocumentEvent) -> Applied {
        log::debug!(
            "Document event {:?} for {} ({})",
            event.kind,
            event.document.path(),
            event.document.id()
        );

        if event.kind == DocumentEventKind::Closed && self.current == Some(event.document.id()) {
            self.current = None;
        }

        self.scheduler.apply_incremental(
            event,
            &self.builder,
            &mut self.tree,
            &self.registry,
            &mut self.widget,
        )
    }

    /// Runs the work queued for this idle point. Returns how many tasks ran.
    pub fn run_idle_tasks(&mut self) -> usize {
        let mut ran = 0;

        while let Some(task) = self.scheduler.next_task() {
            match task {
                IdleTask::Rebuild => self.rebuild_now(),
            }
            ran += 1;
        }

        ran
    }

    /// Rebuilds from the source's current documents, keeping expanded
    /// directories and the selection.
    fn rebuild_now(&mut self) {
        let selection = self.capture_selection();
        expansion::snapshot(&mut self.tree, &self.registry, &self.widget);

        let documents = self.source.open_documents();
        if let Some(current) = self.current {
            if !documents.iter().any(|document| document.id() == current) {
                self.current = None;
            }
        }

        self.builder
            .build(&mut self.tree, &mut self.registry, &documents);
        self.widget.tree_replaced(&self.tree);
        expansion::restore(&mut self.tree, &self.registry, &mut self.widget);
        self.restore_selection(selection);

        self.scheduler.finish_rebuild();

        log::debug!(
            "Rebuild #{} done: {} documents, {} directories known",
            self.scheduler.rebuild_count(),
            documents.len(),
            self.registry.len()
        );
    }

    fn capture_selection(&self) -> Option<Selection> {
        let path = self.widget.selected_path()?;
        let node = self.tree.get(self.tree.resolve(&path)?)?;

        if let Some(document) = node.document() {
            Some(Selection::Document(document.id()))
        } else {
            node.canonical_path()
                .map(|path| Selection::Directory(path.to_owned()))
        }
    }

    fn restore_selection(&mut self, selection: Option<Selection>) {
        let from_current = self.current.and_then(|id| self.tree.find_leaf(id));

        let target = from_current.or_else(|| match selection? {
            Selection::Document(id) => self.tree.find_leaf(id),
            Selection::Directory(path) => self.registry.get(&path),
        });

        if let Some(path) = target.and_then(|id| self.tree.node_path(id)) {
            self.widget.select(&path);
        }
    }

    /// Called when the user activates a row. Returns the document to switch
    /// to, which also becomes the current document. Directories and stale
    /// paths give `None`.
    pub fn on_node_activated(&mut self, path: &NodePath) -> Option<DocumentHandle> {
        let id = self.tree.resolve(path)?;
        let document = self.tree.document(id)?.clone();

        log::debug!("Activated {}", document.path());

        self.current = Some(document.id());
        Some(document)
    }

    pub fn find_document(&self, id: DocumentId) -> Option<NodePath> {
        self.tree.node_path(self.tree.find_leaf(id)?)
    }

    pub fn current_document(&self) -> Option<DocumentId> {
        self.current
    }

    /// Marks `id` as the document being edited and selects its row. Returns
    /// `false` if the document has no row.
    pub fn set_current_document(&mut self, id: DocumentId) -> bool {
        let Some(path) = self.find_document(id) else {
            return false;
        };

        self.current = Some(id);
        self.widget.select(&path);
        true
    }

    /// Moves to the document after the current one in display order,
    /// wrapping around at the end.
    pub fn next_document(&mut self) -> Option<DocumentHandle> {
        self.step_document(Direction::Forward)
    }

    /// Moves to the document before the current one in display order,
    /// wrapping around at the start.
    pub fn previous_document(&mut self) -> Option<DocumentHandle> {
        self.step_document(Direction::Backward)
    }

    fn step_document(&mut self, direction: Direction) -> Option<DocumentHandle> {
        let leaves: Vec<&DocumentHandle> = self
            .tree
            .leaves()
            .filter_map(|node| node.document())
            .collect();
        if leaves.is_empty() {
            return None;
        }

        let position = self
            .current
            .and_then(|current| leaves.iter().position(|document| document.id() == current));

        let last = leaves.len() - 1;
        let index = match (direction, position) {
            (Direction::Forward, Some(index)) if index < last => index + 1,
            (Direction::Forward, _) => 0,
            (Direction::Backward, Some(index)) if index > 0 => index - 1,
            (Direction::Backward, _) => last,
        };

        let document = leaves[index].clone();
        self.set_current_document(document.id());
        Some(document)
    }

    /// Expands every directory in the tree.
    pub fn expand_all(&mut self) {
        for path in self.directory_paths() {
            self.widget.expand(&path);
        }
    }

    /// Collapses every directory in the tree, deepest first.
    pub fn collapse_all(&mut self) {
        for path in self.directory_paths().iter().rev() {
            self.widget.collapse(path);
        }
    }

    fn directory_paths(&self) -> Vec<NodePath> {
        let ids: Vec<NodeId> = self
            .tree
            .descendants(self.tree.root_id())
            .filter(|node| node.is_directory())
            .map(|node| node.id())
            .collect();

        ids.into_iter()
            .filter_map(|id| self.tree.node_path(id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{document::DocumentSet, widget::HeadlessWidget};

    #[test]
    fn first_build_happens_on_construction() {
        let source = Arc::new(DocumentSet::new());
        source.open("/a/x.txt");

        let panel = BufferListPanel::new(source, HeadlessWidget::new(), PanelOptions::default());

        assert_eq!(panel.rebuild_count(), 1);
        assert!(!panel.is_rebuild_pending());
        assert_eq!(panel.display_tree().leaves().count(), 1);
    }

    #[test]
    fn changing_options_requests_one_rebuild() {
        let source = Arc::new(DocumentSet::new());
        source.open("/a/x.txt");
        let mut panel = BufferListPanel::new(source, HeadlessWidget::new(), PanelOptions::default());

        panel.set_options(PanelOptions::default());
        assert!(!panel.is_rebuild_pending());

        panel.set_options(PanelOptions {
            case_sensitive: true,
            ..PanelOptions::default()
        });
        assert!(panel.is_rebuild_pending());
        assert_eq!(panel.run_idle_tasks(), 1);
        assert_eq!(panel.rebuild_count(), 2);
    }
}
