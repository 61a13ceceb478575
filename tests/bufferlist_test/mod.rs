//! Shared setup for panel tests: a document set, a headless widget and a few
//! shortcuts for poking at both.

#![allow(dead_code)]

use std::sync::Arc;

use libbufferlist::{
    outline::outline, BufferListPanel, DisplayTree, DocumentHandle, DocumentId, DocumentSet,
    DocumentSource, HeadlessWidget, NodeId, NodePath, NodeRegistry, PanelOptions, TreeBuilder,
    TreeWidget,
};

pub struct Harness {
    pub documents: Arc<DocumentSet>,
    pub panel: BufferListPanel<DocumentSet, HeadlessWidget>,
}

impl Harness {
    pub fn new(paths: &[&str]) -> Self {
        Self::with_options(PanelOptions::default(), paths)
    }

    /// Opens `paths` before the panel exists, so the panel starts from its
    /// first build with no events queued.
    pub fn with_options(options: PanelOptions, paths: &[&str]) -> Self {
        let _ = tracing_subscriber::fmt::try_init();

        let documents = Arc::new(DocumentSet::new());
        for path in paths {
            documents.open(*path);
        }

        let panel = BufferListPanel::new(Arc::clone(&documents), HeadlessWidget::new(), options);

        Self { documents, panel }
    }

    /// Delivers queued events and runs the idle queue. Returns the number of
    /// rebuilds that ran.
    pub fn settle(&mut self) -> usize {
        self.panel.process_events();
        self.panel.run_idle_tasks()
    }

    pub fn tree(&self) -> &DisplayTree {
        self.panel.display_tree()
    }

    pub fn widget(&self) -> &HeadlessWidget {
        self.panel.widget()
    }

    pub fn id_of(&self, path: &str) -> DocumentId {
        self.documents
            .open_documents()
            .into_iter()
            .find(|document| document.path() == path)
            .map(|document| document.id())
            .unwrap_or_else(|| panic!("{path} is not open"))
    }

    pub fn dir(&self, canonical_path: &str) -> NodeId {
        self.panel
            .registry()
            .get(canonical_path)
            .unwrap_or_else(|| panic!("{canonical_path} is not registered"))
    }

    pub fn dir_path(&self, canonical_path: &str) -> NodePath {
        self.tree()
            .node_path(self.dir(canonical_path))
            .unwrap_or_else(|| panic!("{canonical_path} is not shown"))
    }

    pub fn expand_dir(&mut self, canonical_path: &str) {
        let path = self.dir_path(canonical_path);
        self.panel.widget_mut().expand(&path);
    }

    pub fn is_expanded(&self, canonical_path: &str) -> bool {
        self.widget().is_expanded(self.dir(canonical_path))
    }

    pub fn selected(&self) -> Option<NodeId> {
        let path = self.widget().selected_path()?;
        self.tree().resolve(&path)
    }

    pub fn selected_document(&self) -> Option<DocumentId> {
        let id = self.selected()?;
        self.tree().document(id).map(DocumentHandle::id)
    }

    pub fn outline(&self) -> String {
        outline(self.tree())
    }

    /// What a brand new panel would show for the currently open documents.
    pub fn fresh_outline(&self) -> String {
        let mut tree = DisplayTree::new();
        let mut registry = NodeRegistry::new();
        TreeBuilder::from_options(self.panel.options()).build(
            &mut tree,
            &mut registry,
            &self.documents.open_documents(),
        );
        outline(&tree)
    }

    /// Every expanded path the widget holds must still point into the tree.
    pub fn assert_expansion_resolves(&self) {
        for path in self.widget().expanded_paths() {
            assert!(
                self.tree().resolve(&path).is_some(),
                "stale expanded path {path:?}"
            );
        }
    }
}
