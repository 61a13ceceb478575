//! Keeps a compact, stable directory tree of an editor's open documents.
//!
//! Documents come from a [`DocumentSource`]. A [`BufferListPanel`] turns them
//! into a [`DisplayTree`] whose directory nodes keep their identity across
//! rebuilds, so a [`TreeWidget`] showing the tree can keep its expanded rows
//! and selection while documents come and go.

pub mod cli;
pub mod document;
pub mod expansion;
pub mod logging;
pub mod options;
pub mod outline;
pub mod panel;
pub mod path_key;
pub mod scheduler;
pub mod session;
pub mod tree;
pub mod widget;

pub use document::{
    DocumentEvent, DocumentEventKind, DocumentHandle, DocumentId, DocumentSet, DocumentSource,
};
pub use options::{Grouping, LeafLabel, OptionsError, PanelOptions};
pub use panel::BufferListPanel;
pub use path_key::PathKey;
pub use scheduler::{Applied, IdleTask, RebuildScheduler};
pub use session::{Session, SessionEntry, SessionError};
pub use tree::{DisplayTree, NodeId, NodeKind, NodePath, NodeRegistry, TreeBuilder, TreeNode};
pub use widget::{HeadlessWidget, TreeWidget, WidgetEvent};
