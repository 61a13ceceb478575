//! Documents as the panel sees them, and the host side that supplies them.

use std::{fmt, sync::Mutex};

use crossbeam_channel::{Receiver, Sender};

use crate::path_key::split_document_path;

/// Stable identity of an open document. Two handles with the same path but
/// different ids are different documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A snapshot of one open document: its identity, where it lives, and the
/// bits of state a tree row displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    id: DocumentId,
    path: String,
    directory: Option<String>,
    name: String,
    dirty: bool,
    mode: String,
}

impl DocumentHandle {
    pub fn new(id: DocumentId, path: impl Into<String>) -> Self {
        let path = path.into();
        let (directory, name) = split_document_path(&path);
        let name = name.to_owned();

        Self {
            id,
            path,
            directory,
            name,
            dirty: false,
            mode: String::from("text"),
        }
    }

    pub fn dirty(self, dirty: bool) -> Self {
        Self { dirty, ..self }
    }

    pub fn mode(self, mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            ..self
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical directory of the document, or `None` when the path has no
    /// directory part at all.
    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mode_name(&self) -> &str {
        &self.mode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentEventKind {
    Created,
    Closed,
    Saved,
    DirtyChanged,
    ModeChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
    pub kind: DocumentEventKind,
    pub document: DocumentHandle,
}

impl DocumentEvent {
    pub fn new(kind: DocumentEventKind, document: DocumentHandle) -> Self {
        Self { kind, document }
    }
}

/// The host's registry of open documents.
///
/// Implementations deliver every change notification to every subscriber, on
/// the thread that owns the subscribing panel.
pub trait DocumentSource {
    fn open_documents(&self) -> Vec<DocumentHandle>;

    fn subscribe(&self) -> Receiver<DocumentEvent>;
}

/// An in-memory [`DocumentSource`]. Used by the command line host and by
/// tests in place of a real editor.
#[derive(Debug, Default)]
pub struct DocumentSet {
    inner: Mutex<DocumentSetInner>,
}

#[derive(Debug, Default)]
struct DocumentSetInner {
    next_id: u64,
    documents: Vec<DocumentHandle>,
    subscribers: Vec<Sender<DocumentEvent>>,
}

impl DocumentSetInner {
    fn broadcast(&mut self, kind: DocumentEventKind, document: &DocumentHandle) {
        let event = DocumentEvent::new(kind, document.clone());

        // Subscribers that hung up are forgotten.
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    fn position(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|document| document.id == id)
    }

    fn update(
        &mut self,
        id: DocumentId,
        kind: DocumentEventKind,
        change: impl FnOnce(&mut DocumentHandle) -> bool,
    ) -> Option<DocumentHandle> {
        let index = self.position(id)?;
        let changed = change(&mut self.documents[index]);
        let document = self.documents[index].clone();

        if changed {
            self.broadcast(kind, &document);
        }

        Some(document)
    }
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document and announces it with a `Created` event.
    pub fn open(&self, path: impl Into<String>) -> DocumentHandle {
        let mut inner = self.inner.lock().unwrap();

        inner.next_id += 1;
        let document = DocumentHandle::new(DocumentId(inner.next_id), path);
        inner.documents.push(document.clone());
        inner.broadcast(DocumentEventKind::Created, &document);

        document
    }

    pub fn close(&self, id: DocumentId) -> Option<DocumentHandle> {
        let mut inner = self.inner.lock().unwrap();

        let index = inner.position(id)?;
        let document = inner.documents.remove(index);
        inner.broadcast(DocumentEventKind::Closed, &document);

        Some(document)
    }

    /// Flips the dirty flag. No event is sent if the flag already had that
    /// value.
    pub fn set_dirty(&self, id: DocumentId, dirty: bool) -> Option<DocumentHandle> {
        let mut inner = self.inner.lock().unwrap();

        inner.update(id, DocumentEventKind::DirtyChanged, |document| {
            let changed = document.dirty != dirty;
            document.dirty = dirty;
            changed
        })
    }

    pub fn set_mode(&self, id: DocumentId, mode: &str) -> Option<DocumentHandle> {
        let mut inner = self.inner.lock().unwrap();

        inner.update(id, DocumentEventKind::ModeChanged, |document| {
            let changed = document.mode != mode;
            document.mode = mode.to_owned();
            changed
        })
    }

    pub fn save(&self, id: DocumentId) -> Option<DocumentHandle> {
        let mut inner = self.inner.lock().unwrap();

        inner.update(id, DocumentEventKind::Saved, |document| {
            document.dirty = false;
            true
        })
    }

    /// Saves a document under a new path. Identity is kept; only the path
    /// and everything derived from it change.
    pub fn save_as(&self, id: DocumentId, path: impl Into<String>) -> Option<DocumentHandle> {
        let path = path.into();
        let mut inner = self.inner.lock().unwrap();

        inner.update(id, DocumentEventKind::Saved, |document| {
            let mode = std::mem::take(&mut document.mode);
            *document = DocumentHandle::new(id, path).mode(mode);
            true
        })
    }

    pub fn get(&self, id: DocumentId) -> Option<DocumentHandle> {
        let inner = self.inner.lock().unwrap();
        let index = inner.position(id)?;
        Some(inner.documents[index].clone())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSource for DocumentSet {
    fn open_documents(&self) -> Vec<DocumentHandle> {
        self.inner.lock().unwrap().documents.clone()
    }

    fn subscribe(&self) -> Receiver<DocumentEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.inner.lock().unwrap().subscribers.push(sender);
        receiver
    }
}
