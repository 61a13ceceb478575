//! Session files: the list of documents an editor had open.
//!
//! One document per line. A line is a path, optionally followed by
//! tab-separated tokens; the only token that means anything is `current`,
//! which marks the document that had focus. Older files prefix the path
//! with `path:`. Blank lines are skipped.

use std::{io, path::Path};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub path: String,
    pub current: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not read session file")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Line {line} of the session file has no path")]
    MissingPath { line: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    entries: Vec<SessionEntry>,
}

impl Session {
    pub fn parse(contents: &str) -> Result<Self, SessionError> {
        let mut entries = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let line = line.strip_prefix("path:").unwrap_or(line);
            let mut tokens = line.split('\t');

            let path = tokens.next().unwrap_or_default().trim_end_matches('\r');
            if path.is_empty() {
                return Err(SessionError::MissingPath { line: index + 1 });
            }

            let current = tokens.any(|token| token.trim_end_matches('\r') == "current");

            entries.push(SessionEntry {
                path: path.to_owned(),
                current,
            });
        }

        Ok(Self { entries })
    }

    pub fn read(path: &Path) -> Result<Self, SessionError> {
        let contents = fs_err::read_to_string(path)?;
        let session = Self::parse(&contents)?;

        log::debug!(
            "Read {} session entries from {}",
            session.entries.len(),
            path.display()
        );

        Ok(session)
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    /// The entry marked `current`. If several are marked, the last one wins.
    pub fn current(&self) -> Option<&SessionEntry> {
        self.entries.iter().rev().find(|entry| entry.current)
    }
}
