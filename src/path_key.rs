//! Canonical directory keys and path comparison.
//!
//! Directory nodes are identified by their canonical path for the whole life
//! of a panel, so every path that enters the tree goes through
//! [`canonicalize_dir`] first. Paths are treated as plain strings: nothing in
//! here touches the filesystem.

use std::cmp::Ordering;

#[inline]
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Length in bytes of the root prefix of `path`: `/`, `\`, `C:` or `C:\`.
fn root_len(path: &str) -> usize {
    let bytes = path.as_bytes();

    match bytes {
        [first, ..] if is_separator(*first as char) => 1,
        [drive, b':', sep, ..] if drive.is_ascii_alphabetic() && is_separator(*sep as char) => 3,
        [drive, b':', ..] if drive.is_ascii_alphabetic() => 2,
        _ => 0,
    }
}

/// Normalizes a directory path into the form used as a registry key.
///
/// Runs of separators collapse into one and trailing separators are removed
/// unless the path is a root. The separator style itself is left alone.
/// Returns `None` for an empty path.
pub fn canonicalize_dir(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let mut canonical = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for c in path.chars() {
        let separator = is_separator(c);
        if separator && previous_was_separator {
            continue;
        }
        previous_was_separator = separator;
        canonical.push(c);
    }

    while canonical.len() > root_len(&canonical) && canonical.ends_with(is_separator) {
        canonical.pop();
    }

    Some(canonical)
}

/// Returns the canonical parent of a canonical directory path, or `None` if
/// the path is a root or a single relative segment.
pub fn parent_of(dir: &str) -> Option<String> {
    let root = root_len(dir);
    if dir.len() <= root {
        return None;
    }

    match dir.rfind(is_separator) {
        Some(index) if index >= root => Some(dir[..index].to_owned()),
        _ if root > 0 => Some(dir[..root].to_owned()),
        _ => None,
    }
}

/// Splits a document path into its canonical directory and its file name.
///
/// A path without any separator has no directory; such documents are shown
/// directly under the tree root.
pub fn split_document_path(path: &str) -> (Option<String>, &str) {
    match path.rfind(is_separator) {
        Some(index) => (canonicalize_dir(&path[..=index]), &path[index + 1..]),
        None => (None, path),
    }
}

/// Compares path strings with the configured case sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathKey {
    case_sensitive: bool,
}

impl PathKey {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Total order over path strings.
    ///
    /// Case-insensitive comparison looks at lower-cased text first and falls
    /// back to byte order, so strings differing only in case still have a
    /// fixed order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        if self.case_sensitive {
            return a.cmp(b);
        }

        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| a.cmp(b))
    }

    pub fn eq(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        }
    }

    /// Like [`str::strip_prefix`], honoring case sensitivity.
    pub fn strip_prefix<'a>(&self, text: &'a str, prefix: &str) -> Option<&'a str> {
        if self.case_sensitive {
            return text.strip_prefix(prefix);
        }

        let mut rest = text.char_indices();
        for expected in prefix.chars() {
            let (_, actual) = rest.next()?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
        }

        match rest.next() {
            Some((index, _)) => Some(&text[index..]),
            None => Some(""),
        }
    }
}

impl Default for PathKey {
    fn default() -> Self {
        Self::new(false)
    }
}
