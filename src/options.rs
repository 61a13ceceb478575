//! User-facing panel options.

use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path_key::PathKey;

/// How directories are arranged under the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
    /// Every directory that holds a document is a direct child of the root.
    Flat,

    /// Directories are nested under their parents, then compacted.
    #[default]
    Hierarchical,
}

/// What a document row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeafLabel {
    #[default]
    Name,
    FullPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PanelOptions {
    /// Compare names and paths case-sensitively when sorting.
    pub case_sensitive: bool,

    pub grouping: Grouping,

    pub leaf_label: LeafLabel,

    /// Let `Created` and `Closed` notifications edit the tree in place when
    /// that gives the same result as a rebuild.
    pub incremental_structure_updates: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            grouping: Grouping::Hierarchical,
            leaf_label: LeafLabel::Name,
            incremental_structure_updates: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Could not read panel options")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Panel options are not valid TOML")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

impl PanelOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let contents = fs_err::read_to_string(path)?;
        let options = Self::from_toml_str(&contents)?;

        log::debug!("Loaded panel options from {}: {:?}", path.display(), options);

        Ok(options)
    }

    pub fn path_key(&self) -> PathKey {
        PathKey::new(self.case_sensitive)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let options = PanelOptions::from_toml_str("").unwrap();
        assert_eq!(options, PanelOptions::default());
    }

    #[test]
    fn all_fields() {
        let options = PanelOptions::from_toml_str(
            r#"
            caseSensitive = true
            grouping = "flat"
            leafLabel = "fullPath"
            incrementalStructureUpdates = true
            "#,
        )
        .unwrap();

        assert_eq!(
            options,
            PanelOptions {
                case_sensitive: true,
                grouping: Grouping::Flat,
                leaf_label: LeafLabel::FullPath,
                incremental_structure_updates: true,
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = PanelOptions::from_toml_str("sortColumn = 2").unwrap_err();
        assert!(matches!(error, OptionsError::Toml { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bufferlist.toml");
        fs_err::write(&path, "grouping = \"flat\"\n").unwrap();

        let options = PanelOptions::load(&path).unwrap();
        assert_eq!(options.grouping, Grouping::Flat);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = PanelOptions::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(error, OptionsError::Io { .. }));
    }
}
