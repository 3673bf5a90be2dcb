//! Toolkit-independent logic: the entry model, the filesystem and metadata
//! collaborators, the column projection and the selection coordinator.

pub mod columns;
pub mod error;
pub mod filesystem;
pub mod metadata;
pub mod selection;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whether an entry is a directory or a plain file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryKind {
    Directory,
    File,
}

/// A transient view of one filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// The last path component, or the full path for roots like `/`.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub use columns::{CellValueProvider, Column, SortDirection, SortKey, SortOrder};
pub use error::CoreError;
pub use filesystem::{EntryAttributes, FileSystem, LocalFileSystem};
pub use metadata::{ExifReader, MetadataProjector, MetadataReader, TagMap, DATE_TIME_TAG};
pub use selection::{Activation, SelectionMode, SelectionSession, ToggleOutcome, ToggleState};
