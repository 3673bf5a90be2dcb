//! The selection coordinator.
//!
//! Owns the session-lifetime selection state: the current folder, the folder
//! toggle state and the selection set. Two rules hold:
//!
//! - Activating a directory makes it the current folder and toggles the
//!   selection of the plain files directly inside it.
//! - After every selection mutation, no matter who made it, directories are
//!   purged from the selection.

use super::{EntryKind, FileSystem};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The ordered set of selected paths.
pub type SelectionSet = BTreeSet<PathBuf>;

/// Whether the last folder toggle selected or deselected files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ToggleState {
    #[default]
    Deselected,
    Selected,
}

/// How a set of paths is applied to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Discard the previous selection and select exactly the given paths.
    ClearAndSelect,
    Select,
    Deselect,
    /// Flip each given path, the way a click in a multi-selection view does.
    Toggle,
}

/// What a folder toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No folder has been activated yet.
    NoCurrentFolder,
    Selected(Vec<PathBuf>),
    Deselected(Vec<PathBuf>),
}

/// What activating an entry did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Folder(ToggleOutcome),
    /// Files are informational only and leave the selection alone.
    File(PathBuf),
    /// The path is gone from the filesystem.
    Missing(PathBuf),
}

#[derive(Debug, Default)]
pub struct SelectionSession {
    current_folder: Option<PathBuf>,
    toggle_state: ToggleState,
    selection: SelectionSet,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.current_folder.as_deref()
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle_state
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selection.contains(path)
    }

    /// Handles a click on a row.
    pub fn on_entry_activated<F: FileSystem>(&mut self, fs: &F, path: &Path) -> Activation {
        match fs.classify(path) {
            Some(EntryKind::Directory) => {
                self.current_folder = Some(path.to_path_buf());
                Activation::Folder(self.toggle_folder_file_selection(fs))
            }
            Some(EntryKind::File) => {
                tracing::info!("File chosen: {}", path.display());
                Activation::File(path.to_path_buf())
            }
            None => {
                tracing::warn!("Activated entry no longer exists: {}", path.display());
                Activation::Missing(path.to_path_buf())
            }
        }
    }

    /// Selects or deselects the plain files directly inside the current folder.
    ///
    /// The toggle state is session-wide, not per folder: activating a second
    /// folder while the state is `Selected` deselects that folder's files
    /// (none of which are selected) and leaves the state `Deselected`.
    pub fn toggle_folder_file_selection<F: FileSystem>(&mut self, fs: &F) -> ToggleOutcome {
        let Some(folder) = self.current_folder.clone() else {
            return ToggleOutcome::NoCurrentFolder;
        };

        let files: Vec<PathBuf> = match fs.children(&folder) {
            Ok(children) => children
                .into_iter()
                .filter(|entry| entry.is_file())
                .map(|entry| entry.path)
                .collect(),
            Err(e) => {
                tracing::warn!("Could not list {}: {}", folder.display(), e);
                Vec::new()
            }
        };

        match self.toggle_state {
            ToggleState::Selected => {
                self.select(fs, files.iter().cloned(), SelectionMode::Deselect);
                self.toggle_state = ToggleState::Deselected;
                tracing::info!("Files deselected in {}", folder.display());
                ToggleOutcome::Deselected(files)
            }
            ToggleState::Deselected => {
                self.select(fs, files.iter().cloned(), SelectionMode::ClearAndSelect);
                self.toggle_state = ToggleState::Selected;
                tracing::info!("Selected files in {}:", folder.display());
                for file in &files {
                    tracing::info!("  {}", file.display());
                }
                ToggleOutcome::Selected(files)
            }
        }
    }

    /// Applies a selection mutation and then runs the directory filter.
    pub fn select<F, I>(&mut self, fs: &F, paths: I, mode: SelectionMode)
    where
        F: FileSystem,
        I: IntoIterator<Item = PathBuf>,
    {
        if self.apply(paths, mode) {
            self.on_selection_changed(fs);
        }
    }

    /// Drops every selected path that is not currently a plain file.
    ///
    /// The replacement is itself a selection change, so the filter is entered
    /// a second time; the equality check ends the recursion there. Returns
    /// whether the selection was replaced.
    pub fn on_selection_changed<F: FileSystem>(&mut self, fs: &F) -> bool {
        let candidate: SelectionSet = self
            .selection
            .iter()
            .filter(|path| fs.classify(path) == Some(EntryKind::File))
            .cloned()
            .collect();

        if candidate == self.selection {
            return false;
        }

        tracing::debug!(
            "Purging {} non-file entries from the selection",
            self.selection.len() - candidate.len()
        );
        self.select(fs, candidate, SelectionMode::ClearAndSelect);
        true
    }

    /// Empties the selection. Current folder and toggle state are kept.
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Mutates the raw selection without filtering. Returns whether it changed.
    fn apply<I>(&mut self, paths: I, mode: SelectionMode) -> bool
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.selection.clone();
        match mode {
            SelectionMode::ClearAndSelect => {
                self.selection = paths.into_iter().collect();
            }
            SelectionMode::Select => self.selection.extend(paths),
            SelectionMode::Deselect => {
                for path in paths {
                    self.selection.remove(&path);
                }
            }
            SelectionMode::Toggle => {
                for path in paths {
                    if !self.selection.remove(&path) {
                        self.selection.insert(path);
                    }
                }
            }
        }
        self.selection != before
    }
}
