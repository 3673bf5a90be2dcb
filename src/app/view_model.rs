//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module acts as the presentation layer: it flattens the visible part of
//! the directory tree into rows and asks the cell value provider for the five
//! column values of each row. Metadata is therefore only read for rows that are
//! actually on screen.

use crate::config::AppConfig;
use crate::core::columns::header_labels;
use crate::core::selection::ToggleState;
use crate::core::{CellValueProvider, Entry, FileSystem, SortDirection};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::state::AppState;

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub config: AppConfig,
    pub root_path: PathBuf,
    pub headers: Vec<String>,
    /// Index of the column the rows are sorted by.
    pub sort_column: usize,
    pub sort_direction: SortDirection,
    pub rows: Vec<RowView>,
    pub current_folder: Option<PathBuf>,
    pub toggle_state: ToggleState,
    pub selected_files: Vec<PathBuf>,
    pub selected_files_count: usize,
    pub status_message: String,
}

/// One visible line of the tree table.
#[derive(Serialize, Clone, Debug)]
pub struct RowView {
    pub path: PathBuf,
    pub depth: usize,
    pub is_directory: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub is_current_folder: bool,
    /// One value per column, in header order.
    pub cells: Vec<String>,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let mut rows = Vec::new();
    match state.fs.children(&state.root_path) {
        Ok(children) => build_rows(state, children, 0, &mut rows),
        Err(e) => tracing::warn!("Cannot list root {}: {}", state.root_path.display(), e),
    }

    let selected_files: Vec<PathBuf> = state.session.selection().iter().cloned().collect();

    UiState {
        config: state.config.clone(),
        root_path: state.root_path.clone(),
        headers: header_labels(),
        sort_column: state.sort.column.index(),
        sort_direction: state.sort.direction,
        rows,
        current_folder: state.session.current_folder().map(Path::to_path_buf),
        toggle_state: state.session.toggle_state(),
        selected_files_count: selected_files.len(),
        selected_files,
        status_message: state.status_message.clone(),
    }
}

/// Depth-first flattening of the expanded part of the tree. Each level is
/// ordered by the current sort before its children are descended into.
fn build_rows(state: &AppState, entries: Vec<Entry>, depth: usize, rows: &mut Vec<RowView>) {
    let provider = CellValueProvider::new(&state.fs, &state.projector);
    let sort = state.sort;

    let mut level: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let (cells, key) = provider.row_with_sort_key(&entry, sort.column);
            (entry, cells, key)
        })
        .collect();
    level.sort_by(|a, b| sort.compare((&a.0, &a.2), (&b.0, &b.2)));

    for (entry, cells, _) in level {
        let is_expanded = entry.is_dir() && state.expanded_dirs.contains(&entry.path);
        rows.push(RowView {
            cells,
            is_selected: state.session.is_selected(&entry.path),
            is_current_folder: state.session.current_folder() == Some(entry.path.as_path()),
            is_directory: entry.is_dir(),
            is_expanded,
            depth,
            path: entry.path.clone(),
        });

        if is_expanded {
            match state.fs.children(&entry.path) {
                Ok(children) => build_rows(state, children, depth + 1, rows),
                Err(e) => tracing::debug!("Cannot expand {}: {}", entry.path.display(), e),
            }
        }
    }
}
