//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! These handlers are responsible for interacting with the `AppState` and the `core`
//! logic, and for sending `UserEvent`s back to the UI.

use super::helpers::with_state_and_notify;
use super::proxy::EventProxy;
use super::state::AppState;
use crate::core::{
    display_name, Activation, Column, SelectionMode, SortDirection, SortOrder, ToggleOutcome,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Payload of `selectEntries`.
#[derive(Deserialize, Debug)]
pub struct SelectEntriesPayload {
    pub paths: Vec<PathBuf>,
    pub mode: SelectionMode,
}

/// Payload of `sortBy`. Without a direction the header-click rule applies.
#[derive(Deserialize, Debug)]
pub struct SortByPayload {
    pub column: usize,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

/// Sends the initial state once the frontend has loaded.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.sync_watcher();
        tracing::info!("Showing {}", s.root_path.display());
    });
}

/// A click on a row: directories toggle their files, files are only reported.
pub fn activate_entry<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(path) = serde_json::from_value::<PathBuf>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            let activation = s.session.on_entry_activated(&s.fs, &path);
            s.status_message = match activation {
                Activation::Folder(outcome) => toggle_status(&path, &outcome),
                Activation::File(file) => format!("File chosen: {}", display_name(&file)),
                Activation::Missing(gone) => {
                    format!("{} no longer exists.", display_name(&gone))
                }
            };
        });
    } else {
        tracing::warn!(
            "Failed to deserialize path string from payload: {:?}",
            payload
        );
    }
}

/// Toggles the files of the current folder without changing the folder.
pub fn toggle_folder_selection<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        let outcome = s.session.toggle_folder_file_selection(&s.fs);
        s.status_message = match s.session.current_folder() {
            Some(folder) => toggle_status(folder, &outcome),
            None => "No folder chosen yet.".to_string(),
        };
    });
}

/// A direct selection change made in the view (ctrl-click, range, clear-and-select).
pub fn select_entries<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match serde_json::from_value::<SelectEntriesPayload>(payload.clone()) {
        Ok(request) => {
            with_state_and_notify(&state, &proxy, |s| {
                s.session.select(&s.fs, request.paths, request.mode);
                s.status_message = selection_status(s.session.selection().len());
            });
        }
        Err(e) => {
            tracing::warn!("Invalid selectEntries payload {:?}: {}", payload, e);
        }
    }
}

/// Deselects everything. The current folder and toggle state are kept.
pub fn clear_selection<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.session.clear();
        s.status_message = selection_status(0);
    });
}

/// Toggles the expanded/collapsed state of a directory in the UI tree.
pub fn toggle_expansion<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(path) = serde_json::from_value::<PathBuf>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            if !s.expanded_dirs.remove(&path) {
                s.expanded_dirs.insert(path);
            }
            s.sync_watcher();
        });
    } else {
        tracing::warn!(
            "Failed to deserialize path string from payload: {:?}",
            payload
        );
    }
}

/// Changes the column and direction the rows are ordered by.
pub fn sort_by<P: EventProxy>(payload: serde_json::Value, proxy: P, state: Arc<Mutex<AppState>>) {
    let request = match serde_json::from_value::<SortByPayload>(payload.clone()) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Invalid sortBy payload {:?}: {}", payload, e);
            return;
        }
    };
    let Some(column) = Column::from_index(request.column) else {
        tracing::warn!("sortBy: no column at index {}", request.column);
        return;
    };

    with_state_and_notify(&state, &proxy, |s| {
        s.sort = match request.direction {
            Some(direction) => SortOrder { column, direction },
            None => s.sort.clicked(column),
        };
        tracing::debug!("Sorting by {:?}", s.sort);
    });
}

/// Re-reads everything from disk.
pub fn refresh<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.refresh();
        s.status_message = "Refreshed.".to_string();
    });
}

/// Applies changes reported by the directory watcher.
pub fn filesystem_changed<P: EventProxy>(
    paths: Vec<PathBuf>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    with_state_and_notify(&state, &proxy, |s| {
        tracing::debug!("Filesystem changed: {:?}", paths);
        s.apply_filesystem_changes(&paths);
    });
}

fn toggle_status(folder: &Path, outcome: &ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::NoCurrentFolder => "No folder chosen yet.".to_string(),
        ToggleOutcome::Selected(files) => format!(
            "Selected {} file(s) in {}.",
            files.len(),
            display_name(folder)
        ),
        ToggleOutcome::Deselected(_) => {
            format!("Files deselected in {}.", display_name(folder))
        }
    }
}

fn selection_status(count: usize) -> String {
    format!("{} file(s) selected.", count)
}
