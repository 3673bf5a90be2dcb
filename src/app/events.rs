//! Defines the event and message structures for communication between the backend and frontend.

use serde::Deserialize;
use std::path::PathBuf;

use super::view_model::UiState;

/// Events delivered to the event loop.
///
/// `StateUpdate` and `ShowError` are forwarded to the WebView as calls to the
/// corresponding `window.*` function. `FilesystemChanged` is posted by the
/// directory watcher and handled by the loop itself.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render the UI.
    StateUpdate(Box<UiState>),
    /// An error message to be displayed to the user.
    ShowError(String),
    /// Paths that changed on disk.
    FilesystemChanged(Vec<PathBuf>),
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
