//! The presentation layer: session state, view model, and the IPC bridge to the WebView.

pub mod commands;
pub mod events;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod view_model;
pub mod watcher;

use std::sync::{Arc, Mutex};
use wry::WebView;

use events::{IpcMessage, UserEvent};
use proxy::EventProxy;
use state::AppState;

/// Parses a message from the WebView and dispatches it to its command handler.
pub fn handle_ipc_message<P: EventProxy>(
    message: String,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg = match serde_json::from_str::<IpcMessage>(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Ignoring malformed IPC message {:?}: {}", message, e);
            return;
        }
    };

    tracing::debug!("IPC command '{}'", msg.command);
    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "activateEntry" => commands::activate_entry(msg.payload, proxy, state),
        "toggleFolderSelection" => commands::toggle_folder_selection(proxy, state),
        "selectEntries" => commands::select_entries(msg.payload, proxy, state),
        "clearSelection" => commands::clear_selection(proxy, state),
        "toggleExpansion" => commands::toggle_expansion(msg.payload, proxy, state),
        "sortBy" => commands::sort_by(msg.payload, proxy, state),
        "refresh" => commands::refresh(proxy, state),
        other => tracing::warn!("Unknown IPC command: {}", other),
    }
}

/// Forwards UI-bound events to the WebView's `window.*` functions.
pub fn handle_user_event(event: UserEvent, webview: &WebView) {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => match serde_json::to_string(&ui_state) {
            Ok(json) => format!("window.render({});", json),
            Err(e) => {
                tracing::error!("Failed to serialize UI state: {}", e);
                return;
            }
        },
        UserEvent::ShowError(message) => match serde_json::to_string(&message) {
            Ok(json) => format!("window.showError({});", json),
            Err(e) => {
                tracing::error!("Failed to serialize error message: {}", e);
                return;
            }
        },
        UserEvent::FilesystemChanged(_) => {
            tracing::debug!("FilesystemChanged reached the WebView bridge; ignoring.");
            return;
        }
    };

    if let Err(e) = webview.evaluate_script(&script) {
        tracing::warn!("Failed to evaluate script in WebView: {}", e);
    }
}
