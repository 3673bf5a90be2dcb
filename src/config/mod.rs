//! Application settings.
//!
//! Settings live for one session only: they are built from defaults at startup
//! and never read from or written to disk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// The directory whose contents the tree shows. `None` means the home directory.
    pub root_directory: Option<PathBuf>,
    pub window_title: String,
    pub window_size: (f64, f64),
    pub window_position: (f64, f64),
    pub min_window_size: (f64, f64),
    /// Show dotfiles in the tree and include them in folder toggles.
    pub show_hidden: bool,
    /// Remember each file's metadata date until the file changes.
    pub cache_metadata: bool,
    /// Refresh the listing when the watched directories change on disk.
    pub watch_filesystem: bool,
    /// Pixel widths by column index; `None` lets the UI decide.
    pub column_widths: [Option<u32>; 5],
}

impl AppConfig {
    /// The directory shown at the top of the tree.
    pub fn resolved_root(&self) -> PathBuf {
        self.root_directory
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_directory: None,
            window_title: "Photo Date Browser".to_string(),
            window_size: (900.0, 600.0),
            window_position: (100.0, 100.0),
            min_window_size: (600.0, 400.0),
            show_hidden: false,
            cache_metadata: true,
            watch_filesystem: true,
            column_widths: [Some(300), None, None, None, Some(150)],
        }
    }
}
