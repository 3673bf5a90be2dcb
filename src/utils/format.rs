//! Display formatting for the pass-through columns.

use crate::core::EntryKind;
use chrono::{DateTime, Local};
use std::path::Path;

const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Formats a byte count the way a file browser's "Size" column does.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// "Folder" for directories, "<ext> File" for files, "File" without extension.
pub fn type_label(path: &Path, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => "Folder".to_string(),
        EntryKind::File => match path.extension().map(|e| e.to_string_lossy()) {
            Some(ext) if !ext.is_empty() => format!("{} File", ext),
            _ => "File".to_string(),
        },
    }
}

pub fn format_modified(modified: &DateTime<Local>) -> String {
    modified.format("%Y-%m-%d %H:%M").to_string()
}
