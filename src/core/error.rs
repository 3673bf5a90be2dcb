//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// None of these errors is fatal to the running application. The metadata
/// projector turns read failures into an empty cell, and the selection
/// coordinator treats an unreadable folder as an empty one.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// The embedded metadata block of an image could not be decoded.
    #[error("Could not decode EXIF data of {1}: {0}")]
    Exif(#[source] exif::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// The filesystem watcher could not be created or attached to a path.
    #[error("Filesystem watcher error: {0}")]
    Watch(#[from] notify::Error),
}
