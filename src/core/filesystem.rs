//! The filesystem collaborator: classification, single-level enumeration and
//! per-entry attributes.

use super::{display_name, CoreError, Entry, EntryKind};
use crate::utils::format::type_label;
use chrono::{DateTime, Local};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Pass-through attributes shown in the first four columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryAttributes {
    pub name: String,
    /// `None` for directories.
    pub size: Option<u64>,
    pub type_label: String,
    pub modified: Option<DateTime<Local>>,
}

/// The narrow interface the presentation and selection layers use to look at
/// the filesystem. Implemented for the real disk by [`LocalFileSystem`] and by
/// in-memory doubles in tests.
pub trait FileSystem {
    /// Returns the kind of the entry at `path`, or `None` when it no longer
    /// exists (or is neither a regular file nor a directory).
    fn classify(&self, path: &Path) -> Option<EntryKind>;

    /// Lists the immediate children of `dir`, directories first.
    fn children(&self, dir: &Path) -> Result<Vec<Entry>, CoreError>;

    /// Reads the display attributes of `entry`.
    fn attributes(&self, entry: &Entry) -> Result<EntryAttributes, CoreError>;
}

/// The production filesystem backed by `std::fs` and `walkdir`.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    show_hidden: bool,
}

impl LocalFileSystem {
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }

    fn kind_of(metadata: &fs::Metadata) -> Option<EntryKind> {
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else if metadata.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn classify(&self, path: &Path) -> Option<EntryKind> {
        // `fs::metadata` follows symlinks, so a link is classified by its target.
        fs::metadata(path).ok().as_ref().and_then(Self::kind_of)
    }

    fn children(&self, dir: &Path) -> Result<Vec<Entry>, CoreError> {
        let metadata = fs::metadata(dir).map_err(|e| CoreError::Io(e, dir.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        for result in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let dir_entry = match result {
                Ok(dir_entry) => dir_entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !self.show_hidden && is_hidden(dir_entry.file_name()) {
                continue;
            }

            // Paths cross the IPC bridge as JSON strings.
            if dir_entry.path().to_str().is_none() {
                tracing::warn!(
                    "Skipping entry with a non-UTF-8 name: {}",
                    dir_entry.path().display()
                );
                continue;
            }

            let file_type = dir_entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                continue;
            };
            entries.push(Entry::new(dir_entry.into_path(), kind));
        }

        sort_entries(&mut entries);
        Ok(entries)
    }

    fn attributes(&self, entry: &Entry) -> Result<EntryAttributes, CoreError> {
        let metadata =
            fs::metadata(&entry.path).map_err(|e| CoreError::Io(e, entry.path.clone()))?;

        Ok(EntryAttributes {
            name: entry.name(),
            size: entry.is_file().then(|| metadata.len()),
            type_label: type_label(&entry.path, entry.kind),
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
        })
    }
}

/// Dotfiles are hidden, like the default filter of a native file browser.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Directories first, then case-insensitive by name.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => {
            let (name_a, name_b) = (display_name(&a.path), display_name(&b.path));
            name_a
                .to_lowercase()
                .cmp(&name_b.to_lowercase())
                .then_with(|| name_a.cmp(&name_b))
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(Entry::name).collect()
    }

    #[test]
    fn test_children_are_immediate_and_directories_first() {
        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join("b.png"), b"png").unwrap();
        std_fs::write(dir.path().join("A.jpg"), b"jpg").unwrap();
        std_fs::create_dir(dir.path().join("sub")).unwrap();
        std_fs::write(dir.path().join("sub/nested.jpg"), b"jpg").unwrap();

        let fs = LocalFileSystem::default();
        let children = fs.children(dir.path()).unwrap();

        assert_eq!(names(&children), vec!["sub", "A.jpg", "b.png"]);
        assert!(children[0].is_dir());
        assert!(children[1].is_file());
    }

    #[test]
    fn test_hidden_entries_follow_the_setting() {
        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join(".secret.jpg"), b"").unwrap();
        std_fs::write(dir.path().join("visible.jpg"), b"").unwrap();

        let hidden = LocalFileSystem::new(false).children(dir.path()).unwrap();
        assert_eq!(names(&hidden), vec!["visible.jpg"]);

        let shown = LocalFileSystem::new(true).children(dir.path()).unwrap();
        assert_eq!(names(&shown), vec![".secret.jpg", "visible.jpg"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.jpg")), b"").unwrap();
        std_fs::write(dir.path().join("good.jpg"), b"").unwrap();

        let children = LocalFileSystem::default().children(dir.path()).unwrap();
        assert_eq!(names(&children), vec!["good.jpg"]);
    }

    #[test]
    fn test_children_of_a_file_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std_fs::write(&file, b"").unwrap();

        let err = LocalFileSystem::default().children(&file).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));

        let missing = LocalFileSystem::default()
            .children(&dir.path().join("gone"))
            .unwrap_err();
        assert!(matches!(missing, CoreError::Io(_, _)));
    }

    #[test]
    fn test_classify_reports_missing_paths_as_absent() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std_fs::write(&file, b"").unwrap();

        let fs = LocalFileSystem::default();
        assert_eq!(fs.classify(dir.path()), Some(EntryKind::Directory));
        assert_eq!(fs.classify(&file), Some(EntryKind::File));
        assert_eq!(fs.classify(&dir.path().join("gone.jpg")), None);
    }

    #[test]
    fn test_attributes_of_file_and_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("photo.JPG");
        std_fs::write(&file, vec![0u8; 2048]).unwrap();

        let fs = LocalFileSystem::default();
        let file_attrs = fs.attributes(&Entry::new(&file, EntryKind::File)).unwrap();
        assert_eq!(file_attrs.name, "photo.JPG");
        assert_eq!(file_attrs.size, Some(2048));
        assert_eq!(file_attrs.type_label, "JPG File");
        assert!(file_attrs.modified.is_some());

        let dir_attrs = fs
            .attributes(&Entry::new(dir.path(), EntryKind::Directory))
            .unwrap();
        assert_eq!(dir_attrs.size, None);
        assert_eq!(dir_attrs.type_label, "Folder");
    }
}
