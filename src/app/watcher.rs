//! Bridges filesystem change notifications into the event loop.
//!
//! Only the root and the expanded directories are watched, each one
//! non-recursively, so a large home directory costs one watch per visible
//! folder. The callback runs on the watcher's thread and must only forward the
//! changed paths; all state changes happen on the event-loop thread.

use crate::core::CoreError;
use notify::event::{EventKind, MetadataKind, ModifyKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct DirectoryWatcher {
    watcher: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl DirectoryWatcher {
    /// Creates a watcher that calls `on_change` with the affected paths.
    pub fn new<H>(on_change: H) -> Result<Self, CoreError>
    where
        H: Fn(Vec<PathBuf>) + Send + 'static,
    {
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) if is_relevant(&event.kind) && !event.paths.is_empty() => {
                    on_change(event.paths);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Filesystem watcher error: {}", e),
            }
        })?;

        Ok(Self {
            watcher,
            watched: HashSet::new(),
        })
    }

    /// Makes the watched set equal to `dirs`.
    pub fn sync<'a, I>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let wanted: HashSet<PathBuf> = dirs.into_iter().map(Path::to_path_buf).collect();

        let stale: Vec<PathBuf> = self.watched.difference(&wanted).cloned().collect();
        for dir in stale {
            if let Err(e) = self.watcher.unwatch(&dir) {
                tracing::debug!("Unwatch of {} failed: {}", dir.display(), e);
            }
            self.watched.remove(&dir);
        }

        for dir in wanted {
            if self.watched.contains(&dir) {
                continue;
            }
            match self.watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.watched.insert(dir);
                }
                Err(e) => tracing::warn!("Cannot watch {}: {}", dir.display(), e),
            }
        }
    }

    pub fn watched(&self) -> &HashSet<PathBuf> {
        &self.watched
    }
}

/// Reads (including our own metadata reads) must not trigger a refresh.
fn is_relevant(kind: &EventKind) -> bool {
    !matches!(
        kind,
        EventKind::Access(_)
            | EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime))
            | EventKind::Other
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, AccessMode, CreateKind, RemoveKind};
    use std::sync::mpsc;
    use tempfile::tempdir;

    #[test]
    fn test_access_events_are_ignored() {
        assert!(!is_relevant(&EventKind::Access(AccessKind::Close(
            AccessMode::Read
        ))));
        assert!(!is_relevant(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::AccessTime
        ))));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Remove(RemoveKind::Any)));
    }

    #[test]
    fn test_sync_adds_and_removes_watches() {
        let root = tempdir().unwrap();
        let a = root.path().join("a");
        std::fs::create_dir(&a).unwrap();

        let (tx, _rx) = mpsc::channel();
        let mut watcher = DirectoryWatcher::new(move |paths| {
            let _ = tx.send(paths);
        })
        .unwrap();

        watcher.sync([root.path(), a.as_path()]);
        assert_eq!(watcher.watched().len(), 2);

        watcher.sync([root.path()]);
        assert_eq!(watcher.watched().len(), 1);
        assert!(watcher.watched().contains(root.path()));
    }

    #[test]
    fn test_missing_directory_is_not_watched() {
        let root = tempdir().unwrap();
        let mut watcher = DirectoryWatcher::new(|_| {}).unwrap();
        watcher.sync([root.path().join("missing").as_path()]);
        assert!(watcher.watched().is_empty());
    }
}
