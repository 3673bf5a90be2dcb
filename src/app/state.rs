//! Defines the central, mutable state of the application.

use super::watcher::DirectoryWatcher;
use crate::config::AppConfig;
use crate::core::{
    EntryKind, ExifReader, FileSystem, LocalFileSystem, MetadataProjector, SelectionSession,
    SortOrder,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Holds the complete, mutable state of one window session.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` so the IPC handler and the
/// event loop can share it. Both run on the event-loop thread.
pub struct AppState {
    /// The session's settings.
    pub config: AppConfig,
    /// The directory whose children form the top level of the tree.
    pub root_path: PathBuf,
    /// Directories whose children are shown in the tree.
    pub expanded_dirs: HashSet<PathBuf>,
    /// Applied to every directory level of the tree.
    pub sort: SortOrder,
    /// Current folder, folder toggle state and selection.
    pub session: SelectionSession,
    pub fs: LocalFileSystem,
    pub projector: MetadataProjector<ExifReader>,
    /// Live-update watcher, if one could be started.
    pub watcher: Option<DirectoryWatcher>,
    /// A one-line summary of the last action, shown under the tree.
    pub status_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let root_path = config.resolved_root();
        let projector = if config.cache_metadata {
            MetadataProjector::with_cache(ExifReader)
        } else {
            MetadataProjector::new(ExifReader)
        };

        Self {
            fs: LocalFileSystem::new(config.show_hidden),
            projector,
            root_path,
            expanded_dirs: HashSet::new(),
            sort: SortOrder::default(),
            session: SelectionSession::new(),
            watcher: None,
            status_message: "Ready.".to_string(),
            config,
        }
    }

    /// Directories whose contents are currently on screen.
    pub fn visible_dirs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.root_path.as_path()).chain(
            self.expanded_dirs
                .iter()
                .map(PathBuf::as_path)
                .filter(|dir| self.is_reachable(dir)),
        )
    }

    /// An expanded directory is only on screen if all its ancestors up to the
    /// root are expanded too.
    pub fn is_reachable(&self, dir: &Path) -> bool {
        if !dir.starts_with(&self.root_path) || dir == self.root_path {
            return dir == self.root_path;
        }
        let mut current = dir.parent();
        while let Some(parent) = current {
            if parent == self.root_path {
                return true;
            }
            if !self.expanded_dirs.contains(parent) {
                return false;
            }
            current = parent.parent();
        }
        false
    }

    /// Points the live-update watcher at the directories on screen.
    pub fn sync_watcher(&mut self) {
        let dirs: Vec<PathBuf> = self.visible_dirs().map(Path::to_path_buf).collect();
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.sync(dirs.iter().map(PathBuf::as_path));
        }
    }

    /// Clears the metadata cache and purges entries that vanished from disk.
    pub fn refresh(&mut self) {
        self.projector.clear();
        self.forget_missing_dirs();
        self.session.on_selection_changed(&self.fs);
        self.sync_watcher();
    }

    fn forget_missing_dirs(&mut self) {
        let fs = &self.fs;
        self.expanded_dirs
            .retain(|dir| fs.classify(dir) == Some(EntryKind::Directory));
    }

    /// Reacts to paths reported as changed by the watcher.
    pub fn apply_filesystem_changes(&mut self, paths: &[PathBuf]) {
        for path in paths {
            self.projector.invalidate(path);
        }
        self.forget_missing_dirs();
        self.session.on_selection_changed(&self.fs);
        self.sync_watcher();
    }
}
