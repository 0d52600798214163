/// Directory change watcher used for shader hot-reload.
///
/// The OS notification arrives on a `notify` background thread and only sets
/// a flag. The frame thread observes it with `poll`, which never blocks and
/// reports each batch of changes once.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{Error, Result};

pub struct DirWatcher {
    changed: Arc<AtomicBool>,
    watcher: Option<RecommendedWatcher>,
    path: Option<PathBuf>,
}

impl DirWatcher {
    /// An idle watcher (never reports changes until started or marked)
    pub fn new() -> Self {
        Self {
            changed: Arc::new(AtomicBool::new(false)),
            watcher: None,
            path: None,
        }
    }

    /// Watch `path` (non-recursive), replacing any previous watch
    pub fn start(&mut self, path: &Path) -> Result<()> {
        self.stop();
        self.changed.store(false, Ordering::Release);

        let flag = self.changed.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)) {
                        flag.store(true, Ordering::Release);
                    }
                }
            },
            Config::default(),
        )
        .map_err(|e| Error::BackendError(format!("cannot create watcher: {}", e)))?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| Error::BackendError(format!("cannot watch '{}': {}", path.display(), e)))?;

        self.watcher = Some(watcher);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Drop the OS watch. Pending changes are kept until the next poll.
    pub fn stop(&mut self) {
        self.watcher = None;
        self.path = None;
    }

    /// True once per batch of changes since the previous poll
    pub fn poll(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Simulate an OS notification
    #[cfg(test)]
    pub(crate) fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

impl Default for DirWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dir_watcher_tests.rs"]
mod tests;
