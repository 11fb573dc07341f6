//! Temporary file tracking for pipeline intermediates.
//!
//! Every file the pipeline generates lives in one working directory and is
//! recorded in a tracked set until it is released. The directory is removed
//! on teardown only when the workspace created it.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::MediaResult;

/// Prefix for self-created working directories.
pub const WORKSPACE_PREFIX: &str = "veditor_";

/// A working directory plus the set of files created in it.
#[derive(Debug)]
pub struct TempWorkspace {
    dir: PathBuf,
    owned: bool,
    torn_down: bool,
    tracked: BTreeSet<PathBuf>,
}

impl TempWorkspace {
    /// Use `dir` (created if missing), or create a fresh unique directory.
    pub fn create(dir: Option<&Path>) -> MediaResult<Self> {
        let (dir, owned) = match dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                (dir.to_path_buf(), false)
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix(WORKSPACE_PREFIX)
                    .disable_cleanup(true)
                    .tempdir()?;
                (temp.path().to_path_buf(), true)
            }
        };

        debug!(dir = %dir.display(), owned, "Workspace ready");

        Ok(Self {
            dir,
            owned,
            torn_down: false,
            tracked: BTreeSet::new(),
        })
    }

    /// Working directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether teardown removes the directory itself.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Create an empty, uniquely named file with `suffix` and track it.
    pub fn allocate(&mut self, suffix: &str) -> MediaResult<PathBuf> {
        let path = tempfile::Builder::new()
            .prefix("tmp")
            .suffix(suffix)
            .tempfile_in(&self.dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| e.error)?;
        self.tracked.insert(path.clone());
        Ok(path)
    }

    /// Start tracking a file produced in the workspace by other means.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.tracked.insert(path.into());
    }

    /// Whether `path` is currently tracked.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.tracked.contains(path)
    }

    /// Delete files and stop tracking them. Missing files are not an error.
    pub fn release<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            match std::fs::remove_file(path) {
                Ok(()) => {
                    self.tracked.remove(path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    self.tracked.remove(path);
                }
                Err(e) => {
                    // Still on disk, so it stays tracked
                    warn!(path = %path.display(), "Failed to remove temp file: {}", e);
                }
            }
        }
    }

    /// Snapshot of tracked paths.
    pub fn list_tracked(&self) -> Vec<PathBuf> {
        self.tracked.iter().cloned().collect()
    }

    /// Release everything and, if owned, remove the directory. Best effort.
    pub fn teardown(&mut self) {
        let tracked = self.list_tracked();
        let count = tracked.len();
        self.release(tracked);

        if self.owned && !self.torn_down && self.dir.is_dir() {
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                warn!(dir = %self.dir.display(), "Failed to remove workspace: {}", e);
            } else {
                // Directory removal took any leftovers with it
                self.tracked.clear();
            }
        }
        self.torn_down = true;

        debug!(dir = %self.dir.display(), released = count, "Workspace torn down");
    }
}
