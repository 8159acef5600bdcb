//! The private temp-file set for one run.
//!
//! Every file curlpad hands to the editor (template, dictionary, editor config) lives in
//! a single private directory. [`TempWorkspace`] removes it when dropped, and the
//! interrupt handler holds a [`CleanupRegistry`] clone so Ctrl+C releases the same
//! paths. Cleanup can run any number of times; paths already gone are skipped.

use crate::error::{CurlpadError, Result};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Thread-safe list of paths to remove on exit.
#[derive(Debug, Clone, Default)]
pub struct CleanupRegistry {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        debug!("Tracking temp path: {}", path.display());
        self.lock().push(path);
    }

    pub fn tracked(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    /// Removes every tracked path, newest first, so files go before their directory.
    pub fn cleanup(&self) {
        let paths: Vec<PathBuf> = self.lock().drain(..).collect();
        if paths.is_empty() {
            return;
        }
        debug!("Cleanup starting for {} temp path(s)", paths.len());
        for path in paths.iter().rev() {
            match remove_path(path) {
                Ok(()) => debug!("Removed: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Already deleted: {}", path.display())
                }
                Err(e) => debug!("Error removing {}: {}", path.display(), e),
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
        // A poisoned list is still a valid list of paths.
        self.paths.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// A private directory whose contents are removed on drop.
#[derive(Debug)]
pub struct TempWorkspace {
    dir: Option<TempDir>,
    registry: CleanupRegistry,
}

impl TempWorkspace {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("curlpad-")
            .tempdir()
            .map_err(CurlpadError::Io)?;
        restrict_dir(dir.path())?;

        let registry = CleanupRegistry::new();
        registry.track(dir.path());
        debug!("Created temp workspace: {}", dir.path().display());

        Ok(Self {
            dir: Some(dir),
            registry,
        })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    pub fn registry(&self) -> CleanupRegistry {
        self.registry.clone()
    }

    /// Writes a new owner-only file into the workspace and tracks it.
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
            return Err(CurlpadError::Template(format!(
                "Invalid temp file name: {:?}",
                name
            )));
        }
        let path = self.path().join(name);

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&path).map_err(CurlpadError::Io)?;
        self.registry.track(&path);
        file.write_all(contents.as_bytes())
            .map_err(CurlpadError::Io)?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }

    /// Removes everything now. Dropping the workspace afterwards is a no-op.
    pub fn cleanup(&mut self) {
        self.registry.cleanup();
        if let Some(dir) = self.dir.take() {
            // The registry already removed the directory; just release the handle.
            let _ = dir.close();
        }
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(unix)]
fn restrict_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700)).map_err(CurlpadError::Io)
}

#[cfg(not(unix))]
fn restrict_dir(_path: &Path) -> Result<()> {
    Ok(())
}
