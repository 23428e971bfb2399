//! Ownership of the transient compiler executable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{NdltError, Result};

/// Exit status used when a run is cut short by Ctrl-C (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Paths of every artifact currently claimed, for the interrupt handler.
static LIVE_ARTIFACTS: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn live_artifacts() -> MutexGuard<'static, Vec<PathBuf>> {
    LIVE_ARTIFACTS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(artifact = %path.display(), "removed artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(
            artifact = %path.display(),
            error = %e,
            "failed to remove artifact"
        ),
    }
}

/// Remove claimed artifacts and exit when the user presses Ctrl-C.
///
/// A signal terminates the process without unwinding, so [`Drop`] never
/// runs for the live guard. The handler does its work instead.
pub fn install_interrupt_cleanup() -> Result<()> {
    ctrlc::set_handler(|| {
        warn!("interrupted, cleaning up");
        for path in live_artifacts().iter() {
            remove_artifact(path);
        }
        std::process::exit(EXIT_INTERRUPTED);
    })
    .map_err(|e| NdltError::Config(format!("Failed to install interrupt handler: {}", e)))
}

/// Scope guard over the compiler executable produced by the build.
///
/// The file is removed when the guard is dropped, which covers normal
/// completion, early returns through `?`, an aborted run and unwinding
/// panics alike. Ctrl-C is handled by [`install_interrupt_cleanup`]. Only one
/// guard should exist per path at a time.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    /// Take ownership of `path` for the duration of a run.
    ///
    /// A file left behind by an earlier run is removed up front so a failed
    /// build can never be mistaken for a fresh one.
    pub fn claim(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.is_dir() {
            return Err(NdltError::Validation(format!(
                "Artifact path is a directory: {}",
                path.display()
            )));
        }

        match std::fs::remove_file(&path) {
            Ok(()) => warn!(artifact = %path.display(), "removed stale artifact"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        live_artifacts().push(path.clone());
        Ok(Self { path })
    }

    /// Path the build writes to and the harness executes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the build has produced the file yet.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        remove_artifact(&self.path);

        let mut live = live_artifacts();
        if let Some(index) = live.iter().position(|path| *path == self.path) {
            live.swap_remove(index);
        }
    }
}
