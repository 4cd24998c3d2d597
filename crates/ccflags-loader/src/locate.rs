//! Compilation database discovery.
//!
//! Every candidate directory is checked on its own thread. Checks report on a
//! channel sized to the number of candidates, so a sender never blocks even
//! after the caller has stopped listening. The first directory confirmed to
//! contain the file wins; which one that is depends on thread timing when
//! several candidates qualify.

use crate::options::DEFAULT_DATABASE_NAME;
use crate::LoadError;
use crossbeam_channel::RecvTimeoutError;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// The directories searched when the caller names none.
///
/// In order: the project root, its parent and `root/build_dir`.
#[must_use]
pub fn default_candidates(root: &Path, build_dir: &str) -> Vec<PathBuf> {
    let parent = match root.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => root.to_path_buf(),
    };
    vec![root.to_path_buf(), parent, root.join(build_dir)]
}

/// Find the first candidate directory that contains `filename`.
///
/// An empty `filename` means [`DEFAULT_DATABASE_NAME`]. Gives up with
/// [`LoadError::NotFound`] once every candidate has reported a miss or `timeout`
/// has elapsed, whichever comes first.
pub fn find(
    filename: &str,
    candidates: &[PathBuf],
    timeout: Duration,
) -> Result<PathBuf, LoadError> {
    let filename = if filename.is_empty() {
        DEFAULT_DATABASE_NAME
    } else {
        filename
    };

    let (tx, rx) = crossbeam_channel::bounded(candidates.len());
    for dir in candidates {
        let tx = tx.clone();
        let dir = dir.clone();
        let path = dir.join(filename);
        thread::spawn(move || {
            let found = exists(&path);
            if found {
                tracing::debug!(filepath = %path.display(), "found");
            }
            // The receiver may already be gone; that is fine.
            let _ = tx.send((dir, found));
        });
    }
    drop(tx);

    let deadline = Instant::now().checked_add(timeout);
    loop {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((dir, true)) => return Ok(dir),
            Ok((_, false)) => {}
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    filename,
                    ?timeout,
                    "gave up searching for compilation database"
                );
                break;
            }
        }
    }

    Err(LoadError::NotFound {
        filename: filename.to_string(),
        searched: candidates.to_vec(),
    })
}

/// Existence check only. A file we are not allowed to stat still counts as
/// present; opening it reports the real problem.
fn exists(path: &Path) -> bool {
    match path.try_exists() {
        Ok(found) => found,
        Err(err) => err.kind() == io::ErrorKind::PermissionDenied,
    }
}
