//! Same-directory staging files.
//!
//! The rewritten content is built in a hidden sibling of the target so the final
//! replace is a rename within one directory (never a cross-device copy).
//! `StagedFile` owns that sibling: dropping it without committing deletes it.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

pub(crate) const STAGING_SUFFIX: &str = "ytmp";
pub(crate) const BACKUP_SUFFIX: &str = "ybak";

const MAX_NAME_ATTEMPTS: u32 = 16;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name for `target`.
/// Pattern: .<file name>.<pid>.<nanos>.<seq>.<suffix>
pub(crate) fn sibling_name(target: &Path, suffix: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_else(|| "file".as_ref()));
    name.push(format!(".{pid}.{nanos}.{seq}.{suffix}"));

    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

/// Pick a sibling name that does not exist right now.
/// Renames overwrite silently on Unix, so the backup must not land on a live file.
pub(crate) fn free_sibling_name(target: &Path, suffix: &str) -> io::Result<PathBuf> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = sibling_name(target, suffix);
        match candidate.symlink_metadata() {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(candidate),
            Err(e) => return Err(e),
            Ok(_) => trace!(path = %candidate.display(), "sibling name taken; retrying"),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free .{suffix} name next to '{}'", target.display()),
    ))
}

/// A freshly created staging file next to the target.
/// Removed on drop unless `into_committed_path` handed it over to the commit.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    /// Create a new staging sibling of `target` (create-new semantics, never clobbers).
    pub fn create_for(target: &Path) -> io::Result<(Self, File)> {
        let mut last_err = None;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = sibling_name(target, STAGING_SUFFIX);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!(staged = %path.display(), file = %target.display(), "created staging file");
                    return Ok((Self { path, armed: true }, file));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop owning the file; the caller is now responsible for its fate.
    pub(crate) fn into_committed_path(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.armed {
            // Best-effort: the error that caused the abort is what the caller reports.
            let _ = std::fs::remove_file(&self.path);
            trace!(staged = %self.path.display(), "removed staging file");
        }
    }
}
