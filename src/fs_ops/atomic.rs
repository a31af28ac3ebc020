//! Three-rename commit of a staged file over its target.
//!
//! States and transitions:
//!
//! ```text
//! Staging --back_up--> BackedUp --swap_in--> Committed --(delete backup, best-effort)
//!    |                    |
//!    |                    +-- swap_in fails --> rollback (backup -> target) --> Aborted
//!    |                                              \-- rollback fails --> Stranded
//!    +-- back_up fails --> Aborted
//! ```
//!
//! - `Aborted`: the target still holds its original content under its own name and
//!   the staged file has been removed.
//! - `Stranded`: the original content exists only under the backup name; the error
//!   names that path.
//! - `Committed`: the target holds the new content. A backup that could not be
//!   deleted is reported in `CommitOutcome::leftover_backup`, not as an error.
//!
//! All filesystem effects go through [`Namespace`] so each transition can be failed
//! on purpose in tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::io_copy::DurabilityMode;
use super::staging::{free_sibling_name, BACKUP_SUFFIX};
use crate::errors::{CommitStage, YtoolError};

/// Rename/delete primitives over one filesystem namespace.
pub trait Namespace {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    /// Persist directory entries after a rename. Default: no-op.
    fn sync_dir(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdNamespace;

impl Namespace for StdNamespace {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    #[cfg(unix)]
    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        fs::File::open(dir)?.sync_all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Staging,
    BackedUp,
    Committed,
    Aborted,
    Stranded,
}

/// What a successful commit left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Backup that could not be deleted after the swap (content already committed).
    pub leftover_backup: Option<PathBuf>,
}

/// One in-flight commit. Owns the staged path until it is renamed into place;
/// dropping a transaction that never committed removes the staged file.
pub struct Transaction<'a, N: Namespace + ?Sized> {
    ns: &'a N,
    staged: PathBuf,
    target: PathBuf,
    backup: PathBuf,
    durability: DurabilityMode,
    state: CommitState,
}

impl<'a, N: Namespace + ?Sized> Transaction<'a, N> {
    /// Begin in `Staging`. Picks a free backup name next to `target`.
    /// `durability` decides whether the directory is fsynced after the swap.
    pub fn begin(
        ns: &'a N,
        staged: PathBuf,
        target: &Path,
        durability: DurabilityMode,
    ) -> Result<Self, YtoolError> {
        let backup = match free_sibling_name(target, BACKUP_SUFFIX) {
            Ok(b) => b,
            Err(e) => {
                let _ = ns.remove_file(&staged);
                return Err(YtoolError::Io {
                    op: "choose backup name for",
                    path: target.to_path_buf(),
                    source: e,
                });
            }
        };
        trace!(staged = %staged.display(), backup = %backup.display(), "commit: staging");
        Ok(Self {
            ns,
            staged,
            target: target.to_path_buf(),
            backup,
            durability,
            state: CommitState::Staging,
        })
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Staging -> BackedUp, or Staging -> Aborted.
    pub fn back_up(&mut self) -> Result<(), YtoolError> {
        debug_assert_eq!(self.state, CommitState::Staging);
        if let Err(source) = self.ns.rename(&self.target, &self.backup) {
            self.abort();
            return Err(YtoolError::Commit {
                stage: CommitStage::BackUp,
                target: self.target.clone(),
                source,
            });
        }
        self.state = CommitState::BackedUp;
        trace!(backup = %self.backup.display(), "commit: backed up");
        Ok(())
    }

    /// BackedUp -> Committed, or BackedUp -> (rollback) -> Aborted | Stranded.
    pub fn swap_in(&mut self) -> Result<(), YtoolError> {
        debug_assert_eq!(self.state, CommitState::BackedUp);
        let Err(source) = self.ns.rename(&self.staged, &self.target) else {
            self.state = CommitState::Committed;
            if self.durability == DurabilityMode::Full
                && let Some(parent) = self.target.parent()
                && let Err(e) = self.ns.sync_dir(parent)
            {
                // The rename already happened; a failed directory sync does not undo it.
                warn!(dir = %parent.display(), error = %e, "directory fsync after swap failed");
            }
            trace!(path = %self.target.display(), "commit: swapped in");
            return Ok(());
        };

        match self.ns.rename(&self.backup, &self.target) {
            Ok(()) => {
                debug!(path = %self.target.display(), "commit: swap failed, original restored");
                self.abort();
                Err(YtoolError::Commit {
                    stage: CommitStage::SwapIn,
                    target: self.target.clone(),
                    source,
                })
            }
            Err(rollback) => {
                self.abort();
                self.state = CommitState::Stranded;
                Err(YtoolError::CommitStranded {
                    target: self.target.clone(),
                    backup: self.backup.clone(),
                    source,
                    rollback,
                })
            }
        }
    }

    /// Committed: delete the backup (best-effort).
    pub fn finish(self) -> CommitOutcome {
        debug_assert_eq!(self.state, CommitState::Committed);
        let leftover_backup = match self.ns.remove_file(&self.backup) {
            Ok(()) => None,
            Err(_) => Some(self.backup.clone()),
        };
        CommitOutcome { leftover_backup }
    }

    fn abort(&mut self) {
        let _ = self.ns.remove_file(&self.staged);
        self.state = CommitState::Aborted;
        trace!(staged = %self.staged.display(), "commit: aborted");
    }
}

impl<N: Namespace + ?Sized> Drop for Transaction<'_, N> {
    fn drop(&mut self) {
        if self.state == CommitState::Staging {
            let _ = self.ns.remove_file(&self.staged);
        }
    }
}

/// Run the full protocol: back up, swap in, delete backup.
pub fn commit<N: Namespace + ?Sized>(
    ns: &N,
    staged: PathBuf,
    target: &Path,
    durability: DurabilityMode,
) -> Result<CommitOutcome, YtoolError> {
    let mut tx = Transaction::begin(ns, staged, target, durability)?;
    tx.back_up()?;
    tx.swap_in()?;
    Ok(tx.finish())
}
