//! Typed error definitions for ytool's file operations.
//! Each variant is a distinct failure mode of BOM detection or the header rewrite,
//! so callers (and tests) can tell "the file was left alone" from "look for a backup".

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::hints::os_hint;

/// Why a BOM mutation was refused before touching the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    AlreadyMarked,
    NotMarked,
    NotRegularFile,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Precondition::AlreadyMarked => "already has marker",
            Precondition::NotMarked => "no marker present",
            Precondition::NotRegularFile => "not a regular file",
        };
        f.write_str(s)
    }
}

/// Commit transition that failed while the original was still intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    /// Renaming the original to its backup name.
    BackUp,
    /// Renaming the staged file to the original name (rolled back successfully).
    SwapIn,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStage::BackUp => f.write_str("back up original"),
            CommitStage::SwapIn => f.write_str("swap in rewritten file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum YtoolError {
    #[error("{op} '{}': {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read header of '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' {reason}", .path.display())]
    Precondition { path: PathBuf, reason: Precondition },

    #[error("header transform '{transform}' failed on '{}': {source}", .path.display())]
    Transform {
        transform: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("commit failed ({stage}) for '{}': {source}; original file left unchanged", .target.display())]
    Commit {
        stage: CommitStage,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "commit failed for '{}': {source}; rollback also failed ({rollback}); original content is now at '{}'",
        .target.display(),
        .backup.display()
    )]
    CommitStranded {
        target: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
        rollback: io::Error,
    },
}

impl YtoolError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| YtoolError::Io { op, path, source }
    }

    /// Stable machine-readable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            YtoolError::Io { .. } => "io",
            YtoolError::Read { .. } => "read",
            YtoolError::Precondition { .. } => "precondition",
            YtoolError::Transform { .. } => "transform",
            YtoolError::Commit { .. } => "commit",
            YtoolError::CommitStranded { .. } => "commit_stranded",
        }
    }

    /// Platform hint for errors caused by the environment (permissions, space, ...).
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            YtoolError::Io { source, .. }
            | YtoolError::Read { source, .. }
            | YtoolError::Commit { source, .. }
            | YtoolError::CommitStranded { source, .. } => os_hint(source),
            YtoolError::Precondition { .. } | YtoolError::Transform { .. } => None,
        }
    }

    /// True when the target may no longer hold its original content under its own name.
    pub fn is_stranded(&self) -> bool {
        matches!(self, YtoolError::CommitStranded { .. })
    }
}
