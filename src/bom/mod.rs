//! UTF-8 byte-order-mark operations.
//!
//! `detect` is a pure inspection of the first three bytes. `add_marker` and
//! `remove_marker` check the current state first and refuse inapplicable requests
//! (`Precondition`) instead of silently doing nothing; the actual mutation goes
//! through the atomic header rewrite in [`crate::fs_ops`].

mod detect;
mod transforms;

pub use detect::detect;
pub use transforms::{InsertBom, StripBom};

use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{Precondition, YtoolError};
use crate::fs_ops::{rewrite_head_with, Namespace, RewriteOptions, RewriteOutcome, StdNamespace};

/// The UTF-8 BOM, checked and written at absolute offset 0.
pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Prefix `path` with the BOM. Fails with `Precondition` if it already has one.
pub fn add_marker(path: &Path) -> Result<RewriteOutcome, YtoolError> {
    add_marker_with(&StdNamespace, path, RewriteOptions::default())
}

/// Strip the leading BOM from `path`. Fails with `Precondition` if there is none.
pub fn remove_marker(path: &Path) -> Result<RewriteOutcome, YtoolError> {
    remove_marker_with(&StdNamespace, path, RewriteOptions::default())
}

pub fn add_marker_with<N: Namespace + ?Sized>(
    ns: &N,
    path: &Path,
    opts: RewriteOptions,
) -> Result<RewriteOutcome, YtoolError> {
    ensure_regular_file(path)?;
    if detect(path)? {
        return Err(YtoolError::Precondition {
            path: path.to_path_buf(),
            reason: Precondition::AlreadyMarked,
        });
    }
    let out = rewrite_head_with(ns, path, &InsertBom, opts)?;
    info!(path = %out.path.display(), bytes = out.bytes_written, "BOM added");
    Ok(out)
}

pub fn remove_marker_with<N: Namespace + ?Sized>(
    ns: &N,
    path: &Path,
    opts: RewriteOptions,
) -> Result<RewriteOutcome, YtoolError> {
    ensure_regular_file(path)?;
    if !detect(path)? {
        return Err(YtoolError::Precondition {
            path: path.to_path_buf(),
            reason: Precondition::NotMarked,
        });
    }
    let out = rewrite_head_with(ns, path, &StripBom, opts)?;
    info!(path = %out.path.display(), bytes = out.bytes_written, "BOM removed");
    Ok(out)
}

/// Directories and special files cannot be rewritten by rename.
fn ensure_regular_file(path: &Path) -> Result<(), YtoolError> {
    let meta = fs::metadata(path).map_err(YtoolError::io("stat file", path))?;
    if meta.is_file() {
        Ok(())
    } else {
        Err(YtoolError::Precondition {
            path: path.to_path_buf(),
            reason: Precondition::NotRegularFile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn hello_round_trip() {
        let dir = assert_fs::TempDir::new().unwrap();
        let f = dir.child("hello.txt");
        f.write_str("hello").unwrap();

        add_marker(f.path()).unwrap();
        assert_eq!(
            std::fs::read(f.path()).unwrap(),
            [0xEF, 0xBB, 0xBF, 0x68, 0x65, 0x6C, 0x6C, 0x6F]
        );
        assert!(detect(f.path()).unwrap());

        remove_marker(f.path()).unwrap();
        f.assert("hello");
        assert!(!detect(f.path()).unwrap());
    }

    #[test]
    fn empty_file_cannot_lose_marker() {
        let dir = assert_fs::TempDir::new().unwrap();
        let f = dir.child("empty.txt");
        f.touch().unwrap();
        assert!(!detect(f.path()).unwrap());
        let err = remove_marker(f.path()).unwrap_err();
        assert!(matches!(
            err,
            YtoolError::Precondition { reason: Precondition::NotMarked, .. }
        ));
        f.assert("");
    }

    #[test]
    fn directory_is_rejected() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = add_marker(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            YtoolError::Precondition { reason: Precondition::NotRegularFile, .. }
        ));
    }
}
