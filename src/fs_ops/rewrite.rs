//! In-place header rewrite: stage a transformed copy next to the file, then commit it
//! with the three-rename protocol in [`super::atomic`].
//!
//! Guarantees:
//! - Any failure before the commit leaves the target byte-for-byte unchanged and
//!   removes the staging file (`StagedFile` drop guard).
//! - Commit failures roll back; if rollback is impossible the error names the backup.
//! - Symlinks are followed: the real file is rewritten and the link stays a link.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::atomic::{commit, Namespace, StdNamespace};
use super::io_copy::{copy_with_transform, DurabilityMode};
use super::staging::StagedFile;
use super::transform::HeaderTransform;
use crate::errors::YtoolError;

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    pub durability: DurabilityMode,
}

/// What a completed rewrite did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The file that was actually replaced (symlinks resolved).
    pub path: PathBuf,
    /// Size of the new content.
    pub bytes_written: u64,
    /// Backup left behind because it could not be deleted after the swap.
    pub leftover_backup: Option<PathBuf>,
}

/// Rewrite the head of `path` with `transform` on the real filesystem.
pub fn rewrite_head(
    path: &Path,
    transform: &dyn HeaderTransform,
    opts: RewriteOptions,
) -> Result<RewriteOutcome, YtoolError> {
    rewrite_head_with(&StdNamespace, path, transform, opts)
}

/// Same as [`rewrite_head`], with the commit renames routed through `ns`.
pub fn rewrite_head_with<N: Namespace + ?Sized>(
    ns: &N,
    path: &Path,
    transform: &dyn HeaderTransform,
    opts: RewriteOptions,
) -> Result<RewriteOutcome, YtoolError> {
    let target = fs::canonicalize(path).map_err(YtoolError::io("resolve path", path))?;
    let source = File::open(&target).map_err(YtoolError::io("open file", &target))?;
    let perms = source
        .metadata()
        .map_err(YtoolError::io("stat file", &target))?
        .permissions();

    let (staged, staged_file) =
        StagedFile::create_for(&target).map_err(YtoolError::io("create staging file next to", &target))?;

    let copied = copy_with_transform(
        source,
        &target,
        staged_file,
        staged.path(),
        transform,
        opts.durability,
    )?;

    fs::set_permissions(staged.path(), perms)
        .map_err(YtoolError::io("copy permissions to", staged.path()))?;

    debug!(
        path = %target.display(),
        transform = transform.name(),
        header_bytes = copied.header_bytes,
        body_bytes = copied.body_bytes,
        "staged rewritten file"
    );

    let outcome = commit(ns, staged.into_committed_path(), &target, opts.durability)?;
    Ok(RewriteOutcome {
        path: target,
        bytes_written: copied.total(),
        leftover_backup: outcome.leftover_backup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use tempfile::tempdir;

    struct Stamp;
    impl HeaderTransform for Stamp {
        fn name(&self) -> &'static str {
            "stamp"
        }
        fn emit_header(&self, writer: &mut dyn Write) -> io::Result<()> {
            writer.write_all(b"#!")
        }
    }

    /// Writes part of a header, then gives up.
    struct HalfWritten;
    impl HeaderTransform for HalfWritten {
        fn name(&self) -> &'static str {
            "half-written"
        }
        fn emit_header(&self, writer: &mut dyn Write) -> io::Result<()> {
            writer.write_all(b"partial")?;
            Err(io::Error::other("header generator failed"))
        }
    }

    /// Drops more leading bytes than a short file holds.
    struct SkipTen;
    impl HeaderTransform for SkipTen {
        fn name(&self) -> &'static str {
            "skip-ten"
        }
        fn consume_header(&self, reader: &mut dyn std::io::BufRead) -> io::Result<()> {
            crate::fs_ops::discard_exact(reader, 10)
        }
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut v: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn missing_file_is_io_error_and_creates_nothing() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("nope.txt");
        let err = rewrite_head(&p, &Stamp, RewriteOptions::default()).unwrap_err();
        assert!(matches!(err, YtoolError::Io { op: "resolve path", .. }), "{err:?}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rewrite_reports_bytes_and_real_path() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("s.sh");
        fs::write(&p, b"echo").unwrap();
        let out = rewrite_head(&p, &Stamp, RewriteOptions::default()).unwrap();
        assert_eq!(out.bytes_written, 6);
        assert_eq!(out.path, fs::canonicalize(&p).unwrap());
        assert_eq!(out.leftover_backup, None);
        assert_eq!(fs::read(&p).unwrap(), b"#!echo");
    }

    #[cfg(unix)]
    #[test]
    fn permissions_survive_rewrite() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let p = dir.path().join("run.sh");
        fs::write(&p, b"x").unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(0o751)).unwrap();
        rewrite_head(&p, &Stamp, RewriteOptions { durability: DurabilityMode::Data }).unwrap();
        let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o751);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_target_is_rewritten_link_kept() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&real, b"data").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();
        rewrite_head(&link, &Stamp, RewriteOptions::default()).unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"#!data");
    }

    #[test]
    fn failing_transform_leaves_target_and_no_staging_file() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("a.txt");
        fs::write(&p, b"hello").unwrap();

        let err = rewrite_head(&p, &HalfWritten, RewriteOptions::default()).unwrap_err();
        assert!(
            matches!(err, YtoolError::Transform { transform: "half-written", .. }),
            "{err:?}"
        );
        assert_eq!(fs::read(&p).unwrap(), b"hello");
        assert_eq!(listing(dir.path()), vec!["a.txt"]);
    }

    #[test]
    fn short_input_for_consume_is_transform_error() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("a.txt");
        fs::write(&p, b"hello").unwrap();

        let err = rewrite_head(&p, &SkipTen, RewriteOptions::default()).unwrap_err();
        match &err {
            YtoolError::Transform { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected transform error, got {other:?}"),
        }
        assert_eq!(fs::read(&p).unwrap(), b"hello");
        assert_eq!(listing(dir.path()), vec!["a.txt"]);
    }
}
