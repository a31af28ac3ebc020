//! Actionable hints for I/O failures.
//!
//! Maps raw OS error codes (or the portable `ErrorKind` when no code is present)
//! to a short suggestion shown after the error message, e.g.
//!   error: create staging file '/srv/.a.txt.1.2.0.ytmp': Permission denied (os error 13)
//!   hint: permission denied; check ownership and write permissions on the directory.

use std::io;

/// Hint for an I/O error, if one applies.
pub fn os_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => {
                    Some("permission denied; check ownership and write permissions on the directory.")
                }
                libc::EXDEV => Some("cross-filesystem rename; the staging file must live next to the target."),
                libc::EBUSY => Some("resource busy; ensure no other process holds the file."),
                libc::ENOENT => Some("path not found; verify it exists."),
                libc::EEXIST => Some("name already taken; retry the operation."),
                libc::ENOSPC => Some("insufficient space on device; the rewrite needs room for a full copy."),
                libc::EROFS => Some("read-only filesystem; cannot write here."),
                libc::EISDIR => Some("path is a directory; pass a regular file."),
                libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle."),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments."),
                libc::EMFILE | libc::ENFILE => Some("too many open files; close files or raise limits."),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions."),         // ERROR_ACCESS_DENIED
                17 => Some("not same device; cross-filesystem rename."), // ERROR_NOT_SAME_DEVICE
                32 => Some("sharing violation; file is in use."),       // ERROR_SHARING_VIOLATION
                2 | 3 => Some("path not found; verify it exists."),     // FILE/PATH NOT FOUND
                80 | 183 => Some("name already taken; retry the operation."),
                112 => Some("insufficient disk space."),                // ERROR_DISK_FULL
                19 => Some("write protected / read-only media."),       // ERROR_WRITE_PROTECT
                206 => Some("filename or path too long (MAX_PATH exceeded)."),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions."),
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => Some("name already taken; retry the operation."),
        io::ErrorKind::UnexpectedEof => Some("file ended earlier than expected; was it truncated concurrently?"),
        _ => None,
    }
}
