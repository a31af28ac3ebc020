//! Read-only BOM detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::BOM;
use crate::errors::YtoolError;

/// Report whether `path` starts with the UTF-8 BOM.
///
/// A file shorter than the marker is simply "absent"; only open failures (`Io`)
/// and genuine read failures (`Read`) are errors.
pub fn detect(path: &Path) -> Result<bool, YtoolError> {
    let file = File::open(path).map_err(YtoolError::io("open file", path))?;
    let head = read_head(file, BOM.len()).map_err(|source| YtoolError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(head == BOM)
}

/// Read up to `n` bytes, stopping early only at end of input.
fn read_head(mut r: impl Read, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    let mut filled = 0;
    while filled < n {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(k) => filled += k,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}
