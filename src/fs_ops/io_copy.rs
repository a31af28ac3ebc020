//! Copy-with-transform streaming.
//!
//! - Applies the header transform to the (reader, writer) pair first.
//! - Streams the remaining bytes verbatim with bounded buffers, so files larger
//!   than memory are fine.
//! - Flushes, then optionally fsyncs the staged file depending on `DurabilityMode`.
//!
//! Snapshot semantics: the source is read once from offset 0 to EOF; bytes appended
//! concurrently after EOF is seen are not included.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

use super::transform::HeaderTransform;
use crate::errors::YtoolError;

pub(crate) const BUF_SIZE: usize = 64 * 1024;

/// Durability mode controlling post-write flush behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Ensure written data reaches the OS page cache (`flush`), but do not force
    /// a disk barrier. Fastest; may lose data on sudden power loss.
    Data,
    /// Force data and metadata to stable storage (`sync_all`) before the rename.
    #[default]
    Full,
}

impl DurabilityMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" | "flush" => Some(DurabilityMode::Data),
            "full" | "sync" | "fsync" => Some(DurabilityMode::Full),
            _ => None,
        }
    }
}

impl FromStr for DurabilityMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid durability mode: '{s}'"))
    }
}

/// Result of a streaming copy into the staged file.
#[derive(Debug, Clone, Copy)]
pub struct CopyResult {
    /// Bytes written by the header transform.
    pub header_bytes: u64,
    /// Bytes copied verbatim after the header.
    pub body_bytes: u64,
}

impl CopyResult {
    pub fn total(&self) -> u64 {
        self.header_bytes + self.body_bytes
    }
}

/// Counts bytes passing through to the inner writer.
struct Counting<'a, W: Write> {
    inner: &'a mut W,
    written: u64,
}

impl<W: Write> Write for Counting<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Stream `src` into `dst` with `transform` applied to the head.
/// `src_path`/`dst_path` are used only to label errors.
pub(crate) fn copy_with_transform(
    src: File,
    src_path: &Path,
    dst: File,
    dst_path: &Path,
    transform: &dyn HeaderTransform,
    mode: DurabilityMode,
) -> Result<CopyResult, YtoolError> {
    let mut reader = BufReader::with_capacity(BUF_SIZE, src);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst);

    let transform_err = |source| YtoolError::Transform {
        transform: transform.name(),
        path: src_path.to_path_buf(),
        source,
    };
    transform.consume_header(&mut reader).map_err(transform_err)?;
    let mut counting = Counting { inner: &mut writer, written: 0 };
    transform.emit_header(&mut counting).map_err(transform_err)?;
    let header_bytes = counting.written;
    trace!(transform = transform.name(), header_bytes, "header transform applied");

    let body_bytes = io::copy(&mut reader, &mut writer)
        .map_err(YtoolError::io("copy file body into", dst_path))?;
    writer
        .flush()
        .map_err(YtoolError::io("flush staging file", dst_path))?;

    if matches!(mode, DurabilityMode::Full) {
        writer
            .get_ref()
            .sync_all()
            .map_err(YtoolError::io("fsync staging file", dst_path))?;
    }

    Ok(CopyResult { header_bytes, body_bytes })
}
