//! Header transforms applied before the bulk copy.
//!
//! A transform sees the reader positioned at offset 0 and the writer of the staged
//! file before any body byte has been copied. It may discard leading input bytes
//! (`consume_header`) and/or write new leading bytes (`emit_header`); whatever it
//! leaves unread in the reader is copied verbatim afterwards.

use std::io::{self, BufRead, Read, Write};

pub trait HeaderTransform {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Discard header bytes from the source. Runs first.
    fn consume_header(&self, _reader: &mut dyn BufRead) -> io::Result<()> {
        Ok(())
    }

    /// Write header bytes to the staged file. Runs after `consume_header`.
    fn emit_header(&self, _writer: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// Discard exactly `n` bytes from `reader`, failing with `UnexpectedEof` if the
/// input is shorter.
pub fn discard_exact(reader: &mut dyn BufRead, n: u64) -> io::Result<()> {
    let skipped = io::copy(&mut Read::take(&mut *reader, n), &mut io::sink())?;
    if skipped < n {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {n} header bytes, found {skipped}"),
        ));
    }
    Ok(())
}
