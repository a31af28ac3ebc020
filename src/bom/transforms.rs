use std::io::{self, BufRead, Write};

use super::BOM;
use crate::fs_ops::{discard_exact, HeaderTransform};

/// Writes the marker at offset 0 and consumes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertBom;

impl HeaderTransform for InsertBom {
    fn name(&self) -> &'static str {
        "insert-bom"
    }

    fn emit_header(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&BOM)
    }
}

/// Discards exactly the 3 marker bytes and writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripBom;

impl HeaderTransform for StripBom {
    fn name(&self) -> &'static str {
        "strip-bom"
    }

    fn consume_header(&self, reader: &mut dyn BufRead) -> io::Result<()> {
        discard_exact(reader, BOM.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn insert_writes_marker_only() {
        let mut out = Vec::new();
        InsertBom.emit_header(&mut out).unwrap();
        assert_eq!(out, BOM);
        let mut r = Cursor::new(b"abc".to_vec());
        InsertBom.consume_header(&mut r).unwrap();
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn strip_consumes_three_bytes() {
        let mut r = Cursor::new(vec![0xEF, 0xBB, 0xBF, b'o', b'k']);
        StripBom.consume_header(&mut r).unwrap();
        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"ok");
        let mut out = Vec::new();
        StripBom.emit_header(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
