//! Serialization of an object table into the on-disk PDF layout:
//! header, body, xref table, and trailer.

use std::io::Write;

use super::objects::{ObjectId, ObjectTable};
use crate::error::{ReportError, Result};

pub const HEADER: &[u8] = b"%PDF-1.4\n";
pub const EOF_MARKER: &[u8] = b"%%EOF";

/// Write every object in ascending order and index them.
///
/// Each xref entry holds the byte offset of its `N 0 obj` token, so the
/// offset is taken immediately before that token is written.
pub fn write_document(table: &ObjectTable, root: ObjectId) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    output.extend_from_slice(HEADER);

    let mut offsets: Vec<usize> = Vec::with_capacity(table.size());
    for (id, object) in table.entries() {
        let object = object.ok_or(ReportError::UnresolvedObject(id.get()))?;
        offsets.push(output.len());
        writeln!(output, "{} 0 obj", id.get())?;
        output.extend_from_slice(&object.body());
        output.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = output.len();
    writeln!(output, "xref")?;
    writeln!(output, "0 {}", table.size())?;
    // Object 0 is always free
    writeln!(output, "0000000000 65535 f ")?;
    for offset in &offsets {
        writeln!(output, "{:010} 00000 n ", offset)?;
    }

    writeln!(output, "trailer")?;
    writeln!(output, "<< /Size {} /Root {} >>", table.size(), root)?;
    writeln!(output, "startxref")?;
    writeln!(output, "{}", xref_start)?;
    output.extend_from_slice(EOF_MARKER);

    Ok(output)
}
