//! Minimal PDF builder for sales reports.
//!
//! No PDF library is involved: report text is laid out as fixed-width lines,
//! cut into pages, turned into a small object graph (catalog, page tree,
//! one Helvetica font, a page plus content stream per chunk) and serialized
//! with a hand-written cross-reference table.

mod layout;
mod objects;
mod writer;

pub use layout::{header, paginate, report_lines, LINES_PER_PAGE};
pub use objects::{
    build_document, encode_latin1, escape_text, DocumentObjects, ObjectId, ObjectTable, PdfObject,
};
pub use writer::{write_document, EOF_MARKER, HEADER};

use chrono_tz::Tz;
use std::path::Path;

use crate::error::Result;
use crate::report::{ReportLine, ReportSummary};

/// Everything the report PDF is rendered from
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub title: String,
    /// Applied filters as `(label, value)`, printed verbatim
    pub filters: Vec<(String, String)>,
    pub rows: Vec<ReportLine>,
    pub summary: ReportSummary,
    /// Zone sale timestamps are shown in
    pub timezone: Tz,
}

/// Render the report into a complete PDF byte buffer.
pub fn generate_report_pdf(doc: &ReportDocument) -> Result<Vec<u8>> {
    let lines = report_lines(doc);
    let pages = paginate(&lines, LINES_PER_PAGE);
    let objects = build_document(&pages);
    log::debug!(
        "report '{}': {} rows, {} lines, {} pages, {} objects",
        doc.title,
        doc.rows.len(),
        lines.len(),
        objects.page_ids.len(),
        objects.table.size() - 1
    );
    write_document(&objects.table, objects.catalog)
}

/// Render the report and write it to `output_path`.
pub fn write_report_pdf(doc: &ReportDocument, output_path: &Path) -> Result<()> {
    let bytes = generate_report_pdf(doc)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), output_path.display());
    Ok(())
}
