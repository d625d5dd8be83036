//! Report text formatting and pagination.
//!
//! The report is plain monospaced-style text: every row is one fixed-width
//! line, optionally followed by indented detail lines. Pages are cut at a
//! fixed line count.

use rust_decimal::Decimal;

use super::ReportDocument;
use crate::report::ReportLine;

/// Maximum lines on one page
pub const LINES_PER_PAGE: usize = 40;

/// Product names longer than this are cut before padding
const PRODUCT_CHARS: usize = 38;

/// Column header row
pub fn header() -> String {
    format!(
        "{:<40} {:>6} {:>10} {:>12} Estado",
        "Producto", "Cant.", "Precio", "Subtotal"
    )
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn row(line: &ReportLine) -> String {
    let name: String = line.product_name.chars().take(PRODUCT_CHARS).collect();
    format!(
        "{:<40} {:>6} {:>10} {:>12} {}",
        name,
        line.quantity,
        money(line.unit_price),
        money(line.subtotal),
        line.status.label()
    )
}

/// Lay out the full report as text lines, before pagination.
pub fn report_lines(doc: &ReportDocument) -> Vec<String> {
    let mut lines = vec![doc.title.clone(), String::new()];

    for (label, value) in &doc.filters {
        lines.push(format!("{label}: {value}"));
    }
    if !doc.filters.is_empty() {
        lines.push(String::new());
    }

    let header = header();
    let rule = "-".repeat(header.chars().count());
    lines.push(header);
    lines.push(rule);

    for line in &doc.rows {
        lines.push(row(line));
        if let Some(category) = line.category_name.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("  Categoría: {category}"));
        }
        if let Some(created_at) = &line.created_at {
            let local = created_at.to_local(&doc.timezone);
            lines.push(format!("  Fecha: {}", local.format("%d/%m/%Y %H:%M")));
        }
    }

    lines.push(String::new());
    lines.push(format!("Total de unidades: {}", doc.summary.quantity));
    lines.push(format!("Total vendido: ${}", money(doc.summary.total)));
    lines
}

/// Split `lines` into pages of at most `per_page` lines.
///
/// Always yields at least one page, so an empty report still renders.
pub fn paginate(lines: &[String], per_page: usize) -> Vec<&[String]> {
    if lines.is_empty() {
        return vec![lines];
    }
    lines.chunks(per_page.max(1)).collect()
}
