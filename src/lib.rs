pub mod config;
pub mod error;
pub mod pdf;
pub mod report;

pub use config::{Config, ReportSettings, Sale, SaleItem, SalesFile, StoreSettings};
pub use error::{ReportError, Result};
pub use pdf::{generate_report_pdf, write_report_pdf, ReportDocument};
pub use report::{ReportFilters, ReportLine, ReportSummary, SaleStatus, SaleTimestamp};
