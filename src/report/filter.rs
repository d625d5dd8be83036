use chrono::NaiveDate;
use chrono_tz::Tz;
use std::cmp::Reverse;

use super::{ReportLine, SaleStatus};

/// Criteria a staff member can narrow a sales report by.
///
/// Empty strings count as "not set", so blank form values never filter
/// anything out.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub status: Option<SaleStatus>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ReportFilters {
    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    /// Check a single line. Date bounds are inclusive and compare the sale
    /// date in `tz`; lines with no timestamp fail any date bound.
    pub fn matches(&self, line: &ReportLine, tz: &Tz) -> bool {
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(created_at) = line.created_at else {
                return false;
            };
            let day = created_at.to_local(tz).date_naive();
            if self.start_date.is_some_and(|d| day < d) || self.end_date.is_some_and(|d| day > d) {
                return false;
            }
        }

        if let Some(needle) = non_empty(&self.product_name) {
            if !line
                .product_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }

        if let Some(category) = non_empty(&self.category) {
            match &line.category_name {
                Some(name) if name.to_lowercase() == category.to_lowercase() => {}
                _ => return false,
            }
        }

        self.status.map_or(true, |s| line.status == s)
    }

    /// Keep the matching lines, newest sale first. Lines without a
    /// timestamp sort last and otherwise keep their input order.
    pub fn apply(&self, lines: Vec<ReportLine>, tz: &Tz) -> Vec<ReportLine> {
        let mut kept: Vec<ReportLine> = lines
            .into_iter()
            .filter(|line| self.matches(line, tz))
            .collect();
        kept.sort_by_key(|line| Reverse(line.created_at.map(|ts| ts.to_local(tz).naive_utc())));
        kept
    }

    /// Applied filters as `(label, value)` pairs, in form order
    pub fn labels(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(d) = self.start_date {
            out.push((field_label("start_date"), d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.end_date {
            out.push((field_label("end_date"), d.format("%Y-%m-%d").to_string()));
        }
        if let Some(p) = non_empty(&self.product_name) {
            out.push((field_label("product_name"), p.to_string()));
        }
        if let Some(c) = non_empty(&self.category) {
            out.push((field_label("category"), c.to_string()));
        }
        if let Some(s) = self.status {
            out.push((field_label("status"), s.code().to_string()));
        }
        out
    }
}

/// `start_date` -> `Start Date`
fn field_label(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
