mod filter;

pub use filter::ReportFilters;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// Fulfillment state of a sold line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Pending,
    Received,
    ReturnRequested,
}

impl SaleStatus {
    /// Stored code, as used in data files and filter values
    pub fn code(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Received => "received",
            SaleStatus::ReturnRequested => "return_requested",
        }
    }

    /// Human-readable label printed on reports
    pub fn label(self) -> &'static str {
        match self {
            SaleStatus::Pending => "Pendiente",
            SaleStatus::Received => "Recibido",
            SaleStatus::ReturnRequested => "Devolución solicitada",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SaleStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "received" => Ok(SaleStatus::Received),
            "return_requested" => Ok(SaleStatus::ReturnRequested),
            other => Err(ReportError::InvalidStatus(other.to_string())),
        }
    }
}

/// When a sale happened. Data files may carry either an offset-qualified
/// timestamp or a bare local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleTimestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl SaleTimestamp {
    /// Parse an RFC 3339 timestamp, falling back to the naive formats.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(SaleTimestamp::Aware(dt));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(SaleTimestamp::Naive)
    }

    /// Express the timestamp in `tz`.
    ///
    /// Naive values are taken to already be wall-clock time in `tz`. An
    /// ambiguous wall time resolves to the earlier instant. One that falls
    /// into a DST gap keeps the offset in force just before the transition,
    /// so 02:30 on a spring-forward night reads as 03:30 the same day.
    pub fn to_local(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            SaleTimestamp::Aware(dt) => dt.with_timezone(tz),
            SaleTimestamp::Naive(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .or_else(|| {
                    let before = *naive - Duration::hours(1);
                    tz.from_local_datetime(&before)
                        .earliest()
                        .map(|dt| dt + Duration::hours(1))
                })
                .unwrap_or_else(|| tz.from_utc_datetime(naive)),
        }
    }
}

impl Serialize for SaleTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SaleTimestamp::Aware(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            SaleTimestamp::Naive(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// One sold line item as it appears on a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub product_name: String,
    pub category_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub status: SaleStatus,
    pub created_at: Option<SaleTimestamp>,
}

impl ReportLine {
    pub fn new(
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        status: SaleStatus,
    ) -> crate::error::Result<Self> {
        let product_name = product_name.into();
        let subtotal = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| ReportError::AmountOverflow(format!("subtotal of '{product_name}'")))?;
        Ok(Self {
            product_name,
            category_name: None,
            quantity,
            unit_price,
            subtotal,
            status,
            created_at: None,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_name = Some(category.into());
        self
    }

    pub fn with_created_at(mut self, created_at: SaleTimestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Totals over a set of report lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub quantity: u64,
    pub total: Decimal,
}

impl ReportSummary {
    pub fn from_lines(lines: &[ReportLine]) -> crate::error::Result<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| {
            let total = acc
                .total
                .checked_add(line.subtotal)
                .ok_or_else(|| ReportError::AmountOverflow("report total".to_string()))?;
            Ok(Self {
                quantity: acc.quantity + u64::from(line.quantity),
                total,
            })
        })
    }
}
