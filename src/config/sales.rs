use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::{ReportLine, SaleStatus, SaleTimestamp};

/// Contents of sales.toml
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SalesFile {
    #[serde(default)]
    pub sales: Vec<Sale>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Sale {
    pub id: u32,
    /// RFC 3339, or a naive "YYYY-MM-DD HH:MM[:SS]" in the report timezone
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SaleItem {
    pub product_name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub status: SaleStatus,
}

impl SalesFile {
    pub fn item_count(&self) -> usize {
        self.sales.iter().map(|s| s.items.len()).sum()
    }

    /// Flatten every sale into report lines carrying the sale's timestamp.
    pub fn report_lines(&self) -> Result<Vec<ReportLine>> {
        let mut lines = Vec::with_capacity(self.item_count());
        for sale in &self.sales {
            let created_at = sale.created_at.as_deref().and_then(|raw| {
                let parsed = SaleTimestamp::parse(raw);
                if parsed.is_none() {
                    log::warn!("sale {}: ignoring unparseable created_at '{}'", sale.id, raw);
                }
                parsed
            });

            for item in &sale.items {
                let mut line = ReportLine::new(
                    item.product_name.clone(),
                    item.quantity,
                    item.unit_price,
                    item.status,
                )?;
                if let Some(category) = item.category_name.as_deref().filter(|c| !c.is_empty()) {
                    line = line.with_category(category);
                }
                if let Some(ts) = created_at {
                    line = line.with_created_at(ts);
                }
                lines.push(line);
            }
        }
        Ok(lines)
    }
}
