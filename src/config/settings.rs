use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Config {
    /// Parse the configured IANA timezone
    pub fn timezone(&self) -> Result<Tz> {
        self.report
            .timezone
            .parse::<Tz>()
            .map_err(|_| ReportError::InvalidTimezone(self.report.timezone.clone()))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreSettings {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub timezone: String,
    pub output_dir: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Reporte de ventas".to_string(),
            timezone: "America/Mexico_City".to_string(),
            output_dir: "output".to_string(),
        }
    }
}
