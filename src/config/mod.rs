mod sales;
mod settings;

pub use sales::{Sale, SaleItem, SalesFile};
pub use settings::{Config, ReportSettings, StoreSettings};

use crate::error::{ReportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.sales-report/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "sales-report") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.sales-report/
    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".sales-report"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the configured output directory; relative paths hang off the
/// config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(ReportError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Load sales.toml (empty if missing)
pub fn load_sales(config_dir: &Path) -> Result<SalesFile> {
    let path = config_dir.join("sales.toml");
    if !path.exists() {
        log::debug!("{} not found, using an empty sales list", path.display());
        return Ok(SalesFile::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[store]
name = "Mi Tienda"

[report]
title = "Reporte de ventas"
timezone = "America/Mexico_City"   # IANA name; naive sale times are read in this zone
output_dir = "output"              # relative to this directory, or absolute / ~/...
"#;

/// Template content for sales.toml
pub const SALES_TEMPLATE: &str = r#"# Sales and their line items. Each [[sales]] entry groups the
# [[sales.items]] that follow it.
#
# created_at accepts RFC 3339 ("2025-03-14T10:30:00-06:00") or a local
# time without offset ("2025-03-14 10:30").
# status is one of: pending, received, return_requested

[[sales]]
id = 1
created_at = "2025-03-14 10:30"

[[sales.items]]
product_name = "Taza de cerámica"
category_name = "Cocina"
quantity = 2
unit_price = "120.50"
status = "received"

[[sales.items]]
product_name = "Mantel bordado"
category_name = "Hogar"
quantity = 1
unit_price = "349.00"
status = "pending"
"#;
