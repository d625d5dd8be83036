use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Config directory not found at {0}. Run 'sales-report init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown timezone '{0}'. Use an IANA name such as 'America/Mexico_City'.")]
    InvalidTimezone(String),

    #[error("Invalid {flag} date '{value}'. Expected YYYY-MM-DD.")]
    InvalidDate { flag: &'static str, value: String },

    #[error("Invalid status '{0}'. Use 'pending', 'received', or 'return_requested'.")]
    InvalidStatus(String),

    #[error("Amount overflow in {0}")]
    AmountOverflow(String),

    #[error("PDF object {0} was reserved but never written")]
    UnresolvedObject(u32),

    #[error("Failed to serialize output: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, ReportError>;
