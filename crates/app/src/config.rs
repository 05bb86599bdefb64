//! Environment-driven configuration for the headless host.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use ledgerdash_catalog::{Catalogs, ReferenceData};
use ledgerdash_core::DomainError;
use ledgerdash_journal::{JournalSettings, TaxPolicy};
use ledgerdash_observability::LogFormat;

pub const HOME_STATE_VAR: &str = "LEDGERDASH_HOME_STATE";
pub const DEFAULT_TAX_RATE_VAR: &str = "LEDGERDASH_DEFAULT_TAX_RATE";
pub const DUE_DAYS_VAR: &str = "LEDGERDASH_DUE_DAYS";
pub const CATALOG_VAR: &str = "LEDGERDASH_CATALOG";
pub const LOG_FORMAT_VAR: &str = "LEDGERDASH_LOG_FORMAT";

const DEFAULT_HOME_STATE: &str = "Tamil Nadu";
const DEFAULT_TAX_RATE: u32 = 18;
const DEFAULT_DUE_DAYS: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog contents: {0}")]
    Catalog(#[from] DomainError),
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub home_state: String,
    pub default_tax_rate: Decimal,
    pub due_days: u32,
    pub catalog_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_state: DEFAULT_HOME_STATE.to_string(),
            default_tax_rate: Decimal::from(DEFAULT_TAX_RATE),
            due_days: DEFAULT_DUE_DAYS,
            catalog_path: None,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let home_state = match var(HOME_STATE_VAR) {
            Some(state) => state.trim().to_string(),
            None => {
                tracing::warn!("{HOME_STATE_VAR} not set; using {DEFAULT_HOME_STATE}");
                DEFAULT_HOME_STATE.to_string()
            }
        };

        let default_tax_rate = match var(DEFAULT_TAX_RATE_VAR) {
            Some(raw) => parse_rate(&raw)?,
            None => Decimal::from(DEFAULT_TAX_RATE),
        };

        let due_days = match var(DUE_DAYS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid(DUE_DAYS_VAR, &raw, e.to_string()))?,
            None => DEFAULT_DUE_DAYS,
        };

        let log_format = log_format_from(&lookup)?;

        Ok(Self {
            home_state,
            default_tax_rate,
            due_days,
            catalog_path: var(CATALOG_VAR).map(PathBuf::from),
            log_format,
        })
    }

    pub fn journal_settings(&self) -> Result<JournalSettings, ConfigError> {
        let policy = TaxPolicy::new(&self.home_state)
            .map_err(|e| ConfigError::invalid(HOME_STATE_VAR, &self.home_state, e.to_string()))?;
        Ok(JournalSettings {
            policy,
            default_tax_rate: self.default_tax_rate,
            due_days: self.due_days,
        })
    }

    /// Load reference data from the configured file, or empty catalogs when
    /// no file is configured.
    pub fn load_catalogs(&self) -> Result<Catalogs, ConfigError> {
        let Some(path) = &self.catalog_path else {
            tracing::info!("{CATALOG_VAR} not set; starting with empty catalogs");
            return Ok(Catalogs::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
            path: path.clone(),
            source,
        })?;
        let catalogs = parse_catalogs(path, &raw)?;

        tracing::info!(
            path = %path.display(),
            products = catalogs.products.len(),
            "catalog loaded"
        );
        Ok(catalogs)
    }
}

/// Log format from the environment alone, so logging can start before the
/// rest of the config is read.
pub fn log_format_from_env() -> Result<LogFormat, ConfigError> {
    log_format_from(&|key: &str| std::env::var(key).ok())
}

fn log_format_from(lookup: &impl Fn(&str) -> Option<String>) -> Result<LogFormat, ConfigError> {
    match lookup(LOG_FORMAT_VAR).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| ConfigError::invalid(LOG_FORMAT_VAR, &raw, reason)),
        None => Ok(LogFormat::default()),
    }
}

fn parse_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let rate: Decimal = raw.trim().parse().map_err(|e: rust_decimal::Error| {
        ConfigError::invalid(DEFAULT_TAX_RATE_VAR, raw, e.to_string())
    })?;
    if rate.is_sign_negative() {
        return Err(ConfigError::invalid(
            DEFAULT_TAX_RATE_VAR,
            raw,
            "must not be negative",
        ));
    }
    Ok(rate)
}

fn parse_catalogs(path: &Path, raw: &str) -> Result<Catalogs, ConfigError> {
    let data: ReferenceData =
        serde_json::from_str(raw).map_err(|source| ConfigError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(data.into_catalogs()?)
}
