use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Process configuration, read from `WORKWEAR_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `None` runs against an in-memory workbook.
    pub sheets: Option<SheetsConfig>,
    pub sheet_names: SheetNames,
}

/// Google Sheets access.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth bearer token. Optional so a public sheet can be read without one.
    pub token: Option<String>,
    pub max_retries: u32,
}

/// Worksheet titles inside the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub stock: String,
    pub report: String,
    pub people: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            stock: "Stock".to_owned(),
            report: "Report".to_owned(),
            people: "Data Storage".to_owned(),
        }
    }
}

impl AppConfig {
    pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("WORKWEAR_DATABASE_URL").unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.to_owned());

        let bind_addr = var("WORKWEAR_BIND_ADDR")
            .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("WORKWEAR_BIND_ADDR is not a socket address: {bind_addr}"))?;

        let max_retries = match var("WORKWEAR_SHEETS_MAX_RETRIES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("WORKWEAR_SHEETS_MAX_RETRIES is not a number: {raw}"))?,
            None => Self::DEFAULT_MAX_RETRIES,
        };

        let sheets = var("WORKWEAR_SPREADSHEET_ID").map(|spreadsheet_id| SheetsConfig {
            spreadsheet_id,
            token: var("WORKWEAR_SHEETS_TOKEN"),
            max_retries,
        });

        let defaults = SheetNames::default();
        let sheet_names = SheetNames {
            stock: var("WORKWEAR_STOCK_SHEET").unwrap_or(defaults.stock),
            report: var("WORKWEAR_REPORT_SHEET").unwrap_or(defaults.report),
            people: var("WORKWEAR_PEOPLE_SHEET").unwrap_or(defaults.people),
        };

        Ok(Self {
            database_url,
            bind_addr,
            sheets,
            sheet_names,
        })
    }
}
