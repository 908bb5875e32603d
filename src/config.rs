//! Service configuration read from the environment (and `.env` via dotenvy).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::domain::shipping::ShippingTable;
use crate::domain::value_objects::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port (`PORT`, default 8083)
    pub port: u16,
    /// JSON file with the shipping method rows (`SHIPPING_METHODS_PATH`); built-in table when unset
    pub shipping_methods_path: Option<PathBuf>,
    /// Locale used when a request names none (`DEFAULT_LOCALE`, default `vi`)
    pub default_locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8083".to_string())
                .parse()
                .context("Failed to parse PORT as a number")?,
            shipping_methods_path: lookup("SHIPPING_METHODS_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            default_locale: lookup("DEFAULT_LOCALE").map(|l| Locale::parse(&l)).unwrap_or(Locale::Vi),
        })
    }

    pub fn shipping_table(&self) -> Result<ShippingTable> {
        match &self.shipping_methods_path {
            Some(path) => ShippingTable::load(path)
                .with_context(|| format!("Failed to load shipping methods from {}", path.display())),
            None => {
                tracing::info!("SHIPPING_METHODS_PATH not set; using built-in shipping methods");
                Ok(ShippingTable::builtin())
            }
        }
    }
}
