//! # Configuration State
//!
//! Register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FARMSTAND_*`)
//! 2. Defaults (this file)
//!
//! Read-only after startup.

use serde::Serialize;
use std::path::PathBuf;

use farmstand_core::Money;

const ENV_STORE_NAME: &str = "FARMSTAND_STORE_NAME";
const ENV_CURRENCY_SYMBOL: &str = "FARMSTAND_CURRENCY_SYMBOL";
const ENV_DB_PATH: &str = "FARMSTAND_DB_PATH";

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the banner and on receipts)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Explicit database file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Farmstand"
    /// - Currency: `$`
    /// - Database: platform data directory
    fn default() -> Self {
        ConfigState {
            store_name: "Farmstand".to_string(),
            currency_symbol: "$".to_string(),
            db_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FARMSTAND_STORE_NAME`: Override store name
    /// - `FARMSTAND_CURRENCY_SYMBOL`: Override currency symbol
    /// - `FARMSTAND_DB_PATH`: Use this database file (`:memory:` for a
    ///   throwaway session)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(store_name) = value(ENV_STORE_NAME) {
            config.store_name = store_name.trim().to_string();
        }

        if let Some(symbol) = value(ENV_CURRENCY_SYMBOL) {
            config.currency_symbol = symbol.trim().to_string();
        }

        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use farmstand_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        Money::from_cents(cents).format_with_symbol(&self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("FARMSTAND_STORE_NAME", "Hillside Farm"),
            ("FARMSTAND_CURRENCY_SYMBOL", "€"),
            ("FARMSTAND_DB_PATH", ":memory:"),
        ]));

        assert_eq!(config.store_name, "Hillside Farm");
        assert_eq!(config.format_currency(950), "€9.50");
        assert_eq!(config.db_path, Some(PathBuf::from(":memory:")));
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config = ConfigState::from_lookup(lookup_from(&[("FARMSTAND_STORE_NAME", "  ")]));
        assert_eq!(config, ConfigState::default());
    }
}
