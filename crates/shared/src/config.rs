//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Currency new accounts are denominated in.
    #[serde(default)]
    pub default_currency: Currency,
    /// Sort code stamped on new accounts (single-branch system).
    #[serde(default = "default_sort_code")]
    pub sort_code: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            sort_code: default_sort_code(),
        }
    }
}

fn default_sort_code() -> String {
    "10-10-10".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("OSPREY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.default_currency, Currency::Gbp);
        assert_eq!(config.ledger.sort_code, "10-10-10");
    }
}
