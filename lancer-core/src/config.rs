//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Storage subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file. `None` means in-memory.
    pub path: Option<String>,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: None, busy_timeout_ms: 5_000 }
    }
}

/// Billing-cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Months per billing cycle. The next billing date is always
    /// `start + cycle_months`.
    pub cycle_months: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self { cycle_months: 1 }
    }
}

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarketConfig {
    pub storage: StorageConfig,
    pub billing: BillingConfig,
}

impl MarketConfig {
    /// Load config from a TOML string, falling back to defaults for
    /// missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config = MarketConfig::from_toml("[storage]\nbusy_timeout_ms = 250\n").unwrap();
        assert_eq!(config.storage.busy_timeout_ms, 250);
        assert_eq!(config.billing.cycle_months, 1);
        assert!(config.storage.path.is_none());
    }
}
