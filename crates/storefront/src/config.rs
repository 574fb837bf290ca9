//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_API_URL` - Catalog service base URL (default: `http://localhost:3333`)
//! - `CATALOG_CACHE_TTL_SECS` - Product cache TTL in seconds, 0 disables (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout in seconds (default: none)
//! - `CART_STORAGE_DIR` - Directory for the persisted cart (default: `.rocketshoes`)
//! - `CART_STORAGE_KEY` - Storage key for the cart snapshot (default: `@RocketShoes:cart`)
//! - `CART_CURRENCY` - Currency used to display prices (default: BRL)

use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use thiserror::Error;
use url::Url;

use crate::storage::CART_STORAGE_KEY;

const DEFAULT_CATALOG_API_URL: &str = "http://localhost:3333";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Local cart persistence configuration
    pub storage: StorageConfig,
    /// Currency for price display
    pub currency: CurrencyCode,
}

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog REST service
    pub api_url: Url,
    /// How long product records stay cached (`None` disables caching)
    pub cache_ttl: Option<Duration>,
    /// Per-request timeout (`None` waits indefinitely)
    pub timeout: Option<Duration>,
}

/// Local cart persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding persisted snapshots
    pub dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub key: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let api_url = Url::parse(&vars.or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL))
            .map_err(|e| invalid("CATALOG_API_URL", e))?;
        let cache_ttl = match vars.parse_optional::<u64>("CATALOG_CACHE_TTL_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
        };
        let timeout = vars
            .parse_optional::<u64>("CATALOG_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        let storage = StorageConfig {
            dir: PathBuf::from(vars.or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            key: vars.or_default("CART_STORAGE_KEY", CART_STORAGE_KEY),
        };

        let currency = vars
            .get("CART_CURRENCY")
            .map(|value| value.parse::<CurrencyCode>())
            .transpose()
            .map_err(|e| invalid("CART_CURRENCY", e))?
            .unwrap_or_default();

        Ok(Self {
            catalog: CatalogConfig {
                api_url,
                cache_ttl,
                timeout,
            },
            storage,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an optional variable.
    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| value.trim().parse::<T>().map_err(|e| invalid(key, e)))
            .transpose()
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog.api_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.catalog.cache_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.catalog.timeout, None);
        assert_eq!(config.storage.dir, PathBuf::from(".rocketshoes"));
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.currency, CurrencyCode::BRL);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CATALOG_API_URL", "https://catalog.example.com/api"),
            ("CATALOG_CACHE_TTL_SECS", "60"),
            ("CATALOG_TIMEOUT_SECS", "5"),
            ("CART_STORAGE_DIR", "/tmp/carts"),
            ("CART_STORAGE_KEY", "@Test:cart"),
            ("CART_CURRENCY", "usd"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog.api_url.as_str(),
            "https://catalog.example.com/api"
        );
        assert_eq!(config.catalog.cache_ttl, Some(Duration::from_secs(60)));
        assert_eq!(config.catalog.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage.key, "@Test:cart");
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = load(&[("CATALOG_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.catalog.cache_ttl, None);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("CATALOG_API_URL", "  "), ("CART_CURRENCY", "")]).unwrap();
        assert_eq!(config.catalog.api_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.currency, CurrencyCode::BRL);
    }

    #[test]
    fn test_invalid_url() {
        let err = load(&[("CATALOG_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_API_URL"));
    }

    #[test]
    fn test_invalid_ttl() {
        let err = load(&[("CATALOG_CACHE_TTL_SECS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_invalid_currency() {
        let err = load(&[("CART_CURRENCY", "XYZ")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable CART_CURRENCY: unsupported currency: XYZ"
        );
    }
}
