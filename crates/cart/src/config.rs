//! Cart engine configuration.
//!
//! The engine itself never touches the environment. Hosts that want to
//! configure it from the process environment call [`CartConfig::from_env`].
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Name of the persistence slot (default: cart)
//! - `CART_CURRENCY_SYMBOL` - Symbol prefixed to displayed amounts (default: $)
//! - `CART_STORAGE_DIR` - Directory for file-backed snapshots
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;

/// Slot name the storefront page script uses in `localStorage`.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Persistence slot holding the serialized line items
    pub storage_key: String,
    /// Prefix for formatted amounts
    pub currency_symbol: String,
    /// Directory for `FileStorage`; `None` keeps snapshots in memory
    pub storage_dir: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            storage_dir: None,
            sentry_dsn: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Every
    /// variable is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CART_STORAGE_KEY` is set but blank or
    /// contains a path separator.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key)
            .map_err(|reason| ConfigError::InvalidEnvVar("CART_STORAGE_KEY".to_string(), reason))?;

        Ok(Self {
            storage_key,
            currency_symbol: get_env_or_default("CART_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL),
            storage_dir: get_optional_env("CART_STORAGE_DIR").map(PathBuf::from),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

/// Check that a slot name is usable both as a map key and as a file stem.
pub(crate) fn validate_storage_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("must not be blank".to_string());
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(format!("{key:?} is not a valid slot name"));
    }
    Ok(())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
