// ABOUTME: Configuration loading and validation for the parklot console.
// ABOUTME: Reads the records path and admin secret from environment variables with defaults.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_RECORDS_PATH: &str = "parking_records.txt";

/// Secret accepted when PARKLOT_ADMIN_SECRET is not set, kept so existing
/// operators are not locked out after an upgrade.
pub const LEGACY_ADMIN_SECRET: &str = "admin123";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PARKLOT_ADMIN_SECRET is set but empty; unset it or provide a non-empty secret")]
    EmptyAdminSecret,

    #[error("PARKLOT_RECORDS is set but empty")]
    EmptyRecordsPath,
}

/// Console configuration.
#[derive(Clone)]
pub struct ParklotConfig {
    pub records_path: PathBuf,
    pub admin_secret: String,
    /// True when the admin secret fell back to `LEGACY_ADMIN_SECRET`.
    pub uses_default_secret: bool,
}

impl fmt::Debug for ParklotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParklotConfig")
            .field("records_path", &self.records_path)
            .field("admin_secret", &"<redacted>")
            .field("uses_default_secret", &self.uses_default_secret)
            .finish()
    }
}

impl ParklotConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - PARKLOT_RECORDS: records file path (default: parking_records.txt)
    /// - PARKLOT_ADMIN_SECRET: admin panel secret (default: legacy secret, with a warning)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let records_path = match lookup("PARKLOT_RECORDS") {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyRecordsPath),
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_RECORDS_PATH),
        };

        let (admin_secret, uses_default_secret) = match lookup("PARKLOT_ADMIN_SECRET") {
            Some(secret) if secret.is_empty() => return Err(ConfigError::EmptyAdminSecret),
            Some(secret) => (secret, false),
            None => (LEGACY_ADMIN_SECRET.to_string(), true),
        };

        Ok(Self {
            records_path,
            admin_secret,
            uses_default_secret,
        })
    }
}
