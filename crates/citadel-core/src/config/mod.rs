//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so a partial file
//! (or no file at all) still yields a usable configuration.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::{SameSitePolicy, SessionConfig};

use crate::error::AppError;

/// Prefix for environment variable overrides (`CITADEL__SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "CITADEL";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifetime and cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay and
    /// environment variables prefixed with `CITADEL__`. Both files are
    /// optional.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from_dir("config", env)
    }

    /// Same as [`AppConfig::load`] but reading from an explicit directory.
    pub fn load_from_dir(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
