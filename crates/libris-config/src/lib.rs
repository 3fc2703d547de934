//! # libris-config
//!
//! Layered configuration loading for Libris using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LIBRIS_*` prefix, `__` as separator)
//! 2. Project-level `.libris/config.toml`
//! 3. User-level `~/.config/libris/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LIBRIS_DATABASE__PATH` -> `database.path`,
//! `LIBRIS_LEDGER__DIR` -> `ledger.dir`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use libris_config::LibrisConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = LibrisConfig::load_with_dotenv().expect("config");
//!
//! println!("Database at: {}", config.database.path);
//! if config.ledger.is_enabled() {
//!     println!("Ledger at: {}", config.ledger.dir);
//! }
//! ```

mod database;
mod error;
mod general;
mod ledger;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use ledger::LedgerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibrisConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LibrisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`LIBRIS_*` prefix)
    /// 2. `.libris/config.toml` (project-local)
    /// 3. `~/.config/libris/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".libris/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("LIBRIS_").split("__"));

        figment
    }

    /// Check cross-field rules that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("libris").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}
