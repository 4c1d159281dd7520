//! Peace configuration system.
//!
//! TOML-based configuration for the presence client. All sections use
//! defaults so partial configs work out of the box. Settings are layered:
//! file, then environment, then whatever the caller applies last (usually
//! command-line flags). Validation runs once, on the merged result.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use peace_config::load_config;
//!
//! let config = load_config(None, |_| {}).expect("failed to load config");
//! println!("{}", config.presence.server_url);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, apply_overrides_from, COOKIE_FILE_ENV, WS_URL_ENV};
pub use schema::{LogLevel, LoggingConfig, PeaceConfig, PresenceConfig, ReconnectConfig};

use peace_common::ConfigError;
use std::path::Path;

/// Load the merged config.
///
/// Reads `path` (which must exist) or the platform default file (created on
/// first run), applies environment overrides, then `overrides`, and validates
/// the result.
pub fn load_config<F>(path: Option<&Path>, overrides: F) -> Result<PeaceConfig, ConfigError>
where
    F: FnOnce(&mut PeaceConfig),
{
    load_layered(path, apply_env_overrides, overrides)
}

fn load_layered<E, F>(
    path: Option<&Path>,
    env: E,
    overrides: F,
) -> Result<PeaceConfig, ConfigError>
where
    E: FnOnce(&mut PeaceConfig),
    F: FnOnce(&mut PeaceConfig),
{
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    env(&mut config);
    overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}
