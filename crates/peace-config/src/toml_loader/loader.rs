//! Reading the config file, and seeding it on first run.

use std::io::ErrorKind;
use std::path::Path;

use peace_common::ConfigError;
use tracing::{debug, info};

use crate::schema::PeaceConfig;

use super::paths::{default_config_path, write_template};

/// Parse the TOML file at `path`. Absent keys take their defaults. Values
/// are not range-checked here; see [`crate::validation::validate`].
pub fn load_from_path(path: &Path) -> Result<PeaceConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let config = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "Config file read");
    Ok(config)
}

/// Read the file at the platform default path.
///
/// On Linux this is `~/.config/peace/config.toml`; on macOS
/// `~/Library/Application Support/peace/config.toml`.
pub fn load_default() -> Result<PeaceConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}

/// Read `path`, writing the commented template there first when it does not
/// exist. A freshly written file yields the defaults.
pub(crate) fn load_or_create(path: &Path) -> Result<PeaceConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            write_template(path)?;
            info!(path = %path.display(), "Wrote default config");
            Ok(PeaceConfig::default())
        }
        loaded => loaded,
    }
}
