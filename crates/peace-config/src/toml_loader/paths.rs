//! Config file location and first-run template.

use std::path::{Path, PathBuf};

use peace_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "peace";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/peace/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write the commented template to `path`, creating parent directories.
pub(crate) fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_error = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_error)?;
    }
    std::fs::write(path, default_config_toml()).map_err(io_error)
}
