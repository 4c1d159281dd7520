//! TOML config file loading and first-run creation.

mod loader;
mod paths;
mod template;


pub use loader::{load_default, load_from_path};
pub use paths::default_config_path;
