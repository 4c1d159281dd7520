//! Configuration schema types for Peace.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod presence;
mod system;

pub use presence::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeaceConfig {
    pub presence: PresenceConfig,
    pub logging: LoggingConfig,
}
