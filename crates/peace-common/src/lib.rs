pub mod errors;

pub use errors::{ConfigError, PeaceError, TransportError};

pub type Result<T> = std::result::Result<T, PeaceError>;
