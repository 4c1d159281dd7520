use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no platform config directory")]
    NoConfigDir,
}

/// Failures while establishing a presence connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection request could not be built (bad URL, token that is not
    /// a valid header value). Never retried automatically.
    #[error("invalid connection request: {0}")]
    InvalidRequest(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("connection timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl TransportError {
    /// Whether the reconnect policy should handle this failure.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PeaceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal I/O in the host (stdin, signal handling).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("presence.heartbeat_interval".into());
        assert_eq!(
            err.to_string(),
            "config validation error: presence.heartbeat_interval"
        );

        let err = ConfigError::Io {
            path: PathBuf::from("/etc/peace/config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "config file /etc/peace/config.toml: denied");

        assert_eq!(
            ConfigError::NoConfigDir.to_string(),
            "no platform config directory"
        );
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::InvalidRequest("relative URL without a base".into());
        assert_eq!(
            err.to_string(),
            "invalid connection request: relative URL without a base"
        );

        let err = TransportError::Connect("connection refused".into());
        assert_eq!(err.to_string(), "connection failed: connection refused");

        let err = TransportError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "connection timed out after 15s");
    }

    #[test]
    fn only_invalid_requests_are_not_retryable() {
        assert!(!TransportError::InvalidRequest("bad".into()).is_retryable());
        assert!(TransportError::Connect("refused".into()).is_retryable());
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn peace_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: PeaceError = config_err.into();
        assert!(matches!(err, PeaceError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn peace_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PeaceError = io_err.into();
        assert!(matches!(err, PeaceError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
