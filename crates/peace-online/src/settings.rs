//! Turn file configuration into runtime settings.

use std::sync::Arc;
use std::time::Duration;

use peace_presence::{BackoffPolicy, CookieFile, CookieJar, TokenSource};
use tracing::{info, warn};

fn secs(value: u32) -> Duration {
    Duration::from_secs(u64::from(value))
}

fn millis(value: u32) -> Duration {
    Duration::from_millis(u64::from(value))
}

pub fn presence_config(config: &peace_config::PresenceConfig) -> peace_presence::PresenceConfig {
    let reconnect = &config.reconnect;
    peace_presence::PresenceConfig {
        url: config.server_url.clone(),
        auth_scheme: config.auth_scheme.clone(),
        token_key: config.token_key.clone(),
        heartbeat_visible: secs(config.heartbeat_interval),
        heartbeat_hidden: secs(config.hidden_heartbeat_interval),
        count_poll: secs(config.count_poll_interval),
        token_watch: secs(config.token_check_interval),
        connect_timeout: secs(config.connect_timeout),
        backoff: BackoffPolicy {
            base: millis(reconnect.base_delay_ms),
            max: millis(reconnect.max_delay_ms),
            jitter: millis(reconnect.jitter_ms),
            max_attempt: reconnect.max_attempt,
        },
    }
}

/// Where the access token comes from: an explicit token, then the cookie
/// file, otherwise an empty jar (the manager reports it as unavailable).
pub fn token_source(
    config: &peace_config::PresenceConfig,
    token: Option<&str>,
) -> Arc<dyn TokenSource> {
    if let Some(token) = token {
        info!("Using access token from the command line");
        return Arc::new(CookieJar::with(&config.token_key, token));
    }
    if !config.cookie_file.is_empty() {
        info!(path = %config.cookie_file, "Reading access token from cookie file");
        return Arc::new(CookieFile::new(&config.cookie_file));
    }
    warn!("No token or cookie file configured");
    Arc::new(CookieJar::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_intervals_and_backoff() {
        let mut file = peace_config::PresenceConfig::default();
        file.heartbeat_interval = 5;
        file.reconnect.base_delay_ms = 500;
        file.reconnect.jitter_ms = 0;

        let settings = presence_config(&file);
        assert_eq!(settings.url, "ws://localhost:8081/ws");
        assert_eq!(settings.heartbeat_visible, Duration::from_secs(5));
        assert_eq!(settings.heartbeat_hidden, Duration::from_secs(30));
        assert_eq!(settings.count_poll, Duration::from_secs(30));
        assert_eq!(settings.token_watch, Duration::from_secs(10));
        assert_eq!(settings.connect_timeout, Duration::from_secs(15));
        assert_eq!(settings.backoff.base, Duration::from_millis(500));
        assert_eq!(settings.backoff.max, Duration::from_secs(30));
        assert_eq!(settings.backoff.jitter, Duration::ZERO);
        assert_eq!(settings.backoff.max_attempt, 10);
    }

    #[test]
    fn defaults_match_runtime_defaults() {
        let settings = presence_config(&peace_config::PresenceConfig::default());
        let runtime = peace_presence::PresenceConfig::default();
        assert_eq!(settings.url, runtime.url);
        assert_eq!(settings.heartbeat_visible, runtime.heartbeat_visible);
        assert_eq!(settings.heartbeat_hidden, runtime.heartbeat_hidden);
        assert_eq!(settings.backoff, runtime.backoff);
    }

    #[test]
    fn explicit_token_wins() {
        let mut file = peace_config::PresenceConfig::default();
        file.cookie_file = "/nonexistent/cookies".into();
        let source = token_source(&file, Some("tok-A"));
        assert_eq!(source.token("access_token").as_deref(), Some("tok-A"));
    }

    #[test]
    fn no_token_and_no_file_yields_nothing() {
        let source = token_source(&peace_config::PresenceConfig::default(), None);
        assert_eq!(source.token("access_token"), None);
    }

    #[test]
    fn cookie_file_is_used_when_set() {
        let mut file = peace_config::PresenceConfig::default();
        file.cookie_file = "/nonexistent/cookies".into();
        let source = token_source(&file, None);
        assert_eq!(source.token("access_token"), None);
    }
}
