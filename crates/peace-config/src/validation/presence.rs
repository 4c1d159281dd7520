//! Presence and reconnect validators.

use super::helpers::{validate_non_empty, validate_range};
use crate::schema::PeaceConfig;

/// Validate presence connection settings.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &PeaceConfig) {
    let p = &config.presence;

    validate_non_empty(errors, "presence.server_url", &p.server_url);
    if !p.server_url.trim().is_empty()
        && !(p.server_url.starts_with("ws://") || p.server_url.starts_with("wss://"))
    {
        errors.push(format!(
            "presence.server_url = {:?} must use ws:// or wss://",
            p.server_url
        ));
    }
    validate_non_empty(errors, "presence.auth_scheme", &p.auth_scheme);
    validate_non_empty(errors, "presence.token_key", &p.token_key);

    validate_range(errors, "presence.heartbeat_interval", p.heartbeat_interval, 1, 300);
    validate_range(
        errors,
        "presence.hidden_heartbeat_interval",
        p.hidden_heartbeat_interval,
        1,
        600,
    );
    validate_range(
        errors,
        "presence.count_poll_interval",
        p.count_poll_interval,
        1,
        600,
    );
    validate_range(
        errors,
        "presence.token_check_interval",
        p.token_check_interval,
        1,
        300,
    );
    validate_range(errors, "presence.connect_timeout", p.connect_timeout, 1, 120);
}

/// Validate reconnect backoff settings.
pub(crate) fn validate_reconnect(errors: &mut Vec<String>, config: &PeaceConfig) {
    let r = &config.presence.reconnect;

    validate_range(
        errors,
        "presence.reconnect.base_delay_ms",
        r.base_delay_ms,
        1,
        60_000,
    );
    validate_range(
        errors,
        "presence.reconnect.max_delay_ms",
        r.max_delay_ms,
        1,
        600_000,
    );
    validate_range(errors, "presence.reconnect.jitter_ms", r.jitter_ms, 0, 60_000);
    validate_range(errors, "presence.reconnect.max_attempt", r.max_attempt, 0, 20);

    if r.base_delay_ms > r.max_delay_ms {
        errors.push(format!(
            "presence.reconnect.base_delay_ms = {} exceeds max_delay_ms = {}",
            r.base_delay_ms, r.max_delay_ms
        ));
    }
}
