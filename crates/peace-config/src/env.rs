//! Environment overrides applied on top of the file config.

use crate::schema::PeaceConfig;
use tracing::debug;

/// Overrides `presence.server_url`.
pub const WS_URL_ENV: &str = "PEACE_WS_URL";
/// Overrides `presence.cookie_file`.
pub const COOKIE_FILE_ENV: &str = "PEACE_COOKIE_FILE";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut PeaceConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` in place of the process environment.
/// Empty values are ignored.
pub fn apply_overrides_from<F>(config: &mut PeaceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(WS_URL_ENV) {
        debug!(var = WS_URL_ENV, "server url overridden from environment");
        config.presence.server_url = url;
    }
    if let Some(path) = get(COOKIE_FILE_ENV) {
        debug!(var = COOKIE_FILE_ENV, "cookie file overridden from environment");
        config.presence.cookie_file = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn url_override_replaces_default() {
        let mut config = PeaceConfig::default();
        apply_overrides_from(&mut config, lookup(&[(WS_URL_ENV, "wss://prod/ws")]));
        assert_eq!(config.presence.server_url, "wss://prod/ws");
    }

    #[test]
    fn cookie_file_override() {
        let mut config = PeaceConfig::default();
        apply_overrides_from(&mut config, lookup(&[(COOKIE_FILE_ENV, "/tmp/cookies")]));
        assert_eq!(config.presence.cookie_file, "/tmp/cookies");
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut config = PeaceConfig::default();
        apply_overrides_from(&mut config, lookup(&[(WS_URL_ENV, "  ")]));
        assert_eq!(config.presence.server_url, "ws://localhost:8081/ws");
    }

    #[test]
    fn no_overrides_leaves_config_untouched() {
        let mut config = PeaceConfig::default();
        config.presence.server_url = "ws://file/ws".into();
        apply_overrides_from(&mut config, lookup(&[]));
        assert_eq!(config.presence.server_url, "ws://file/ws");
        assert!(config.presence.cookie_file.is_empty());
    }
}
