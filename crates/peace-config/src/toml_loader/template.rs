//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Peace Configuration
# Only override what you want to change -- missing fields use defaults.

[presence]
# server_url = "ws://localhost:8081/ws"   # overridden by PEACE_WS_URL
# auth_scheme = "bearer"
# token_key = "access_token"
# cookie_file = ""                        # overridden by PEACE_COOKIE_FILE
# heartbeat_interval = 10                 # 1-300 s, while visible
# hidden_heartbeat_interval = 30          # 1-600 s, while hidden
# count_poll_interval = 30                # 1-600 s, visible only
# token_check_interval = 10               # 1-300 s
# connect_timeout = 15                    # 1-120 s

[presence.reconnect]
# base_delay_ms = 2000
# max_delay_ms = 30000
# jitter_ms = 1000
# max_attempt = 10                        # 0-20

[logging]
# level = "INFO"                          # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
