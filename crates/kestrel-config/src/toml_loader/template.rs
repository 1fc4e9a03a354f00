//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Kestrel Configuration
# Only override what you want to change -- missing fields use defaults.

[api]
# base_url = "http://localhost:8080"
# connect_timeout_secs = 10     # 1-120
# request_timeout_secs = 30     # 1-600

[feed]
# redis_url = "redis://localhost:6379"
# channel = "php-chat"
# poll_timeout_ms = 1000        # 10-60000, also the stop latency
# reconnect_delay_secs = 1
# max_reconnect_delay_secs = 30
# connect_timeout_secs = 10     # 1-120, connect + subscribe

[session]
# shutdown_grace_ms = 2000      # 0-60000

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
