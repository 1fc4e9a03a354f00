//! Kestrel configuration system.
//!
//! TOML-based configuration with full validation. Every section uses serde
//! defaults, so a partial file (or no file at all) works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kestrel_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("feed channel: {}", config.feed.channel);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::KestrelConfig;

use std::path::Path;

use kestrel_common::ConfigError;

/// Load config from the platform default path, creating a commented default
/// file when none exists, and validate the result.
pub fn load_config() -> Result<KestrelConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<KestrelConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(Path::new("/tmp/kestrel-does-not-exist/config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feed]\npoll_timeout_ms = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("feed.poll_timeout_ms"));
    }
}
