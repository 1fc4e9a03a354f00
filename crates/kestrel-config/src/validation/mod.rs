//! Full configuration validation.
//!
//! Validates numeric ranges, required strings, and URL schemes. Each domain
//! has its own submodule; this orchestrator calls them all and collects
//! errors into a single `ConfigError`.

mod helpers;
mod misc;
mod network;


use crate::schema::KestrelConfig;
use kestrel_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &KestrelConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    network::validate_api(&mut errors, config);
    network::validate_feed(&mut errors, config);
    misc::validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
