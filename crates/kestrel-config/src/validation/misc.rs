//! Validation for the session section.

use crate::schema::KestrelConfig;

use super::helpers::validate_range;

/// Validate session constraints.
pub(crate) fn validate_session(errors: &mut Vec<String>, config: &KestrelConfig) {
    validate_range(
        errors,
        "session.shutdown_grace_ms",
        config.session.shutdown_grace_ms,
        0,
        60_000,
    );
}
