//! Validation for the API and feed sections.

use crate::schema::KestrelConfig;

use super::helpers::{validate_not_empty, validate_range, validate_scheme};

/// Validate API constraints.
pub(crate) fn validate_api(errors: &mut Vec<String>, config: &KestrelConfig) {
    validate_not_empty(errors, "api.base_url", &config.api.base_url);
    validate_scheme(
        errors,
        "api.base_url",
        &config.api.base_url,
        &["http://", "https://"],
    );
    validate_range(
        errors,
        "api.connect_timeout_secs",
        config.api.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "api.request_timeout_secs",
        config.api.request_timeout_secs,
        1,
        600,
    );
}

/// Validate feed constraints.
pub(crate) fn validate_feed(errors: &mut Vec<String>, config: &KestrelConfig) {
    let feed = &config.feed;
    validate_not_empty(errors, "feed.redis_url", &feed.redis_url);
    validate_scheme(
        errors,
        "feed.redis_url",
        &feed.redis_url,
        &["redis://", "rediss://", "redis+unix://", "unix://"],
    );
    validate_not_empty(errors, "feed.channel", &feed.channel);
    validate_range(errors, "feed.poll_timeout_ms", feed.poll_timeout_ms, 10, 60_000);
    validate_range(
        errors,
        "feed.reconnect_delay_secs",
        feed.reconnect_delay_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "feed.connect_timeout_secs",
        feed.connect_timeout_secs,
        1,
        120,
    );
    if feed.reconnect_delay_secs > feed.max_reconnect_delay_secs {
        errors.push(format!(
            "feed.reconnect_delay_secs = {} exceeds feed.max_reconnect_delay_secs = {}",
            feed.reconnect_delay_secs, feed.max_reconnect_delay_secs
        ));
    }
}
