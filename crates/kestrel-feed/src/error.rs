use crate::listener::ListenerState;

/// A raw feed payload could not be turned into an [`Event`](crate::Event).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no string 'type' field")]
    MissingType,
}

/// A registered handler reported failure or panicked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerFault {
    #[error("handler failed: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerFault {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("subscription to '{channel}' failed: {reason}")]
    Subscribe { channel: String, reason: String },

    #[error("feed transport error: {0}")]
    Transport(String),

    #[error("listener cannot start from state {0:?}")]
    InvalidState(ListenerState),
}

impl From<FeedError> for kestrel_common::KestrelError {
    fn from(err: FeedError) -> Self {
        kestrel_common::KestrelError::Feed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_error_display() {
        let err = FeedError::Subscribe {
            channel: "php-chat".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "subscription to 'php-chat' failed: connection refused"
        );

        let err = FeedError::InvalidState(ListenerState::Closed);
        assert_eq!(err.to_string(), "listener cannot start from state Closed");
    }

    #[test]
    fn feed_error_into_kestrel_error() {
        let err: kestrel_common::KestrelError = FeedError::Transport("reset".into()).into();
        assert_eq!(err.to_string(), "feed error: feed transport error: reset");
    }

    #[test]
    fn handler_fault_display() {
        assert_eq!(
            HandlerFault::failed("no view").to_string(),
            "handler failed: no view"
        );
    }
}
