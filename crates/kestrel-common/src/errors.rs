use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A resource identifier carried by an event could not be turned into a
/// [`ChatId`](crate::ChatId).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierParseError {
    #[error("identifier field '{0}' is missing")]
    Missing(String),

    #[error("identifier '{0}' is not a positive integer")]
    NotNumeric(String),
}

#[derive(Debug, thiserror::Error)]
pub enum KestrelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Identifier(#[from] IdentifierParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("feed.channel is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: feed.channel is empty"
        );
    }

    #[test]
    fn identifier_error_display() {
        let err = IdentifierParseError::Missing("chatId".into());
        assert_eq!(err.to_string(), "identifier field 'chatId' is missing");

        let err = IdentifierParseError::NotNumeric("abc".into());
        assert_eq!(err.to_string(), "identifier 'abc' is not a positive integer");
    }

    #[test]
    fn kestrel_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: KestrelError = config_err.into();
        assert!(matches!(err, KestrelError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn kestrel_error_from_identifier() {
        let err: KestrelError = IdentifierParseError::NotNumeric("x".into()).into();
        assert!(matches!(err, KestrelError::Identifier(_)));
    }

    #[test]
    fn kestrel_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: KestrelError = io_err.into();
        assert!(matches!(err, KestrelError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn kestrel_error_other_variants() {
        let err = KestrelError::Feed("redis unreachable".into());
        assert_eq!(err.to_string(), "feed error: redis unreachable");

        let err = KestrelError::Api("HTTP 500".into());
        assert_eq!(err.to_string(), "api error: HTTP 500");

        let err = KestrelError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
