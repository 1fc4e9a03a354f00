pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, IdentifierParseError, KestrelError};
pub use id::{ChatId, SessionId};
pub use types::{Chat, Message};
