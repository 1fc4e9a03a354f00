//! Push-style event feed: payload decoding, handler dispatch, and the
//! background listener that ties them to a transport.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod listener;
pub mod source;

pub use envelope::{decode, Event};
pub use error::{DecodeError, FeedError, HandlerFault};
pub use handlers::HandlerRegistry;
pub use listener::{FeedListener, ListenerHandle, ListenerSettings, ListenerState};
pub use source::{ChannelSource, FeedPublisher, FeedSource, RedisSource, SourceStats};
