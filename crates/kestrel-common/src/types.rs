use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::id::ChatId;

/// A chat as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
    /// Whether the current user is a member. Not sent by the backend; set by
    /// the list call that produced the entry.
    #[serde(default)]
    pub joined: bool,
}

impl fmt::Display for Chat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// One message in a chat's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sent_by: String,
    /// Unix timestamp in seconds.
    #[serde(deserialize_with = "unix_seconds")]
    pub sent_at: i64,
    pub content: String,
}

/// The backend stores `sent_at` as an integer but some drivers hand it back
/// as a string.
fn unix_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) => Ok(v as i64),
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid sent_at '{s}': {e}"))),
    }
}
