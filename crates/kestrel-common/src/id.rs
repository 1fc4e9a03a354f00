use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::IdentifierParseError;

/// Stable identifier of a chat, shared by the API, the event feed, and views.
///
/// Always positive; zero is rejected by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ChatId(u64);

impl ChatId {
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Extract an id from a JSON field.
    ///
    /// Accepts integer numbers, integral floats, and integer strings
    /// (`42`, `42.0`, `"42"`).
    pub fn from_field(
        data: &serde_json::Map<String, serde_json::Value>,
        field: &str,
    ) -> Result<Self, IdentifierParseError> {
        match data.get(field) {
            None | Some(serde_json::Value::Null) => {
                Err(IdentifierParseError::Missing(field.to_string()))
            }
            Some(value) => Self::from_value(value),
        }
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, IdentifierParseError> {
        let not_numeric = || IdentifierParseError::NotNumeric(value.to_string());
        match value {
            serde_json::Value::Number(n) => {
                let raw = match n.as_u64() {
                    Some(raw) => raw,
                    None => match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f > 0.0 && f < u64::MAX as f64 => {
                            f as u64
                        }
                        _ => return Err(not_numeric()),
                    },
                };
                Self::new(raw).ok_or_else(not_numeric)
            }
            serde_json::Value::String(s) => s.parse(),
            _ => Err(not_numeric()),
        }
    }
}

impl FromStr for ChatId {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| IdentifierParseError::NotNumeric(s.to_string()))
    }
}

impl TryFrom<u64> for ChatId {
    type Error = IdentifierParseError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| IdentifierParseError::NotNumeric(raw.to_string()))
    }
}

impl From<ChatId> for u64 {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one client session in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
