//! Decoding of raw feed payloads into typed events.
//!
//! The wire format is a JSON object with a string `type` field; every other
//! field is carried through untouched in [`Event::data`].

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// A decoded feed event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: String,
    pub data: Map<String, Value>,
}

impl Event {
    pub fn new(kind: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Decode one raw payload.
pub fn decode(raw: &[u8]) -> Result<Event, DecodeError> {
    let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let Value::Object(mut data) = value else {
        return Err(DecodeError::NotAnObject);
    };

    match data.remove("type") {
        Some(Value::String(kind)) => Ok(Event { kind, data }),
        _ => Err(DecodeError::MissingType),
    }
}
