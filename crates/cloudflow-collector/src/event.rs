// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ParseError;

/// Credential field stripped from every event before it is persisted or
/// displayed.
pub const SESSION_TOKEN_KEY: &str = "SessionToken";

/// One sanitized monitoring event: the key/value fields of the original
/// JSON payload, minus the session token.
///
/// Serializing an `Event` produces the canonical single-line form written
/// to the append log: compact JSON with keys in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Looks up a field by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Number of fields left after sanitization.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Turns a raw datagram payload into a sanitized [`Event`].
///
/// The payload is decoded as UTF-8 and trimmed of surrounding whitespace.
/// A payload that trims to nothing is not an error; it yields `Ok(None)`
/// and the caller skips it. Everything else must be a single JSON object,
/// from which the session token field (if present) is removed.
///
/// Sanitizing is idempotent: feeding a serialized `Event` back through
/// returns an equal `Event`.
pub fn sanitize(payload: &[u8]) -> Result<Option<Event>, ParseError> {
    let text = std::str::from_utf8(payload)?.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let mut fields = match serde_json::from_str(text)? {
        Value::Object(fields) => fields,
        other => return Err(ParseError::NotAnObject(json_kind(&other))),
    };
    fields.remove(SESSION_TOKEN_KEY);
    Ok(Some(Event { fields }))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
