//! Extraction of field-level validation errors from server error bodies.
//!
//! The trading server reports form errors as
//! `{"errors": {"children": {"<field>": {"errors": ["message", ...]}}}}`.
//! Bodies of any other shape yield `None`.

use serde_json::Value;

/// Separator used when several messages are shown under one input
pub const MESSAGE_SEPARATOR: &str = "<br>";

/// Messages the server attached to `field`, if the body has that shape and
/// lists at least one message
pub fn field_messages(body: &Value, field: &str) -> Option<Vec<String>> {
    let messages: Vec<String> = body
        .get("errors")?
        .get("children")?
        .get(field)?
        .get("errors")?
        .as_array()?
        .iter()
        .filter_map(|m| m.as_str().map(str::to_string))
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}

/// Messages for `field` joined into a single inline error
pub fn joined_field_error(body: &Value, field: &str) -> Option<String> {
    field_messages(body, field).map(|messages| messages.join(MESSAGE_SEPARATOR))
}
