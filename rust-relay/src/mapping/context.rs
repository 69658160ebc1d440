//! Optional context fields pulled out of Clerk event data.
//!
//! Clerk does not share one schema across event types, so every read goes
//! through a JSON pointer and tolerates missing intermediate objects.

use serde::Serialize;
use serde_json::Value;

/// Context extracted from an event body. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter_email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Value>,
}

impl EventContext {
    /// Extract the context fields from `data`.
    pub fn extract(data: &Value) -> Self {
        EventContext {
            organization_id: truthy_at(data, "/organization/id")
                .or_else(|| truthy_at(data, "/organization_id"))
                .cloned(),
            organization_name: truthy_at(data, "/organization/name").cloned(),
            user_id: truthy_at(data, "/user/id")
                .or_else(|| truthy_at(data, "/user_id"))
                .cloned(),
            user_email: truthy_at(data, "/user/email_addresses/0/email_address").cloned(),
            role_key: truthy_at(data, "/role/key").cloned(),
            permission_key: truthy_at(data, "/permission/key").cloned(),
            session_id: truthy_at(data, "/session/id").cloned(),
            invitation_id: truthy_at(data, "/invitation/id").cloned(),
            inviter_email: truthy_at(data, "/inviter/email_addresses/0/email_address").cloned(),
            domain: truthy_at(data, "/domain/name").cloned(),
        }
    }
}

/// Whether a JSON value counts as set: not null, false, zero or empty text.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Value at `pointer` when it is truthy.
pub fn truthy_at<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    data.pointer(pointer).filter(|v| truthy(v))
}

/// Value at `pointer` when it exists and is not null.
pub fn present_at<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    data.pointer(pointer).filter(|v| !v.is_null())
}

/// Render a value for string interpolation. Strings are used without quotes.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
