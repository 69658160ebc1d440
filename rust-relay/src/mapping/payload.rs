//! Novu trigger payload shaping.

use serde_json::{json, Map, Value};

use super::context::{as_text, truthy, truthy_at, EventContext};
use super::MappingOptions;

/// Build the notification payload for an event.
///
/// Every payload carries `appLogo`; `app.name` is added when the organization
/// name is known. A few event types add their own fields on top.
pub fn build_payload(
    event_type: &str,
    data: &Value,
    context: &EventContext,
    options: &MappingOptions,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("appLogo".to_string(), json!(options.app_logo_url));

    if let Some(name) = &context.organization_name {
        payload.insert("app".to_string(), json!({ "name": name }));
    }

    match event_type {
        "organizationInvitation.created" => {
            shape_invitation(&mut payload, data, context, options)
        }
        "session.created" | "session.pending" => shape_session(&mut payload, data),
        "waitlistEntry.created" | "waitlistEntry.updated" => shape_waitlist(&mut payload, context),
        _ => {}
    }

    payload
}

fn shape_invitation(
    payload: &mut Map<String, Value>,
    data: &Value,
    context: &EventContext,
    options: &MappingOptions,
) {
    if let Some(inviter_email) = &context.inviter_email {
        payload.insert(
            "escapeURIs_inviter_name".to_string(),
            json!(encode_uri_component(&as_text(inviter_email))),
        );
        payload.insert("inviter_name".to_string(), inviter_email.clone());
    }

    if let Some(id) = truthy_at(data, "/id") {
        let action_url = format!(
            "{}/accept-invite?token={}",
            options.after_sign_in_url,
            as_text(id)
        );
        payload.insert("action_url".to_string(), json!(action_url));
    }
}

fn shape_session(payload: &mut Map<String, Value>, data: &Value) {
    for field in [
        "requested_at",
        "requested_by",
        "requested_from",
        "ttl_minutes",
        "magic_link",
    ] {
        if let Some(value) = data.get(field).filter(|v| truthy(v)) {
            payload.insert(field.to_string(), value.clone());
        }
    }

    if let Some(public_metadata) = truthy_at(data, "/user/public_metadata") {
        payload.insert(
            "user".to_string(),
            json!({ "public_metadata": public_metadata }),
        );
    }
}

fn shape_waitlist(payload: &mut Map<String, Value>, context: &EventContext) {
    let Some(domain) = &context.domain else {
        return;
    };
    let domain = as_text(domain);

    let app = payload
        .entry("app")
        .or_insert_with(|| Value::Object(Map::new()));
    if !app.is_object() {
        *app = Value::Object(Map::new());
    }
    if let Value::Object(app) = app {
        app.insert("url".to_string(), json!(format!("https://{}", domain)));
        app.insert("domain_name".to_string(), json!(domain));
    }
}

/// Percent-encode text the way JavaScript's `encodeURIComponent` does.
///
/// Letters, digits and `-_.!~*'()` are left as-is.
pub fn encode_uri_component(input: &str) -> String {
    urlencoding::encode(input)
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}
