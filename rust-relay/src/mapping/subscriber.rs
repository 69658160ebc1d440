//! Novu subscriber descriptor built from Clerk event data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::context::{as_text, present_at, truthy, truthy_at};

/// Namespace prefix for subscriber ids derived from Clerk identities.
pub const SUBSCRIBER_ID_PREFIX: &str = "clerk_user_";

/// Subscriber id used when the event carries no identity.
pub const DEFAULT_SUBSCRIBER_ID: &str = "default";

/// Recipient passed to Novu as the `to` field of a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub subscriber_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// Derive the subscriber id from `data.id`, `data.user_id` or `data.data.id`,
/// in that order.
pub fn derive_subscriber_id(data: &Value) -> String {
    ["/id", "/user_id", "/data/id"]
        .iter()
        .find_map(|pointer| truthy_at(data, pointer))
        .map(|id| format!("{}{}", SUBSCRIBER_ID_PREFIX, as_text(id)))
        .unwrap_or_else(|| DEFAULT_SUBSCRIBER_ID.to_string())
}

/// Build the subscriber descriptor.
pub fn build_subscriber(subscriber_id: String, email: &str, data: &Value) -> Subscriber {
    let mut clerk_data = Map::new();

    let user_id = truthy_at(data, "/user_id").or_else(|| present_at(data, "/id"));
    let fields = [
        ("clerk_created_at", present_at(data, "/created_at")),
        ("clerk_user_id", user_id),
        ("clerk_organization_id", present_at(data, "/organization_id")),
        ("clerk_organization_role", present_at(data, "/role")),
        ("clerk_updated_at", present_at(data, "/updated_at")),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            clerk_data.insert(key.to_string(), value.clone());
        }
    }

    let public_metadata = data.get("public_metadata");
    let private_metadata = data.get("private_metadata");
    if public_metadata.is_some_and(truthy) || private_metadata.is_some_and(truthy) {
        for (key, value) in [
            ("public_metadata", public_metadata),
            ("private_metadata", private_metadata),
        ] {
            if let Some(value) = value.filter(|v| !v.is_null()) {
                clerk_data.insert(key.to_string(), value.clone());
            }
        }
    }

    Subscriber {
        subscriber_id,
        email: email.to_string(),
        data: (!clerk_data.is_empty()).then_some(clerk_data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscriber_id_priority() {
        let data = json!({ "id": "user_a", "user_id": "user_b", "data": { "id": "user_c" } });
        assert_eq!(derive_subscriber_id(&data), "clerk_user_user_a");

        let data = json!({ "user_id": "user_b", "data": { "id": "user_c" } });
        assert_eq!(derive_subscriber_id(&data), "clerk_user_user_b");

        let data = json!({ "data": { "id": "user_c" } });
        assert_eq!(derive_subscriber_id(&data), "clerk_user_user_c");
    }

    #[test]
    fn test_subscriber_id_skips_null_and_empty() {
        let data = json!({ "id": null, "user_id": "", "data": { "id": "user_c" } });
        assert_eq!(derive_subscriber_id(&data), "clerk_user_user_c");
    }

    #[test]
    fn test_subscriber_id_default() {
        assert_eq!(derive_subscriber_id(&json!({})), DEFAULT_SUBSCRIBER_ID);
        assert_eq!(derive_subscriber_id(&Value::Null), DEFAULT_SUBSCRIBER_ID);
    }

    #[test]
    fn test_subscriber_id_numeric() {
        assert_eq!(derive_subscriber_id(&json!({ "id": 42 })), "clerk_user_42");
    }

    #[test]
    fn test_build_subscriber_omits_missing_keys() {
        let data = json!({
            "id": "user_1",
            "created_at": 1700000000000u64,
            "organization_id": null
        });

        let subscriber = build_subscriber("clerk_user_user_1".into(), "x@example.com", &data);
        let clerk_data = subscriber.data.unwrap();

        assert_eq!(clerk_data.len(), 2);
        assert_eq!(clerk_data["clerk_created_at"], json!(1700000000000u64));
        assert_eq!(clerk_data["clerk_user_id"], json!("user_1"));
        assert!(!clerk_data.contains_key("clerk_organization_id"));
        assert!(clerk_data.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_build_subscriber_prefers_user_id_for_clerk_user_id() {
        let data = json!({ "id": "orgmem_1", "user_id": "user_1", "role": "org:member" });
        let subscriber = build_subscriber("s".into(), "x@example.com", &data);
        let clerk_data = subscriber.data.unwrap();

        assert_eq!(clerk_data["clerk_user_id"], json!("user_1"));
        assert_eq!(clerk_data["clerk_organization_role"], json!("org:member"));
    }

    #[test]
    fn test_build_subscriber_without_data() {
        let subscriber = build_subscriber("default".into(), "x@example.com", &json!({}));

        assert_eq!(subscriber.data, None);
        let json = serde_json::to_value(&subscriber).unwrap();
        assert_eq!(json, json!({ "subscriberId": "default", "email": "x@example.com" }));
    }

    #[test]
    fn test_build_subscriber_merges_metadata() {
        let data = json!({ "public_metadata": { "plan": "pro" } });
        let subscriber = build_subscriber("default".into(), "x@example.com", &data);
        let clerk_data = subscriber.data.unwrap();

        assert_eq!(clerk_data["public_metadata"], json!({ "plan": "pro" }));
        assert!(!clerk_data.contains_key("private_metadata"));
    }

    #[test]
    fn test_build_subscriber_merges_metadata_alongside_fields() {
        let data = json!({
            "id": "user_1",
            "public_metadata": {},
            "private_metadata": { "stripe": "cus_1" }
        });
        let subscriber = build_subscriber("s".into(), "x@example.com", &data);
        let clerk_data = subscriber.data.unwrap();

        assert_eq!(clerk_data["clerk_user_id"], json!("user_1"));
        assert_eq!(clerk_data["public_metadata"], json!({}));
        assert_eq!(clerk_data["private_metadata"], json!({ "stripe": "cus_1" }));
    }
}
