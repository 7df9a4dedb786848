//! Parsed event values

use crate::tag::EventTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// The `webhook` block the platform wraps around every event body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInfo {
    /// Webhook definition ID on the platform
    #[serde(default)]
    pub id: Option<i64>,

    /// Webhook definition name
    #[serde(default)]
    pub name: Option<String>,

    /// Event type name as sent
    #[serde(default)]
    pub webhook_event: Option<String>,

    /// Milliseconds since the epoch, when the platform provides it
    #[serde(default)]
    pub event_timestamp: Option<i64>,
}

impl WebhookInfo {
    /// Read the block from a decoded payload, if it has the envelope shape.
    ///
    /// Fields are read one at a time; a field with an unexpected type is
    /// left out without discarding the others.
    pub(crate) fn from_envelope(root: &Value) -> Option<Self> {
        if !is_envelope(root) {
            return None;
        }
        let block = &root["webhook"];

        Some(Self {
            id: int_field(block, "id"),
            name: str_field(block, "name"),
            webhook_event: str_field(block, "webhookEvent"),
            event_timestamp: int_field(block, "eventTimestamp"),
        })
    }
}

/// Integer metadata, also accepted as a numeric string
fn int_field(block: &Value, key: &str) -> Option<i64> {
    let value = block.get(key).filter(|v| !v.is_null())?;
    let parsed = value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()));
    if parsed.is_none() {
        debug!(field = key, value = %value, "Ignoring webhook metadata field");
    }
    parsed
}

fn str_field(block: &Value, key: &str) -> Option<String> {
    let value = block.get(key).filter(|v| !v.is_null())?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => {
            debug!(field = key, value = %value, "Ignoring webhook metadata field");
            None
        }
    }
}

/// Check whether a payload has the `{"webhook": {..}, "event": {..}}` shape
pub fn is_envelope(root: &Value) -> bool {
    root.get("webhook").is_some_and(Value::is_object)
        && root.get("event").is_some_and(Value::is_object)
}

/// A typed, immutable webhook event.
///
/// Built once by the parser. `fields` holds only the values declared by the
/// tag's schema; everything else stays available through [`Event::raw`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    id: Uuid,
    tag: EventTag,
    received_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook: Option<WebhookInfo>,
    fields: Map<String, Value>,
    raw: Value,
}

impl Event {
    pub(crate) fn new(tag: EventTag, fields: Map<String, Value>, raw: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag,
            received_at: Utc::now(),
            webhook: WebhookInfo::from_envelope(&raw),
            fields,
            raw,
        }
    }

    /// Unique ID assigned at parse time
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tag(&self) -> EventTag {
        self.tag
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Envelope metadata, when the payload carried it
    pub fn webhook(&self) -> Option<&WebhookInfo> {
        self.webhook.as_ref()
    }

    /// Fields extracted per schema
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The complete payload as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The object fields were resolved against: `event` for enveloped
    /// payloads, the root otherwise
    pub fn body(&self) -> &Value {
        if is_envelope(&self.raw) {
            &self.raw["event"]
        } else {
            &self.raw
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn field_i64(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    pub fn field_bool(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_detection() {
        assert!(is_envelope(&json!({"webhook": {}, "event": {}})));
        assert!(!is_envelope(&json!({"webhook": {}, "event": "x"})));
        assert!(!is_envelope(&json!({"udid": "ABC"})));
    }

    #[test]
    fn test_event_from_envelope() {
        let raw = json!({
            "webhook": {"id": 7, "name": "Check-ins", "webhookEvent": "ComputerCheckIn"},
            "event": {"computer": {"udid": "ABC"}}
        });
        let event = Event::new(EventTag::ComputerCheckIn, Map::new(), raw);

        let webhook = event.webhook().unwrap();
        assert_eq!(webhook.id, Some(7));
        assert_eq!(webhook.webhook_event.as_deref(), Some("ComputerCheckIn"));
        assert_eq!(event.body(), &json!({"computer": {"udid": "ABC"}}));
    }

    #[test]
    fn test_mistyped_metadata_keeps_other_fields() {
        let raw = json!({
            "webhook": {
                "id": "7",
                "name": "Check-ins",
                "webhookEvent": "ComputerCheckIn",
                "eventTimestamp": {"ms": 1}
            },
            "event": {}
        });
        let event = Event::new(EventTag::ComputerCheckIn, Map::new(), raw);

        let webhook = event.webhook().unwrap();
        assert_eq!(webhook.id, Some(7));
        assert_eq!(webhook.name.as_deref(), Some("Check-ins"));
        assert_eq!(webhook.webhook_event.as_deref(), Some("ComputerCheckIn"));
        assert_eq!(webhook.event_timestamp, None);
    }

    #[test]
    fn test_flat_event_body_is_root() {
        let mut fields = Map::new();
        fields.insert("udid".to_string(), json!("ABC123"));
        let event = Event::new(EventTag::ComputerCheckIn, fields, json!({"udid": "ABC123"}));

        assert!(event.webhook().is_none());
        assert_eq!(event.body(), event.raw());
        assert_eq!(event.field_str("udid"), Some("ABC123"));
        assert_eq!(event.field_i64("udid"), None);
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = Event::new(EventTag::PushSent, Map::new(), json!({}));
        let b = Event::new(EventTag::PushSent, Map::new(), json!({}));
        assert_ne!(a.id(), b.id());
    }
}
