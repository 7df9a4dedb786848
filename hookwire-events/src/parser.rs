//! Payload parsing and schema validation

use crate::error::{ParseError, Result};
use crate::event::{Event, is_envelope};
use crate::schema::SchemaRegistry;
use crate::tag::EventTag;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Turns raw payloads into validated [`Event`]s.
///
/// Cheap to clone; the schema registry is shared.
#[derive(Debug, Clone)]
pub struct Parser {
    schemas: Arc<SchemaRegistry>,
}

impl Parser {
    pub fn new(schemas: Arc<SchemaRegistry>) -> Self {
        Self { schemas }
    }

    /// Parser over the built-in schemas
    pub fn builtin() -> Self {
        Self::new(Arc::new(SchemaRegistry::builtin()))
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Parse a payload declared as `tag`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hookwire_events::{EventTag, FieldKind, FieldSchema, Parser, SchemaRegistry};
    /// use std::sync::Arc;
    ///
    /// let mut schemas = SchemaRegistry::new();
    /// schemas.register(
    ///     EventTag::ComputerCheckIn,
    ///     FieldSchema::new().required("udid", FieldKind::String),
    /// );
    ///
    /// let parser = Parser::new(Arc::new(schemas));
    /// let event = parser.parse(EventTag::ComputerCheckIn, r#"{"udid":"ABC123"}"#).unwrap();
    /// assert_eq!(event.field_str("udid"), Some("ABC123"));
    /// ```
    pub fn parse(&self, tag: EventTag, raw: &str) -> Result<Event> {
        self.schemas.lookup(tag)?;
        let value: Value = serde_json::from_str(raw)?;
        self.parse_value(tag, value)
    }

    /// Parse a payload whose tag arrived as text
    pub fn parse_str_tag(&self, tag: &str, raw: &str) -> Result<Event> {
        let tag = tag
            .parse::<EventTag>()
            .map_err(|e| ParseError::UnknownEventType(e.0))?;
        self.parse(tag, raw)
    }

    /// Parse an enveloped payload, taking the tag from `webhook.webhookEvent`
    pub fn parse_envelope(&self, raw: &str) -> Result<Event> {
        let value: Value = serde_json::from_str(raw)?;
        let name = value
            .pointer("/webhook/webhookEvent")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ParseError::MalformedPayload("missing webhook.webhookEvent".to_string())
            })?;
        let tag = name
            .parse::<EventTag>()
            .map_err(|e| ParseError::UnknownEventType(e.0))?;

        self.parse_value(tag, value)
    }

    /// Validate an already decoded payload
    pub fn parse_value(&self, tag: EventTag, value: Value) -> Result<Event> {
        let schema = self.schemas.lookup(tag)?;

        if !value.is_object() {
            return Err(ParseError::MalformedPayload(format!(
                "expected a JSON object, found {}",
                crate::schema::FieldKind::describe(&value)
            )));
        }

        let source = if is_envelope(&value) {
            &value["event"]
        } else {
            &value
        };

        let fields = schema.validate(source)?;
        debug!(tag = %tag, fields = fields.len(), "Parsed event payload");

        Ok(Event::new(tag, fields, value))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::builtin()
    }
}
