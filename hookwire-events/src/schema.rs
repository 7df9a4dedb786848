//! Field schemas and the schema registry

use crate::builtin;
use crate::error::{ParseError, Result};
use crate::tag::EventTag;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// JSON kind a field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    /// Any non-null value
    Any,
}

impl FieldKind {
    /// Check whether a value has this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
            FieldKind::Any => !value.is_null(),
        }
    }

    /// Describe the kind of an arbitrary value
    pub fn describe(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "number",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Any => "any",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_required() -> bool {
    true
}

/// One field of an event schema.
///
/// `name` may be a dotted path (`computer.udid`) that is resolved through
/// nested objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    #[serde(default = "default_required")]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
        }
    }

    /// Look the field up in a payload object
    pub fn extract<'a>(&self, source: &'a Value) -> Option<&'a Value> {
        self.name
            .split('.')
            .try_fold(source, |current, segment| current.as_object()?.get(segment))
    }

    /// Validate the field against a payload object.
    ///
    /// Returns the value to promote, `None` for an absent optional field.
    fn check<'a>(&self, source: &'a Value) -> Result<Option<&'a Value>> {
        match self.extract(source) {
            None | Some(Value::Null) if self.required => {
                Err(ParseError::violation(&self.name, "missing required field"))
            }
            None | Some(Value::Null) => Ok(None),
            Some(value) if self.kind.matches(value) => Ok(Some(value)),
            Some(value) => Err(ParseError::violation(
                &self.name,
                format!("expected {}, found {}", self.kind, FieldKind::describe(value)),
            )),
        }
    }
}

/// Ordered field definitions for one event type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::new(name, kind, true));
        self
    }

    /// Add an optional field
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::new(name, kind, false));
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a payload and collect the declared fields.
    ///
    /// Stops at the first violation, in schema order.
    pub fn validate(&self, source: &Value) -> Result<Map<String, Value>> {
        let mut extracted = Map::new();
        for spec in &self.fields {
            if let Some(value) = spec.check(source)? {
                extracted.insert(spec.name.clone(), value.clone());
            }
        }
        Ok(extracted)
    }
}

impl FromIterator<FieldSpec> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Registry of schemas keyed by event tag.
///
/// Populated during startup and then shared read-only, typically behind an
/// `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<EventTag, FieldSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in schema for every tag
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tag in EventTag::ALL {
            registry.register(tag, builtin::schema_for(tag));
        }
        registry
    }

    /// Register a schema, replacing any previous one for the tag
    pub fn register(&mut self, tag: EventTag, schema: FieldSchema) -> Option<FieldSchema> {
        debug!(tag = %tag, fields = schema.len(), "Registered event schema");
        self.schemas.insert(tag, schema)
    }

    /// Register every schema from a resolved table
    pub fn merge_overrides<I>(&mut self, table: I)
    where
        I: IntoIterator<Item = (EventTag, FieldSchema)>,
    {
        for (tag, schema) in table {
            self.register(tag, schema);
        }
    }

    /// Get the schema for a tag
    pub fn lookup(&self, tag: EventTag) -> Result<&FieldSchema> {
        self.schemas
            .get(&tag)
            .ok_or_else(|| ParseError::UnknownEventType(tag.to_string()))
    }

    pub fn contains(&self, tag: EventTag) -> bool {
        self.schemas.contains_key(&tag)
    }

    /// Registered tags in declaration order
    pub fn tags(&self) -> Vec<EventTag> {
        let mut tags: Vec<_> = self.schemas.keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_matching() {
        assert!(FieldKind::String.matches(&json!("abc")));
        assert!(FieldKind::Integer.matches(&json!(42)));
        assert!(!FieldKind::Integer.matches(&json!(4.2)));
        assert!(FieldKind::Number.matches(&json!(4.2)));
        assert!(FieldKind::Any.matches(&json!([])));
        assert!(!FieldKind::Any.matches(&Value::Null));
    }

    #[test]
    fn test_dotted_path_extract() {
        let spec = FieldSpec::new("computer.udid", FieldKind::String, true);
        let payload = json!({"computer": {"udid": "ABC"}});
        assert_eq!(spec.extract(&payload), Some(&json!("ABC")));
        assert_eq!(spec.extract(&json!({"computer": "flat"})), None);
    }

    #[test]
    fn test_validate_collects_declared_fields_only() {
        let schema = FieldSchema::new()
            .required("udid", FieldKind::String)
            .optional("username", FieldKind::String);

        let fields = schema
            .validate(&json!({"udid": "ABC123", "extra": true}))
            .unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["udid"], json!("ABC123"));
    }

    #[test]
    fn test_validate_fails_on_first_violation() {
        let schema = FieldSchema::new()
            .required("udid", FieldKind::String)
            .required("serialNumber", FieldKind::String);

        let err = schema.validate(&json!({})).unwrap_err();
        assert_eq!(err.field(), Some("udid"));
    }

    #[test]
    fn test_validate_type_mismatch() {
        let schema = FieldSchema::new().required("policyId", FieldKind::Integer);
        let err = schema.validate(&json!({"policyId": "12"})).unwrap_err();
        assert_eq!(
            err,
            ParseError::SchemaViolation {
                field: "policyId".to_string(),
                reason: "expected integer, found string".to_string(),
            }
        );
    }

    #[test]
    fn test_optional_null_is_skipped_but_wrong_kind_fails() {
        let schema = FieldSchema::new().optional("room", FieldKind::String);
        assert!(schema.validate(&json!({"room": null})).unwrap().is_empty());
        assert!(schema.validate(&json!({"room": 5})).is_err());
    }

    #[test]
    fn test_register_is_last_write_wins() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            EventTag::ComputerCheckIn,
            FieldSchema::new().required("a", FieldKind::String),
        );
        let previous = registry.register(
            EventTag::ComputerCheckIn,
            FieldSchema::new().required("udid", FieldKind::String),
        );

        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);
        let schema = registry.lookup(EventTag::ComputerCheckIn).unwrap();
        assert_eq!(schema.fields()[0].name, "udid");
    }

    #[test]
    fn test_lookup_missing() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.lookup(EventTag::PushSent).unwrap_err(),
            ParseError::UnknownEventType("PushSent".to_string())
        );
    }

    #[test]
    fn test_builtin_covers_every_tag() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), EventTag::ALL.len());
        assert_eq!(registry.tags(), EventTag::ALL.to_vec());
    }

    #[test]
    fn test_field_spec_deserialize_defaults_required() {
        let spec: FieldSpec = serde_json::from_str(r#"{"name": "udid", "type": "string"}"#).unwrap();
        assert!(spec.required);
        assert_eq!(spec.kind, FieldKind::String);
    }
}
