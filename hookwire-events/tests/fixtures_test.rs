//! Integration tests for the shipped fixtures and built-in schemas

use hookwire_events::*;
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn test_fixture_directory_loads_cleanly() {
    let (store, errors) = FixtureStore::load_all(fixture_dir());

    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(store.len(), EventTag::ALL.len());
}

#[test]
fn test_every_builtin_schema_accepts_its_sample() {
    let parser = Parser::builtin();
    let store = FixtureStore::embedded();

    for (tag, raw) in store.iter() {
        let event = parser
            .parse(tag, raw)
            .unwrap_or_else(|e| panic!("{} sample rejected: {}", tag, e));

        let schema = parser.schemas().lookup(tag).unwrap();
        for spec in schema.required_fields() {
            assert!(
                event.fields().contains_key(&spec.name),
                "{} is missing {}",
                tag,
                spec.name
            );
        }
    }
}

#[test]
fn test_samples_name_their_own_event() {
    let parser = Parser::builtin();

    for (tag, raw) in FixtureStore::embedded().iter() {
        let event = parser.parse_envelope(raw).unwrap();
        assert_eq!(event.tag(), tag);
    }
}

#[test]
fn test_schema_override_from_table() {
    let mut schemas = SchemaRegistry::builtin();
    let table: Vec<FieldSpec> =
        serde_json::from_str(r#"[{"name": "udid", "type": "string"}]"#).unwrap();
    schemas.merge_overrides([(EventTag::ComputerCheckIn, table.into_iter().collect())]);

    let parser = Parser::new(std::sync::Arc::new(schemas));

    let event = parser
        .parse(EventTag::ComputerCheckIn, r#"{"udid":"ABC123"}"#)
        .unwrap();
    assert_eq!(event.fields().len(), 1);
    assert_eq!(event.field_str("udid"), Some("ABC123"));

    let err = parser.parse(EventTag::ComputerCheckIn, "{}").unwrap_err();
    assert_eq!(
        err,
        ParseError::SchemaViolation {
            field: "udid".to_string(),
            reason: "missing required field".to_string(),
        }
    );
}

#[test]
fn test_missing_field_in_sample_is_named() {
    let parser = Parser::builtin();
    let mut payload: serde_json::Value =
        serde_json::from_str(FixtureStore::embedded().get(EventTag::PushSent).unwrap()).unwrap();
    payload["event"].as_object_mut().unwrap().remove("type");

    let err = parser
        .parse(EventTag::PushSent, &payload.to_string())
        .unwrap_err();
    assert_eq!(err.field(), Some("type"));
}
