// Schema overrides loaded from configuration

use crate::{ConfigError, ConfigLoader, FileFormat, Result};
use hookwire_events::{EventTag, FieldSchema, SchemaRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Field schemas keyed by event tag, replacing the built-in ones.
///
/// In TOML each tag is an array of tables:
///
/// ```toml
/// [[ComputerCheckIn]]
/// name = "udid"
/// type = "string"
///
/// [[ComputerCheckIn]]
/// name = "department"
/// type = "string"
/// required = false
/// ```
///
/// JSON uses the same shape: `{"ComputerCheckIn": [{"name": "udid", "type": "string"}]}`.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    schemas: BTreeMap<EventTag, FieldSchema>,
}

impl SchemaTable {
    /// Load a table from a JSON or TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        if loader.format() == FileFormat::Env {
            return Err(ConfigError::SchemaError(format!(
                "{} is not a JSON or TOML file",
                path.display()
            )));
        }

        let table = Self::from_value(loader.load_file(path)?)?;
        debug!(path = %path.display(), schemas = table.len(), "Loaded schema table");
        Ok(table)
    }

    /// Parse a table from text in the given format
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        Self::from_value(ConfigLoader::new(format).parse(content)?)
    }

    /// Build a table from decoded configuration
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: BTreeMap<String, FieldSchema> = serde_json::from_value(value)
            .map_err(|e| ConfigError::SchemaError(e.to_string()))?;

        let mut schemas = BTreeMap::new();
        for (name, schema) in raw {
            let tag = name
                .parse::<EventTag>()
                .map_err(|e| ConfigError::SchemaError(e.to_string()))?;
            if let Some(field) = schema.fields().iter().find(|f| f.name.trim().is_empty()) {
                return Err(ConfigError::SchemaError(format!(
                    "{} has a field with an empty name (type {})",
                    tag, field.kind
                )));
            }
            schemas.insert(tag, schema);
        }

        Ok(Self { schemas })
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// The built-in schemas with this table applied on top
    pub fn into_registry(self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::builtin();
        registry.merge_overrides(self.schemas);
        registry
    }
}
