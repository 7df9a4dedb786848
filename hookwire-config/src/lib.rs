//! Configuration for Hookwire
//!
//! Loads the receiver settings from JSON, TOML or `.env` files, overlays
//! `HOOKWIRE_*` environment variables and validates the result.
//!
//! ```toml
//! fixture_dir = "fixtures"
//! handler_dirs = ["handlers", "/usr/local/lib/hookwire"]
//! schema_file = "schemas.toml"
//!
//! [dispatch]
//! handler_timeout_secs = 30
//! timeout_policy = "abort"
//! ```
//!
//! Relative paths in a file resolve against the file's directory.

pub mod env;
pub mod error;
pub mod loader;
pub mod schema_table;
pub mod validation;

pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use schema_table::SchemaTable;
pub use validation::{ConfigValidator, Validate};

use hookwire_dispatch::{DirectorySource, DispatchConfig, TimeoutPolicy};
use hookwire_events::SchemaRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Longest handler timeout accepted, one day
pub const MAX_HANDLER_TIMEOUT_SECS: u64 = 86_400;

/// Dispatch section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSettings {
    pub handler_timeout_secs: Option<u64>,
    pub timeout_policy: TimeoutPolicy,
}

impl DispatchSettings {
    pub fn to_dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            handler_timeout: self.handler_timeout_secs.map(Duration::from_secs),
            timeout_policy: self.timeout_policy,
        }
    }
}

/// Resolved receiver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookwireConfig {
    /// Sample payloads; the embedded samples are used when unset
    pub fixture_dir: Option<PathBuf>,

    /// Directories scanned for handlers, in order
    pub handler_dirs: Vec<PathBuf>,

    /// Schema overrides applied over the built-in schemas
    pub schema_file: Option<PathBuf>,

    pub dispatch: DispatchSettings,
}

impl HookwireConfig {
    /// Load a file, apply `HOOKWIRE_*` environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let env = EnvLoader::hookwire().load()?;
        Self::load_with_env(path, &env)
    }

    /// Configuration from defaults and the environment only
    pub fn from_env() -> Result<Self> {
        let env = EnvLoader::hookwire().load()?;
        let mut config = Self::default();
        config.apply_overrides(&env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.env` file into the process environment, then read the
    /// configuration from it
    pub fn load_dotenv(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    /// Same as [`load`](Self::load) with explicit overrides.
    ///
    /// `env` holds keys with the `HOOKWIRE_` prefix already stripped and
    /// lower-cased, as produced by [`EnvLoader::load`].
    pub fn load_with_env(path: impl AsRef<Path>, env: &HashMap<String, String>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let value = loader.load_file(path)?;

        let mut config = match loader.format() {
            FileFormat::Env => {
                let pairs = match value {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                let vars = EnvLoader::hookwire().filter(
                    pairs
                        .into_iter()
                        .filter_map(|(k, v)| v.as_str().map(|v| (k, v.to_string()))),
                );
                let mut config = Self::default();
                config.apply_overrides(&vars)?;
                config
            }
            FileFormat::Json | FileFormat::Toml => Self::from_value(value)?,
        };

        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }

        config.apply_overrides(env)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Deserialize without overrides or validation
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Apply overrides keyed like [`EnvLoader::load`] output.
    ///
    /// `handler_dirs` is colon separated and replaces the list.
    pub fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(dir) = vars.get("fixture_dir") {
            self.fixture_dir = Some(PathBuf::from(dir));
        }

        if let Some(dirs) = vars.get("handler_dirs") {
            self.handler_dirs = dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        if let Some(file) = vars.get("schema_file") {
            self.schema_file = Some(PathBuf::from(file));
        }

        if let Some(secs) = vars.get("handler_timeout_secs") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                ConfigError::ValidationError(format!("handler_timeout_secs: {}", e))
            })?;
            self.dispatch.handler_timeout_secs = Some(secs);
        }

        if let Some(policy) = vars.get("timeout_policy") {
            self.dispatch.timeout_policy = policy
                .parse::<TimeoutPolicy>()
                .map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }

    fn resolve_relative(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() && !path.as_os_str().is_empty() {
                *path = base.join(&*path);
            }
        };

        if let Some(dir) = self.fixture_dir.as_mut() {
            resolve(dir);
        }
        self.handler_dirs.iter_mut().for_each(resolve);
        if let Some(file) = self.schema_file.as_mut() {
            resolve(file);
        }
    }

    /// Built-in schemas with the configured schema file applied
    pub fn schema_registry(&self) -> Result<SchemaRegistry> {
        match &self.schema_file {
            Some(path) => Ok(SchemaTable::load(path)?.into_registry()),
            None => Ok(SchemaRegistry::builtin()),
        }
    }

    /// One handler source per configured directory, in order
    pub fn handler_sources(&self) -> Vec<DirectorySource> {
        self.handler_dirs.iter().map(DirectorySource::new).collect()
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        self.dispatch.to_dispatch_config()
    }
}

impl Validate for HookwireConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.fixture_dir {
            ConfigValidator::path_not_empty(dir, "fixture_dir")?;
        }
        for dir in &self.handler_dirs {
            ConfigValidator::path_not_empty(dir, "handler_dirs")?;
        }
        if let Some(file) = &self.schema_file {
            ConfigValidator::path_not_empty(file, "schema_file")?;
        }
        if let Some(secs) = self.dispatch.handler_timeout_secs {
            ConfigValidator::in_range(secs, 1, MAX_HANDLER_TIMEOUT_SECS, "handler_timeout_secs")?;
        }
        ConfigValidator::one_of(
            &self.dispatch.timeout_policy,
            &[TimeoutPolicy::Skip, TimeoutPolicy::Abort],
            "timeout_policy",
        )
    }
}
