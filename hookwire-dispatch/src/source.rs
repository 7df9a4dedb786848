//! Handler discovery sources

use crate::command::CommandHandler;
use crate::error::{HandlerError, HandlerLoadError};
use crate::handler::EventHandler;
use hookwire_events::EventTag;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A handler found by a source, with the tags it declares
#[derive(Clone)]
pub struct DiscoveredHandler {
    pub tags: Vec<EventTag>,
    pub handler: Arc<dyn EventHandler>,
}

/// Result of asking a source for its handlers
#[derive(Default)]
pub struct Discovery {
    pub handlers: Vec<DiscoveredHandler>,
    pub errors: Vec<HandlerLoadError>,
}

/// Somewhere handler definitions come from at startup
pub trait HandlerSource {
    /// Human readable origin for logs
    fn describe(&self) -> String;

    /// Produce every loadable handler and an error for each one that is not
    fn discover(&self) -> Discovery;
}

type HandlerFactory = Box<dyn Fn() -> Result<Arc<dyn EventHandler>, HandlerError> + Send + Sync>;

struct StaticEntry {
    name: String,
    tags: Vec<EventTag>,
    factory: HandlerFactory,
}

/// Handlers declared in code, built in declaration order
///
/// # Examples
///
/// ```rust,ignore
/// let source = StaticSource::new()
///     .with_handler([EventTag::ComputerCheckIn], AuditHandler)
///     .with_factory("helpdesk", [EventTag::ComputerPolicyFinished], || {
///         Ok(Arc::new(HelpdeskHandler::from_env()?))
///     });
/// ```
#[derive(Default)]
pub struct StaticSource {
    entries: Vec<StaticEntry>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ready-made handler
    pub fn with_handler<I, H>(mut self, tags: I, handler: H) -> Self
    where
        I: IntoIterator<Item = EventTag>,
        H: EventHandler + 'static,
    {
        let name = handler.name().to_string();
        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        self.entries.push(StaticEntry {
            name,
            tags: tags.into_iter().collect(),
            factory: Box::new(move || Ok(handler.clone())),
        });
        self
    }

    /// Add a handler built when the source is loaded
    pub fn with_factory<I, F>(mut self, name: impl Into<String>, tags: I, factory: F) -> Self
    where
        I: IntoIterator<Item = EventTag>,
        F: Fn() -> Result<Arc<dyn EventHandler>, HandlerError> + Send + Sync + 'static,
    {
        self.entries.push(StaticEntry {
            name: name.into(),
            tags: tags.into_iter().collect(),
            factory: Box::new(factory),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HandlerSource for StaticSource {
    fn describe(&self) -> String {
        format!("static manifest ({} entries)", self.entries.len())
    }

    fn discover(&self) -> Discovery {
        let mut discovery = Discovery::default();

        for entry in &self.entries {
            if entry.tags.is_empty() {
                discovery
                    .errors
                    .push(HandlerLoadError::new(&entry.name, "declares no event types"));
                continue;
            }

            match (entry.factory)() {
                Ok(handler) => discovery.handlers.push(DiscoveredHandler {
                    tags: entry.tags.clone(),
                    handler,
                }),
                Err(e) => discovery
                    .errors
                    .push(HandlerLoadError::new(&entry.name, e.to_string())),
            }
        }

        discovery
    }
}

/// A `*.toml` file describing an external command handler
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerManifest {
    /// Defaults to the manifest's file stem
    pub name: Option<String>,

    pub events: Vec<EventTag>,

    /// Program to run; relative paths containing a separator resolve
    /// against the manifest's directory
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    pub timeout_secs: Option<u64>,
}

impl HandlerManifest {
    /// Parse manifest text
    pub fn parse(content: &str) -> Result<Self, String> {
        let manifest: HandlerManifest = toml::from_str(content).map_err(|e| e.to_string())?;
        if manifest.events.is_empty() {
            return Err("manifest declares no event types".to_string());
        }
        if manifest.command.trim().is_empty() {
            return Err("manifest command is empty".to_string());
        }
        Ok(manifest)
    }

    fn into_handler(self, path: &Path) -> DiscoveredHandler {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| file_stem(path).to_string());

        let program = match path.parent() {
            Some(dir) if self.command.contains(['/', std::path::MAIN_SEPARATOR]) => {
                let command = Path::new(&self.command);
                if command.is_relative() {
                    dir.join(command)
                } else {
                    command.to_path_buf()
                }
            }
            _ => PathBuf::from(&self.command),
        };

        let mut handler = CommandHandler::new(name, program).with_args(self.args);
        for (key, value) in self.env {
            handler = handler.with_env(key, value);
        }
        if let Some(secs) = self.timeout_secs {
            handler = handler.with_timeout(Duration::from_secs(secs));
        }

        DiscoveredHandler {
            tags: self.events,
            handler: Arc::new(handler),
        }
    }
}

/// A directory of handler definitions.
///
/// - an executable whose name starts with an event type
///   (`ComputerCheckIn`, `ComputerCheckIn-notify.sh`) handles that type;
/// - a `*.toml` file is read as a [`HandlerManifest`];
/// - hidden files and subdirectories are ignored.
///
/// Files are loaded in name order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_path(&self, path: &Path) -> Result<DiscoveredHandler, HandlerLoadError> {
        let origin = path.display().to_string();

        if path.extension().is_some_and(|ext| ext == "toml") {
            let content = fs::read_to_string(path)
                .map_err(|e| HandlerLoadError::new(&origin, e.to_string()))?;
            let manifest =
                HandlerManifest::parse(&content).map_err(|e| HandlerLoadError::new(&origin, e))?;
            return Ok(manifest.into_handler(path));
        }

        if !is_executable(path) {
            return Err(HandlerLoadError::new(
                origin,
                "not executable and not a .toml manifest",
            ));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| HandlerLoadError::new(&origin, "file name is not valid UTF-8"))?;
        let prefix = file_name.split(['-', '.']).next().unwrap_or(file_name);
        let tag = prefix
            .parse::<EventTag>()
            .map_err(|e| HandlerLoadError::new(&origin, e.to_string()))?;

        Ok(DiscoveredHandler {
            tags: vec![tag],
            handler: Arc::new(CommandHandler::new(file_name, path)),
        })
    }
}

impl HandlerSource for DirectorySource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn discover(&self) -> Discovery {
        let mut discovery = Discovery::default();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                discovery
                    .errors
                    .push(HandlerLoadError::new(self.describe(), e.to_string()));
                return discovery;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && !file_stem(path).starts_with('.'))
            .collect();
        paths.sort();

        for path in paths {
            match self.load_path(&path) {
                Ok(found) => {
                    debug!(
                        path = %path.display(),
                        handler = found.handler.name(),
                        "Discovered handler"
                    );
                    discovery.handlers.push(found);
                }
                Err(e) => discovery.errors.push(e),
            }
        }

        discovery
    }
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "exe" | "bat" | "cmd"))
}
