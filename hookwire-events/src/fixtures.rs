//! Sample payload store

use crate::builtin;
use crate::error::FixtureLoadError;
use crate::tag::EventTag;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One raw sample payload per event type.
///
/// Filled once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    samples: BTreeMap<EventTag, String>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the samples compiled into this crate
    pub fn embedded() -> Self {
        let samples = EventTag::ALL
            .iter()
            .map(|tag| (*tag, builtin::sample_for(*tag).to_string()))
            .collect();
        Self { samples }
    }

    /// Load every `<tag>.<ext>` file in `dir`.
    ///
    /// Each file that cannot be used yields a [`FixtureLoadError`] and the
    /// remaining files are still loaded.
    pub fn load_all(dir: impl AsRef<Path>) -> (Self, Vec<FixtureLoadError>) {
        let dir = dir.as_ref();
        let mut store = Self::new();
        let mut errors = Vec::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Cannot read fixture directory");
                errors.push(FixtureLoadError::new(dir, e.to_string()));
                return (store, errors);
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && !is_hidden(path))
            .collect();
        paths.sort();

        for path in paths {
            match Self::read_fixture(&path) {
                Ok((tag, _)) if store.samples.contains_key(&tag) => {
                    errors.push(FixtureLoadError::new(
                        &path,
                        format!("duplicate fixture for {}", tag),
                    ));
                }
                Ok((tag, text)) => {
                    debug!(tag = %tag, path = %path.display(), "Loaded fixture");
                    store.samples.insert(tag, text);
                }
                Err(error) => {
                    warn!("{}", error);
                    errors.push(error);
                }
            }
        }

        (store, errors)
    }

    fn read_fixture(path: &Path) -> Result<(EventTag, String), FixtureLoadError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FixtureLoadError::new(path, "file name is not valid UTF-8"))?;

        // A corrupt file is reported as corrupt whatever its name.
        let text = fs::read_to_string(path).map_err(|e| FixtureLoadError::new(path, e.to_string()))?;
        serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| FixtureLoadError::new(path, format!("invalid JSON: {}", e)))?;

        let tag = stem
            .parse::<EventTag>()
            .map_err(|e| FixtureLoadError::new(path, e.to_string()))?;

        Ok((tag, text))
    }

    /// Add or replace a sample
    pub fn insert(&mut self, tag: EventTag, raw: impl Into<String>) {
        self.samples.insert(tag, raw.into());
    }

    pub fn get(&self, tag: EventTag) -> Option<&str> {
        self.samples.get(&tag).map(String::as_str)
    }

    pub fn contains(&self, tag: EventTag) -> bool {
        self.samples.contains_key(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = EventTag> + '_ {
        self.samples.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventTag, &str)> {
        self.samples.iter().map(|(tag, raw)| (*tag, raw.as_str()))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_has_every_tag() {
        let store = FixtureStore::embedded();
        assert_eq!(store.len(), EventTag::ALL.len());
        assert!(store.get(EventTag::JssStartup).unwrap().contains("JSSStartup"));
    }

    #[test]
    fn test_load_all_tolerates_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("DeviceEnrolled.json"), r#"{"udid": "A"}"#).unwrap();
        fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();

        let (store, errors) = FixtureStore::load_all(dir.path());

        assert_eq!(store.len(), 1);
        assert!(store.contains("DeviceEnrolled".parse().unwrap()));
        assert_eq!(store.get(EventTag::MobileDeviceEnrolled), Some(r#"{"udid": "A"}"#));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].stem, "Broken");
        assert!(errors[0].reason.starts_with("invalid JSON"), "{}", errors[0].reason);
    }

    #[test]
    fn test_valid_json_with_unknown_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Inventory.json"), "{}").unwrap();

        let (store, errors) = FixtureStore::load_all(dir.path());
        assert!(store.is_empty());
        assert_eq!(errors[0].reason, "unknown event type: Inventory");
    }

    #[test]
    fn test_corrupt_known_tag_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("PushSent.json"), "{").unwrap();

        let (store, errors) = FixtureStore::load_all(dir.path());
        assert!(store.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].reason.starts_with("invalid JSON"));
    }

    #[test]
    fn test_hidden_files_and_directories_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".DS_Store"), "junk").unwrap();
        fs::create_dir(dir.path().join("PushSent")).unwrap();
        fs::write(dir.path().join("PushSent.json"), "{}").unwrap();

        let (store, errors) = FixtureStore::load_all(dir.path());
        assert_eq!(store.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_duplicate_stems() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("PushSent.json"), r#"{"a": 1}"#).unwrap();
        fs::write(dir.path().join("PushSent.txt"), r#"{"a": 2}"#).unwrap();

        let (store, errors) = FixtureStore::load_all(dir.path());
        assert_eq!(store.get(EventTag::PushSent), Some(r#"{"a": 1}"#));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let (store, errors) = FixtureStore::load_all(dir.path().join("nope"));
        assert!(store.is_empty());
        assert_eq!(errors.len(), 1);
    }
}
