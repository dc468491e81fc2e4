//! Flat-file document store.
//!
//! Every document is one JSON file under the store root, addressed by a
//! slash-separated key (`"projects"`, `"pages/about"`). Writes replace the
//! whole file; there is no locking and no partial update - the last writer
//! wins.

pub mod error;

pub use error::{Result, StoreError};

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static STORE: OnceCell<Arc<FileStore>> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: std::env::var("DATABASE_DIR")
                .unwrap_or_else(|_| "database".to_string())
                .into(),
        }
    }
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Read a whole document. A missing file is `StoreError::NotFound`;
    /// a file that exists but does not parse is a hard failure.
    pub fn read(&self, key: &str) -> Result<Value> {
        let path = self.doc_path(key)?;
        if !path.exists() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn read_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.read(key)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Whole-file replace, pretty-printed like every document the admin UI
    /// has ever written. Parent directories are created on demand.
    pub fn write(&self, key: &str, document: &Value) -> Result<()> {
        let path = self.doc_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(document)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Keys of the `*.json` documents directly under `root/collection`.
    /// A collection that was never written to is an empty list.
    pub fn list(&self, collection: &str) -> Result<Vec<String>> {
        if !collection.is_empty() && !is_valid_key(collection) {
            return Err(StoreError::InvalidKey(collection.to_string()));
        }
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.doc_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// Read a seeded singleton document, writing `default` on first access.
    pub fn read_or_seed(&self, key: &str, default: &Value) -> Result<Value> {
        match self.read(key) {
            Ok(value) => Ok(value),
            Err(StoreError::NotFound(_)) => {
                self.write(key, default)?;
                Ok(default.clone())
            }
            Err(e) => Err(e),
        }
    }
}

/// Keys are lowercase path segments; anything else (and in particular `..`)
/// would let a request path escape the store root.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment.chars().all(is_valid_key_char))
}

fn is_valid_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

pub fn init_store(config: Option<StoreConfig>) -> Result<Arc<FileStore>> {
    let config = config.unwrap_or_default();

    tracing::info!("Initializing document store at {:?}", config.root);
    fs::create_dir_all(&config.root)?;

    let store = Arc::new(FileStore::new(config.root));
    let _ = STORE.set(store.clone());

    Ok(store)
}

pub fn get_store() -> Option<Arc<FileStore>> {
    STORE.get().cloned()
}

pub fn health_check() -> Result<std::time::Duration> {
    let store =
        get_store().ok_or_else(|| StoreError::NotFound("store not initialized".to_string()))?;

    let start = std::time::Instant::now();
    store.list("")?;

    Ok(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = temp_store();
        let doc = json!({ "projects": [{ "id": "p1", "title": "Zomergasten" }] });

        store.write("projects", &doc).unwrap();
        assert_eq!(store.read("projects").unwrap(), doc);
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.read("nope"),
            Err(StoreError::NotFound(key)) if key == "nope"
        ));
    }

    #[test]
    fn read_invalid_json_is_serialization_error() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        assert!(matches!(
            store.read("broken"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn nested_keys_create_directories() {
        let (_dir, store) = temp_store();
        store.write("pages/about", &json!({ "id": "about" })).unwrap();
        store.write("pages/contact", &json!({ "id": "contact" })).unwrap();

        assert_eq!(store.list("pages").unwrap(), vec!["about", "contact"]);
    }

    #[test]
    fn list_missing_collection_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list("pages").unwrap().is_empty());
    }

    #[test]
    fn traversal_keys_are_rejected() {
        let (_dir, store) = temp_store();
        for key in ["../escape", "a/../b", "", "UPPER", "spa ce", "/lead"] {
            assert!(
                matches!(store.read(key), Err(StoreError::InvalidKey(_))),
                "key {key:?} should be invalid"
            );
        }
    }

    #[test]
    fn read_or_seed_writes_once() {
        let (_dir, store) = temp_store();
        let default = json!({ "main": [] });

        assert_eq!(store.read_or_seed("navigation", &default).unwrap(), default);

        // A later write must not be clobbered by the seed path.
        let updated = json!({ "main": [{ "name": "Home", "href": "/" }] });
        store.write("navigation", &updated).unwrap();
        assert_eq!(store.read_or_seed("navigation", &default).unwrap(), updated);
    }
}
