//! JSON file-backed store
//!
//! Loaded eagerly on open, written through on every mutation. Writes go to a
//! hidden sibling file first and are renamed over the target, so a crash
//! mid-write leaves either the old document or the new one.

use crate::error::{ReelError, ReelResult};
use crate::store::{self, Document, KeyValueStore, Namespace};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store backed by a single pretty-printed JSON document
///
/// Open one instance per backing file and keep it for the life of the
/// process; two instances over the same path do not see each other's writes.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: Document,
}

impl JsonStore {
    /// Open a store, loading whatever valid state the file holds
    ///
    /// Never fails: a missing, unreadable, or malformed file yields an empty
    /// store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::load(&path);
        Self { path, data }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Document {
        match Self::read_document(path) {
            Ok(Some(doc)) => {
                debug!("Loaded store {} ({} top-level keys)", path.display(), doc.len());
                doc
            }
            Ok(None) => {
                debug!("Store {} not found, starting empty", path.display());
                Document::new()
            }
            Err(e) => {
                warn!("{}; starting from an empty store", e);
                Document::new()
            }
        }
    }

    fn read_document(path: &Path) -> ReelResult<Option<Document>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ReelError::io(format!("reading store file {}", path.display()), e))?;

        serde_json::from_str::<Document>(&content)
            .map(Some)
            .map_err(|e| ReelError::StoreLoadCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn write(&self) -> ReelResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReelError::StoreWrite {
                path: self.path.clone(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = self.temp_path();

        fs::write(&tmp_path, content).map_err(|source| ReelError::StoreWrite {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            ReelError::StoreWrite {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, namespace: Namespace<'_>, key: &str) -> Option<&Value> {
        store::lookup(&self.data, namespace, key)
    }

    fn put(&mut self, namespace: Namespace<'_>, key: &str, value: Value) {
        store::insert(&mut self.data, namespace, key, value);
        self.persist();
    }

    fn put_many(&mut self, entries: Vec<(Namespace<'_>, &str, Value)>) {
        for (namespace, key, value) in entries {
            store::insert(&mut self.data, namespace, key, value);
        }
        self.persist();
    }

    fn namespace_exists(&self, namespace: Namespace<'_>) -> bool {
        store::has_namespace(&self.data, namespace)
    }

    fn delete_key(&mut self, namespace: Namespace<'_>, key: &str) -> Option<Value> {
        store::remove(&mut self.data, namespace, key)
    }

    fn keys(&self, namespace: Namespace<'_>) -> Vec<String> {
        store::keys_of(&self.data, namespace)
    }

    fn persist(&self) -> bool {
        match self.write() {
            Ok(()) => {
                debug!("Persisted store {}", self.path.display());
                true
            }
            Err(e) => {
                warn!("{}; changes kept in memory only", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const NS: Namespace<'static> = Namespace::Named("Batch Counters");

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::open(temp.path().join("state.json"));

        assert!(!store.namespace_exists(NS));
        assert!(store.keys(Namespace::Root).is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn open_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::open(&path);
        assert!(store.keys(Namespace::Root).is_empty());
    }

    #[test]
    fn open_non_object_document_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonStore::open(&path);
        assert!(store.keys(Namespace::Root).is_empty());
    }

    #[test]
    fn put_writes_through_and_reloads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let mut store = JsonStore::open(&path);
        store.put(NS, "Batch 001", json!(4));

        assert_eq!(read_json(&path)["Batch Counters"]["Batch 001"], 4);

        let reopened = JsonStore::open(&path);
        assert_eq!(reopened.get_u64(NS, "Batch 001"), Some(4));
        assert!(reopened.key_exists(NS, "Batch 001"));
    }

    #[test]
    fn put_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deep").join("nested").join("state.json");

        let mut store = JsonStore::open(&path);
        store.put(Namespace::Root, "abc", json!("/tmp/x"));

        assert!(path.exists());
        assert!(!temp.path().join("deep/nested/.state.json.tmp").exists());
    }

    #[test]
    fn get_or_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::open(temp.path().join("state.json"));

        assert_eq!(store.get_or(NS, "missing", json!(0)), json!(0));
        assert_eq!(store.get_str(NS, "missing"), None);
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "i am a file").unwrap();

        let mut store = JsonStore::open(blocker.join("state.json"));
        store.put(NS, "label", json!(2));

        assert!(!store.persist());
        assert_eq!(store.get_u64(NS, "label"), Some(2));
    }

    #[test]
    fn delete_key_requires_persist() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let mut store = JsonStore::open(&path);
        store.put(Namespace::Root, "abc", json!("/videos/abc"));

        assert_eq!(store.delete_key(Namespace::Root, "abc"), Some(json!("/videos/abc")));
        assert!(!store.key_exists(Namespace::Root, "abc"));
        assert!(read_json(&path).get("abc").is_some());

        assert!(store.persist());
        assert!(read_json(&path).get("abc").is_none());
    }

    #[test]
    fn put_many_lands_in_one_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let mut store = JsonStore::open(&path);
        store.put_many(vec![
            (Namespace::Named("Batch Counters"), "L", json!(0)),
            (Namespace::Named("Batch Paths"), "L", json!("/img")),
            (Namespace::Named("Batch Patterns"), "L", json!("*.png")),
        ]);

        let doc = read_json(&path);
        assert_eq!(doc["Batch Counters"]["L"], 0);
        assert_eq!(doc["Batch Paths"]["L"], "/img");
        assert_eq!(doc["Batch Patterns"]["L"], "*.png");
    }

    #[test]
    fn keys_are_sorted() {
        let temp = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp.path().join("state.json"));
        store.put(NS, "b", json!(1));
        store.put(NS, "a", json!(2));

        assert_eq!(store.keys(NS), vec!["a", "b"]);
    }
}
