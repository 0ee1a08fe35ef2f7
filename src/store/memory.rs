//! In-process store with no backing file

use crate::store::{self, Document, KeyValueStore, Namespace};
use serde_json::Value;

/// Store that lives only as long as the process
///
/// Same semantics as [`JsonStore`](crate::store::JsonStore) minus the disk,
/// so persisting always succeeds.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Document,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: Namespace<'_>, key: &str) -> Option<&Value> {
        store::lookup(&self.data, namespace, key)
    }

    fn put(&mut self, namespace: Namespace<'_>, key: &str, value: Value) {
        store::insert(&mut self.data, namespace, key, value);
    }

    fn put_many(&mut self, entries: Vec<(Namespace<'_>, &str, Value)>) {
        for (namespace, key, value) in entries {
            store::insert(&mut self.data, namespace, key, value);
        }
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
        true
    }
}
