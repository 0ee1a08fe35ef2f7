//! Persistent key/value storage
//!
//! Every piece of state reelstate keeps lives in a single JSON document per
//! backing file. Top-level keys are namespaces, each holding an object of
//! key -> value pairs. The content cache uses the document's top level
//! directly (`Namespace::Root`), the batch cursors use named namespaces.
//!
//! # Failure Model
//!
//! Stores are best-effort indexes, not systems of record:
//!
//! | Event | Outcome |
//! |-------|---------|
//! | Missing file | Start empty |
//! | Unreadable or malformed file | Log a warning, start empty |
//! | Write failure | Log a warning, in-memory state stays updated |
//!
//! Nothing in this module returns an error to the caller.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use serde_json::{Map, Value};
use std::fmt;

/// In-memory form of a store document
pub type Document = Map<String, Value>;

/// Addresses a group of keys inside a store document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace<'a> {
    /// The document's own top-level keys (flat layout)
    Root,
    /// Keys nested under a named top-level object
    Named(&'a str),
}

impl fmt::Display for Namespace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "<root>"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Namespace-scoped access to persisted state
///
/// Mutating calls (`put`, `put_many`) are write-through: the whole document
/// is persisted before they return. `delete_key` is the exception and leaves
/// persisting to the caller, so several removals can share one write.
pub trait KeyValueStore {
    /// Look up a value
    fn get(&self, namespace: Namespace<'_>, key: &str) -> Option<&Value>;

    /// Insert or overwrite a value, then persist
    fn put(&mut self, namespace: Namespace<'_>, key: &str, value: Value);

    /// Apply several inserts, then persist once
    fn put_many(&mut self, entries: Vec<(Namespace<'_>, &str, Value)>);

    /// Whether the namespace holds any state at all
    fn namespace_exists(&self, namespace: Namespace<'_>) -> bool;

    /// Remove a key without persisting
    fn delete_key(&mut self, namespace: Namespace<'_>, key: &str) -> Option<Value>;

    /// Keys of a namespace, sorted
    fn keys(&self, namespace: Namespace<'_>) -> Vec<String>;

    /// Write the current state out, returning whether it reached storage
    fn persist(&self) -> bool;

    /// Whether a key is present
    fn key_exists(&self, namespace: Namespace<'_>, key: &str) -> bool {
        self.get(namespace, key).is_some()
    }

    /// Look up a value, falling back to `default`
    fn get_or(&self, namespace: Namespace<'_>, key: &str, default: Value) -> Value {
        self.get(namespace, key).cloned().unwrap_or(default)
    }

    /// Look up a string value
    fn get_str(&self, namespace: Namespace<'_>, key: &str) -> Option<&str> {
        self.get(namespace, key).and_then(Value::as_str)
    }

    /// Look up a non-negative integer value
    fn get_u64(&self, namespace: Namespace<'_>, key: &str) -> Option<u64> {
        self.get(namespace, key).and_then(Value::as_u64)
    }
}

pub(crate) fn lookup<'d>(doc: &'d Document, namespace: Namespace<'_>, key: &str) -> Option<&'d Value> {
    scope(doc, namespace).and_then(|map| map.get(key))
}

pub(crate) fn insert(doc: &mut Document, namespace: Namespace<'_>, key: &str, value: Value) {
    scope_mut(doc, namespace).insert(key.to_string(), value);
}

pub(crate) fn remove(doc: &mut Document, namespace: Namespace<'_>, key: &str) -> Option<Value> {
    match namespace {
        Namespace::Root => doc.remove(key),
        Namespace::Named(name) => doc
            .get_mut(name)
            .and_then(Value::as_object_mut)
            .and_then(|map| map.remove(key)),
    }
}

pub(crate) fn has_namespace(doc: &Document, namespace: Namespace<'_>) -> bool {
    match namespace {
        Namespace::Root => true,
        Namespace::Named(_) => scope(doc, namespace).is_some(),
    }
}

pub(crate) fn keys_of(doc: &Document, namespace: Namespace<'_>) -> Vec<String> {
    scope(doc, namespace)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn scope<'d>(doc: &'d Document, namespace: Namespace<'_>) -> Option<&'d Map<String, Value>> {
    match namespace {
        Namespace::Root => Some(doc),
        Namespace::Named(name) => doc.get(name).and_then(Value::as_object),
    }
}

fn scope_mut<'d>(doc: &'d mut Document, namespace: Namespace<'_>) -> &'d mut Map<String, Value> {
    match namespace {
        Namespace::Root => doc,
        Namespace::Named(name) => {
            let slot = doc
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            // A scalar where a namespace belongs is replaced wholesale
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(map) => map,
                _ => unreachable!("namespace slot is always an object here"),
            }
        }
    }
}
