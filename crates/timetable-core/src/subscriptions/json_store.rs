//! JSON-document subscription store.
//!
//! The whole store is one file: `{ "<user id>": ["<owner id>", ...], ... }`.
//! Reads tolerate a missing or corrupt file by starting from an empty map;
//! writes replace the document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::{SubscriptionStore, UserId};

type Document = BTreeMap<String, Vec<String>>;

pub struct JsonSubscriptionStore {
    path: PathBuf,
}

impl JsonSubscriptionStore {
    /// Open the store at `path`, creating an empty document (and parent
    /// directories) when none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::InitFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }
        if !path.exists() {
            std::fs::write(&path, "{}").map_err(|e| StoreError::InitFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Document {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Document::new(),
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "subscription document corrupt, starting from empty");
                Document::new()
            }),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "subscription document unreadable, starting from empty");
                Document::new()
            }
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(doc).map_err(|e| StoreError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl SubscriptionStore for JsonSubscriptionStore {
    fn subscribe(&self, user: UserId, owner_id: &str) -> Result<bool, StoreError> {
        let mut doc = self.read_document();
        let entry = doc.entry(user.to_string()).or_default();
        if entry.iter().any(|s| s == owner_id) {
            return Ok(false);
        }
        entry.push(owner_id.to_string());
        self.write_document(&doc)?;
        Ok(true)
    }

    fn unsubscribe(&self, user: UserId, owner_id: &str) -> Result<bool, StoreError> {
        let mut doc = self.read_document();
        let Some(entry) = doc.get_mut(&user.to_string()) else {
            return Ok(false);
        };
        let before = entry.len();
        entry.retain(|s| s != owner_id);
        if entry.len() == before {
            return Ok(false);
        }
        if entry.is_empty() {
            doc.remove(&user.to_string());
        }
        self.write_document(&doc)?;
        Ok(true)
    }

    fn subscriptions(&self, user: UserId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read_document()
            .remove(&user.to_string())
            .unwrap_or_default())
    }

    fn subscribers(&self, owner_id: &str) -> Result<Vec<UserId>, StoreError> {
        Ok(self
            .read_document()
            .iter()
            .filter(|(_, owners)| owners.iter().any(|o| o == owner_id))
            .filter_map(|(user, _)| user.parse().ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, JsonSubscriptionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSubscriptionStore::open(dir.path().join("users.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn subscribe_is_idempotent() {
        let (_dir, store) = store();
        assert!(store.subscribe(100, "БПИ22-01").unwrap());
        assert!(!store.subscribe(100, "БПИ22-01").unwrap());
        assert_eq!(store.subscriptions(100).unwrap(), vec!["БПИ22-01"]);
        assert_eq!(store.subscribers("БПИ22-01").unwrap(), vec![100]);
    }

    #[test]
    fn unsubscribe_removes_only_existing_pairs() {
        let (_dir, store) = store();
        store.subscribe(100, "БПИ22-01").unwrap();
        assert!(store.unsubscribe(100, "БПИ22-01").unwrap());
        assert!(!store.unsubscribe(100, "БПИ22-01").unwrap());
        assert!(store.subscribers("БПИ22-01").unwrap().is_empty());
    }

    #[test]
    fn subscribers_spans_users() {
        let (_dir, store) = store();
        store.subscribe(1, "Иванов И.И.").unwrap();
        store.subscribe(2, "Иванов И.И.").unwrap();
        store.subscribe(2, "БПИ22-01").unwrap();
        let mut subs = store.subscribers("Иванов И.И.").unwrap();
        subs.sort_unstable();
        assert_eq!(subs, vec![1, 2]);
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonSubscriptionStore::open(&path).unwrap();
        assert!(store.subscriptions(100).unwrap().is_empty());
        // The store stays usable: the next write repairs the document.
        assert!(store.subscribe(100, "БПИ22-01").unwrap());
        assert_eq!(store.subscribers("БПИ22-01").unwrap(), vec![100]);
    }
}
