//! In-memory archive store

use anyhow::Result;
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ArchiveStore, MessagePatch};
use crate::error::ArchiveError;
use crate::models::{ArchivedMessage, MessageId};

/// Messages in insertion order plus an ID index for duplicate checks
#[derive(Default)]
struct Inner {
    messages: Vec<ArchivedMessage>,
    ids: HashSet<MessageId>,
}

/// In-memory implementation of ArchiveStore
///
/// A single RwLock guards both the ordered list and the ID index so they
/// never disagree.
#[derive(Default)]
pub struct InMemoryArchiveStore {
    inner: RwLock<Inner>,
}

impl InMemoryArchiveStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with messages, rejecting duplicates and invalid entries
    pub fn with_messages(messages: impl IntoIterator<Item = ArchivedMessage>) -> Result<Self> {
        let store = Self::new();
        for message in messages {
            store.insert(message)?;
        }
        Ok(store)
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ArchiveStore for InMemoryArchiveStore {
    fn insert(&self, message: ArchivedMessage) -> Result<()> {
        message.validate()?;

        let mut inner = self.write();
        if inner.ids.contains(&message.id) {
            return Err(ArchiveError::DuplicateId(message.id).into());
        }
        inner.ids.insert(message.id.clone());
        inner.messages.push(message);
        Ok(())
    }

    fn remove_many(&self, ids: &HashSet<MessageId>) -> Result<usize> {
        let mut inner = self.write();
        let before = inner.messages.len();
        inner.messages.retain(|m| !ids.contains(&m.id));
        inner.ids.retain(|id| !ids.contains(id));
        Ok(before - inner.messages.len())
    }

    fn update(&self, id: &MessageId, patch: &MessagePatch) -> Result<()> {
        let mut inner = self.write();
        let message = inner
            .messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| ArchiveError::NotFound(id.clone()))?;
        patch.apply(message);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut inner = self.write();
        inner.messages.clear();
        inner.ids.clear();
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<ArchivedMessage>> {
        Ok(self.read().messages.clone())
    }

    fn get(&self, id: &MessageId) -> Result<Option<ArchivedMessage>> {
        Ok(self.read().messages.iter().find(|m| &m.id == id).cloned())
    }

    fn contains(&self, id: &MessageId) -> Result<bool> {
        Ok(self.read().ids.contains(id))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read().messages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counterpart, MessageStatus, recipient, sender};
    use chrono::{Duration, Utc};

    fn make_message(id: &str) -> ArchivedMessage {
        ArchivedMessage::builder(id, sender("u1", "Test User", "test@example.com"))
            .subject(format!("Subject {}", id))
            .content("Test body")
            .build()
    }

    fn ids(values: &[&str]) -> HashSet<MessageId> {
        values.iter().map(|v| MessageId::new(*v)).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryArchiveStore::new();
        store.insert(make_message("a1")).unwrap();

        let retrieved = store.get(&MessageId::new("a1")).unwrap();
        assert_eq!(retrieved.unwrap().subject, "Subject a1");
        assert!(store.contains(&MessageId::new("a1")).unwrap());
        assert!(store.get(&MessageId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let store = InMemoryArchiveStore::new();
        store.insert(make_message("a1")).unwrap();

        let err = store.insert(make_message("a1")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArchiveError>(),
            Some(&ArchiveError::DuplicateId(MessageId::new("a1")))
        );
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_insert_invalid_fails() {
        let store = InMemoryArchiveStore::new();
        let now = Utc::now();
        let msg = ArchivedMessage::builder("a1", recipient("u2", "Registrar", "reg@uni.edu"))
            .original_date(now)
            .last_activity(now - Duration::hours(1))
            .build();

        let err = store.insert(msg).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::InvalidMessage { .. })
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let store = InMemoryArchiveStore::new();
        for id in ["c", "a", "b"] {
            store.insert(make_message(id)).unwrap();
        }

        let order: Vec<_> = store
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let store = InMemoryArchiveStore::new();
        store.insert(make_message("a1")).unwrap();

        let mut snapshot = store.snapshot().unwrap();
        snapshot[0].is_starred = true;
        snapshot.clear();

        let stored = store.get(&MessageId::new("a1")).unwrap().unwrap();
        assert!(!stored.is_starred);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_many_is_idempotent() {
        let store = InMemoryArchiveStore::new();
        for id in ["a1", "a2", "a3"] {
            store.insert(make_message(id)).unwrap();
        }

        let targets = ids(&["a1", "a3", "unknown"]);
        assert_eq!(store.remove_many(&targets).unwrap(), 2);
        assert_eq!(store.remove_many(&targets).unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);

        // A removed id can be archived again
        store.insert(make_message("a1")).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_update_applies_patch() {
        let store = InMemoryArchiveStore::new();
        store.insert(make_message("a1")).unwrap();

        store
            .update(&MessageId::new("a1"), &MessagePatch::starred(true))
            .unwrap();
        let msg = store.get(&MessageId::new("a1")).unwrap().unwrap();
        assert!(msg.is_starred);
        assert_eq!(msg.status, MessageStatus::Received);
        assert!(matches!(msg.counterpart, Counterpart::Sender(_)));
    }

    #[test]
    fn test_update_missing_fails() {
        let store = InMemoryArchiveStore::new();
        let err = store
            .update(&MessageId::new("nope"), &MessagePatch::starred(true))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArchiveError>(),
            Some(&ArchiveError::NotFound(MessageId::new("nope")))
        );
    }

    #[test]
    fn test_clear() {
        let store = InMemoryArchiveStore::with_messages(vec![make_message("a1"), make_message("a2")])
            .unwrap();
        assert_eq!(store.len().unwrap(), 2);

        store.clear().unwrap();

        assert!(store.is_empty().unwrap());
        assert!(!store.contains(&MessageId::new("a1")).unwrap());
    }
}
