//! Storage trait definitions

use crate::models::{ArchivedMessage, MessageId};
use anyhow::Result;
use std::collections::HashSet;

/// Partial update applied to an archived message
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub is_starred: Option<bool>,
    pub has_unread_replies: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub archive_reason: Option<String>,
}

impl MessagePatch {
    /// Patch that only sets the starred flag
    pub fn starred(is_starred: bool) -> Self {
        Self {
            is_starred: Some(is_starred),
            ..Self::default()
        }
    }

    /// Apply the patch to a message in place
    pub fn apply(&self, message: &mut ArchivedMessage) {
        if let Some(is_starred) = self.is_starred {
            message.is_starred = is_starred;
        }
        if let Some(has_unread_replies) = self.has_unread_replies {
            message.has_unread_replies = has_unread_replies;
        }
        if let Some(tags) = &self.tags {
            message.tags = tags.clone();
        }
        if let Some(reason) = &self.archive_reason {
            message.archive_reason = Some(reason.clone());
        }
    }
}

/// Trait for archive storage operations
///
/// The store is the authoritative, ordered collection of archived messages.
/// Insertion order is the default iteration order. Implementations never
/// persist on their own; persistence is driven by the controller.
pub trait ArchiveStore: Send + Sync {
    /// Append a message
    ///
    /// Fails with `ArchiveError::DuplicateId` if the ID is already present
    /// and `ArchiveError::InvalidMessage` if the message breaks an invariant.
    fn insert(&self, message: ArchivedMessage) -> Result<()>;

    /// Remove every message whose ID is in `ids`
    ///
    /// Unknown IDs are ignored. Returns the number of messages removed.
    fn remove_many(&self, ids: &HashSet<MessageId>) -> Result<usize>;

    /// Apply a partial update to a message
    ///
    /// Fails with `ArchiveError::NotFound` if the ID is absent.
    fn update(&self, id: &MessageId, patch: &MessagePatch) -> Result<()>;

    /// Remove all messages
    fn clear(&self) -> Result<()>;

    /// Independent copy of all messages in insertion order
    fn snapshot(&self) -> Result<Vec<ArchivedMessage>>;

    /// Get a copy of a message by ID
    fn get(&self, id: &MessageId) -> Result<Option<ArchivedMessage>>;

    /// Check if a message exists
    fn contains(&self, id: &MessageId) -> Result<bool>;

    /// Count archived messages
    fn len(&self) -> Result<usize>;

    /// Check if the archive is empty
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
