//! Error types for archive operations
//!
//! Functions in this crate return `anyhow::Result`. Failures that callers
//! are expected to branch on are raised as [`ArchiveError`] and can be
//! recovered with `err.downcast_ref::<ArchiveError>()`.

use crate::models::MessageId;

/// Errors raised by the archive store and controller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    /// No archived message has this ID
    #[error("Archived message not found: {0}")]
    NotFound(MessageId),

    /// A message with this ID is already archived
    #[error("Archived message already exists: {0}")]
    DuplicateId(MessageId),

    /// The message breaks one of the model invariants
    #[error("Invalid archived message {id}: {reason}")]
    InvalidMessage { id: MessageId, reason: String },

    /// Some messages in a batch restore could not be handed off
    #[error("Failed to restore {} message(s): {}", failed.len(), join_ids(failed))]
    PartialFailure { failed: Vec<MessageId> },

    /// An operation needs a collaborator that was not configured
    #[error("No {0} configured")]
    Unconfigured(&'static str),
}

fn join_ids(ids: &[MessageId]) -> String {
    ids.iter().map(MessageId::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message_lists_ids() {
        let err = ArchiveError::PartialFailure {
            failed: vec![MessageId::new("a1"), MessageId::new("a2")],
        };
        assert_eq!(err.to_string(), "Failed to restore 2 message(s): a1, a2");
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = ArchiveError::NotFound(MessageId::new("x")).into();
        assert_eq!(
            err.downcast_ref::<ArchiveError>(),
            Some(&ArchiveError::NotFound(MessageId::new("x")))
        );
    }
}
