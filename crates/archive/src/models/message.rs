//! Archived message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Attachment, Contact, Counterpart, MessageStatus, MessageType, Priority};
use crate::error::ArchiveError;

/// Characters per minute used for the read time estimate
const CHARS_PER_MINUTE: usize = 200;

/// Unique identifier for an archived message
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A message moved out of an active mailbox into the archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedMessage {
    pub id: MessageId,
    pub subject: String,
    pub content: String,
    /// Recipient for sent messages and drafts, sender for received ones
    #[serde(flatten)]
    pub counterpart: Counterpart,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    pub message_type: MessageType,
    pub priority: Priority,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// When the message was originally sent, received or saved
    pub original_date: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
    pub status: MessageStatus,
    /// Number of messages in the thread
    pub message_count: u32,
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub has_unread_replies: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_reason: Option<String>,
}

impl ArchivedMessage {
    /// Create a new message builder
    ///
    /// The status defaults to `Received` for a sender counterpart and
    /// `Sent` for a recipient counterpart.
    pub fn builder(id: impl Into<MessageId>, counterpart: Counterpart) -> ArchivedMessageBuilder {
        ArchivedMessageBuilder::new(id.into(), counterpart)
    }

    /// Content length in characters
    pub fn size(&self) -> usize {
        self.content.chars().count()
    }

    /// Estimated reading time in whole minutes
    pub fn estimated_read_time(&self) -> usize {
        self.size().div_ceil(CHARS_PER_MINUTE)
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    pub fn counterpart_name(&self) -> &str {
        self.counterpart.name()
    }

    /// Check the model invariants
    pub fn validate(&self) -> Result<(), ArchiveError> {
        let invalid = |reason: &str| ArchiveError::InvalidMessage {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.archived_at < self.original_date {
            return Err(invalid("archived before its original date"));
        }
        if self.last_activity < self.original_date {
            return Err(invalid("last activity precedes original date"));
        }
        if self.message_count == 0 {
            return Err(invalid("thread must contain at least one message"));
        }

        let expects_sender = self.status == MessageStatus::Received;
        if self.counterpart.is_sender() != expects_sender {
            return Err(invalid(if expects_sender {
                "received messages must carry a sender"
            } else {
                "sent messages and drafts must carry a recipient"
            }));
        }

        Ok(())
    }
}

/// Builder for creating ArchivedMessage instances
pub struct ArchivedMessageBuilder {
    id: MessageId,
    counterpart: Counterpart,
    subject: String,
    content: String,
    course: Option<String>,
    message_type: MessageType,
    priority: Priority,
    attachments: Vec<Attachment>,
    original_date: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    status: Option<MessageStatus>,
    message_count: u32,
    last_activity: Option<DateTime<Utc>>,
    tags: Vec<String>,
    is_starred: bool,
    has_unread_replies: bool,
    archive_reason: Option<String>,
}

impl ArchivedMessageBuilder {
    fn new(id: MessageId, counterpart: Counterpart) -> Self {
        Self {
            id,
            counterpart,
            subject: String::new(),
            content: String::new(),
            course: None,
            message_type: MessageType::General,
            priority: Priority::Medium,
            attachments: Vec::new(),
            original_date: None,
            archived_at: None,
            status: None,
            message_count: 1,
            last_activity: None,
            tags: Vec::new(),
            is_starred: false,
            has_unread_replies: false,
            archive_reason: None,
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn original_date(mut self, original_date: DateTime<Utc>) -> Self {
        self.original_date = Some(original_date);
        self
    }

    pub fn archived_at(mut self, archived_at: DateTime<Utc>) -> Self {
        self.archived_at = Some(archived_at);
        self
    }

    pub fn status(mut self, status: MessageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn message_count(mut self, message_count: u32) -> Self {
        self.message_count = message_count;
        self
    }

    pub fn last_activity(mut self, last_activity: DateTime<Utc>) -> Self {
        self.last_activity = Some(last_activity);
        self
    }

    /// Set the tags; duplicates are dropped keeping the first occurrence
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn starred(mut self, is_starred: bool) -> Self {
        self.is_starred = is_starred;
        self
    }

    pub fn unread_replies(mut self, has_unread_replies: bool) -> Self {
        self.has_unread_replies = has_unread_replies;
        self
    }

    pub fn archive_reason(mut self, reason: impl Into<String>) -> Self {
        self.archive_reason = Some(reason.into());
        self
    }

    pub fn build(self) -> ArchivedMessage {
        let original_date = self.original_date.unwrap_or_else(Utc::now);
        let status = self.status.unwrap_or(if self.counterpart.is_sender() {
            MessageStatus::Received
        } else {
            MessageStatus::Sent
        });

        ArchivedMessage {
            id: self.id,
            subject: self.subject,
            content: self.content,
            counterpart: self.counterpart,
            course: self.course,
            message_type: self.message_type,
            priority: self.priority,
            attachments: self.attachments,
            original_date,
            archived_at: self
                .archived_at
                .unwrap_or_else(|| Utc::now().max(original_date)),
            status,
            message_count: self.message_count,
            last_activity: self.last_activity.unwrap_or(original_date),
            tags: self.tags,
            is_starred: self.is_starred,
            has_unread_replies: self.has_unread_replies,
            archive_reason: self.archive_reason,
        }
    }
}

/// Convenience for building a recipient counterpart
pub fn recipient(id: &str, name: &str, email: &str) -> Counterpart {
    Counterpart::Recipient(Contact::new(id, name, email))
}

/// Convenience for building a sender counterpart
pub fn sender(id: &str, name: &str, email: &str) -> Counterpart {
    Counterpart::Sender(Contact::new(id, name, email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn received(id: &str) -> ArchivedMessageBuilder {
        ArchivedMessage::builder(id, sender("u1", "Prof. Chen", "chen@uni.edu"))
    }

    #[test]
    fn test_size_and_read_time() {
        let msg = received("m1").content("a".repeat(401)).build();
        assert_eq!(msg.size(), 401);
        assert_eq!(msg.estimated_read_time(), 3);

        let empty = received("m2").build();
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.estimated_read_time(), 0);
    }

    #[test]
    fn test_size_counts_characters_not_bytes() {
        let msg = received("m1").content("héllo").build();
        assert_eq!(msg.size(), 5);
    }

    #[test]
    fn test_status_defaults_from_counterpart() {
        assert_eq!(received("m1").build().status, MessageStatus::Received);
        let sent = ArchivedMessage::builder("m2", recipient("u2", "Registrar", "reg@uni.edu")).build();
        assert_eq!(sent.status, MessageStatus::Sent);
    }

    #[test]
    fn test_tags_deduplicated() {
        let msg = received("m1").tags(["exam", "grades", "exam"]).build();
        assert_eq!(msg.tags, vec!["exam", "grades"]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(received("m1").build().validate().is_ok());
    }

    #[test]
    fn test_validate_archived_before_original() {
        let now = Utc::now();
        let msg = received("m1")
            .original_date(now)
            .archived_at(now - Duration::days(1))
            .build();
        assert!(matches!(msg.validate(), Err(ArchiveError::InvalidMessage { .. })));
    }

    #[test]
    fn test_validate_counterpart_matches_status() {
        let msg = received("m1").status(MessageStatus::Draft).build();
        let err = msg.validate().unwrap_err();
        assert_eq!(
            err,
            ArchiveError::InvalidMessage {
                id: MessageId::new("m1"),
                reason: "sent messages and drafts must carry a recipient".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_zero_message_count() {
        let msg = received("m1").message_count(0).build();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let msg = received("m1")
            .subject("Grades")
            .course("CS201")
            .starred(true)
            .build();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"]["name"], "Prof. Chen");
        assert!(json.get("recipient").is_none());
        assert_eq!(json["messageType"], "general");
        assert_eq!(json["isStarred"], true);
        assert_eq!(json["course"], "CS201");

        let back: ArchivedMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_json_with_both_counterparts_rejected() {
        let mut json = serde_json::to_value(received("m1").build()).unwrap();
        json["recipient"] = serde_json::json!({
            "id": "u2",
            "name": "Registrar",
            "email": "reg@uni.edu"
        });

        let err = serde_json::from_value::<ArchivedMessage>(json).unwrap_err();
        assert!(err.to_string().contains("found both"));
    }

    #[test]
    fn test_json_without_counterpart_rejected() {
        let mut json = serde_json::to_value(received("m1").build()).unwrap();
        json.as_object_mut().unwrap().remove("sender");

        assert!(serde_json::from_value::<ArchivedMessage>(json).is_err());
    }
}
