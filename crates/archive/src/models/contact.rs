//! People and files attached to an archived message

use serde::{Deserialize, Serialize};

/// A user on the other side of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// User ID
    pub id: String,
    /// Display name (e.g., "Dr. Sarah Johnson")
    pub name: String,
    /// Email address
    pub email: String,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// The other party of an archived message
///
/// Sent messages and drafts carry the recipient, received messages carry
/// the sender. Serialized as a single `recipient` or `sender` key; input
/// with both keys or neither is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CounterpartFields", into = "CounterpartFields")]
pub enum Counterpart {
    Recipient(Contact),
    Sender(Contact),
}

/// Wire form of [`Counterpart`]
#[derive(Serialize, Deserialize)]
struct CounterpartFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<Contact>,
}

impl TryFrom<CounterpartFields> for Counterpart {
    type Error = String;

    fn try_from(fields: CounterpartFields) -> Result<Self, Self::Error> {
        match (fields.recipient, fields.sender) {
            (Some(contact), None) => Ok(Counterpart::Recipient(contact)),
            (None, Some(contact)) => Ok(Counterpart::Sender(contact)),
            (Some(_), Some(_)) => Err("expected one of `recipient` or `sender`, found both".to_string()),
            (None, None) => Err("missing `recipient` or `sender`".to_string()),
        }
    }
}

impl From<Counterpart> for CounterpartFields {
    fn from(counterpart: Counterpart) -> Self {
        match counterpart {
            Counterpart::Recipient(contact) => Self {
                recipient: Some(contact),
                sender: None,
            },
            Counterpart::Sender(contact) => Self {
                recipient: None,
                sender: Some(contact),
            },
        }
    }
}

impl Counterpart {
    pub fn contact(&self) -> &Contact {
        match self {
            Counterpart::Recipient(c) | Counterpart::Sender(c) => c,
        }
    }

    pub fn name(&self) -> &str {
        &self.contact().name
    }

    pub fn is_sender(&self) -> bool {
        matches!(self, Counterpart::Sender(_))
    }
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}
