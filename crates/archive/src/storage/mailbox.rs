//! Mailboxes that restored messages are handed back to

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::{ArchivedMessage, MessageStatus};

/// An active mailbox (sent, drafts or inbox) that accepts restored messages
pub trait Mailbox: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Append a restored message
    fn append(&self, message: ArchivedMessage) -> Result<()>;
}

impl<M: Mailbox + ?Sized> Mailbox for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn append(&self, message: ArchivedMessage) -> Result<()> {
        (**self).append(message)
    }
}

/// The three mailboxes a message can be restored to
pub struct Mailboxes {
    pub sent: Box<dyn Mailbox>,
    pub drafts: Box<dyn Mailbox>,
    pub inbox: Box<dyn Mailbox>,
}

impl Mailboxes {
    pub fn new(sent: Box<dyn Mailbox>, drafts: Box<dyn Mailbox>, inbox: Box<dyn Mailbox>) -> Self {
        Self {
            sent,
            drafts,
            inbox,
        }
    }

    /// JSON file mailboxes (`sent.json`, `drafts.json`, `inbox.json`) in `dir`
    pub fn json_files(dir: &Path) -> Self {
        Self::new(
            Box::new(JsonFileMailbox::new("sent", dir.join(mailbox_file(MessageStatus::Sent)))),
            Box::new(JsonFileMailbox::new("drafts", dir.join(mailbox_file(MessageStatus::Draft)))),
            Box::new(JsonFileMailbox::new("inbox", dir.join(mailbox_file(MessageStatus::Received)))),
        )
    }

    /// Mailbox that receives messages with the given status on restore
    pub fn for_status(&self, status: MessageStatus) -> &dyn Mailbox {
        match status {
            MessageStatus::Sent => self.sent.as_ref(),
            MessageStatus::Draft => self.drafts.as_ref(),
            MessageStatus::Received => self.inbox.as_ref(),
        }
    }
}

/// File name of the mailbox that receives messages with `status`
pub fn mailbox_file(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Sent => "sent.json",
        MessageStatus::Draft => "drafts.json",
        MessageStatus::Received => "inbox.json",
    }
}

/// Mailbox held in memory
pub struct InMemoryMailbox {
    name: String,
    messages: Mutex<Vec<ArchivedMessage>>,
}

impl InMemoryMailbox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Messages appended so far
    pub fn messages(&self) -> Vec<ArchivedMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Mailbox for InMemoryMailbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, message: ArchivedMessage) -> Result<()> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}

/// Mailbox stored as a JSON array file
///
/// Each append reads the file, adds the message and writes it back.
pub struct JsonFileMailbox {
    name: String,
    path: PathBuf,
}

impl JsonFileMailbox {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Messages currently in the file
    pub fn messages(&self) -> Result<Vec<ArchivedMessage>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        config::load_json_file(&self.path)
    }
}

impl Mailbox for JsonFileMailbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, message: ArchivedMessage) -> Result<()> {
        let mut messages = self.messages()?;
        debug!("Appending {} to {} mailbox", message.id, self.name);
        messages.push(message);
        config::save_json_file(&self.path, &messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_archive;
    use tempfile::TempDir;

    #[test]
    fn test_for_status_routes_to_matching_mailbox() {
        let mailboxes = Mailboxes::new(
            Box::new(InMemoryMailbox::new("sent")),
            Box::new(InMemoryMailbox::new("drafts")),
            Box::new(InMemoryMailbox::new("inbox")),
        );

        assert_eq!(mailboxes.for_status(MessageStatus::Sent).name(), "sent");
        assert_eq!(mailboxes.for_status(MessageStatus::Draft).name(), "drafts");
        assert_eq!(mailboxes.for_status(MessageStatus::Received).name(), "inbox");
    }

    #[test]
    fn test_json_file_mailbox_appends() {
        let dir = TempDir::new().unwrap();
        let mailbox = JsonFileMailbox::new("inbox", dir.path().join("inbox.json"));
        let messages = sample_archive();

        mailbox.append(messages[0].clone()).unwrap();
        mailbox.append(messages[1].clone()).unwrap();

        let stored = mailbox.messages().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].id, messages[1].id);
    }

    #[test]
    fn test_json_files_layout() {
        let dir = TempDir::new().unwrap();
        let mailboxes = Mailboxes::json_files(dir.path());
        let draft = sample_archive()
            .into_iter()
            .find(|m| m.status == MessageStatus::Draft)
            .unwrap();

        mailboxes.for_status(draft.status).append(draft).unwrap();

        assert!(dir.path().join("drafts.json").exists());
        assert!(!dir.path().join("sent.json").exists());
    }
}
