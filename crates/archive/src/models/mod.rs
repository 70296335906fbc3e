//! Domain models for archived messages

mod contact;
mod kinds;
mod message;

pub use contact::{Attachment, Contact, Counterpart};
pub use kinds::{MessageStatus, MessageType, ParseKindError, Priority};
pub use message::{ArchivedMessage, ArchivedMessageBuilder, MessageId, recipient, sender};
