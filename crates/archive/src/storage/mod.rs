//! Storage traits and implementations
//!
//! `ArchiveStore` is the authoritative in-memory collection. Persistence
//! backends and mailboxes are collaborators the controller writes to after
//! the store has changed.

mod mailbox;
mod memory;
mod persistence;
mod sqlite;
mod traits;

pub use mailbox::{InMemoryMailbox, JsonFileMailbox, Mailbox, Mailboxes, mailbox_file};
pub use memory::InMemoryArchiveStore;
pub use persistence::{ARCHIVE_FILE, ArchivePersistence, JsonFilePersistence, MemoryPersistence};
pub use sqlite::SqlitePersistence;
pub use traits::{ArchiveStore, MessagePatch};
