//! Archive crate - Business logic for archived messages
//!
//! This crate provides the archived-messages component of EduLink:
//! - Domain models (ArchivedMessage, Counterpart, Attachment)
//! - Storage trait abstractions with in-memory, JSON file and SQLite backends
//! - Query API that filters and sorts archive views
//! - Summary statistics
//! - Controller for user actions (restore, delete, star, clear, export)
//! - Settings loaded from the EduLink config directory
//!
//! This crate has no UI dependencies; front ends render the published
//! [`ArchiveView`].

pub mod actions;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod query;
pub mod settings;
pub mod stats;
pub mod storage;

pub use actions::{
    ArchiveController, ArchiveObserver, ArchiveView, Confirm, ConfirmRequest, DirectoryExportSink,
    ExportSink, ExportSummary, RestoreOutcome,
};
pub use error::ArchiveError;
pub use models::{ArchivedMessage, Attachment, Contact, Counterpart, MessageId, MessageStatus, MessageType, Priority};
pub use query::{QuerySpec, SortKey, StarFilter, parse_query, run_query};
pub use settings::{ArchiveSettings, Backend};
pub use stats::{ArchiveStats, compute_stats, format_size};
pub use storage::{
    ArchivePersistence, ArchiveStore, InMemoryArchiveStore, JsonFilePersistence, Mailbox, Mailboxes,
    MemoryPersistence, SqlitePersistence,
};
