//! Persistence backends for the archive
//!
//! The in-memory store is authoritative while the application runs. A
//! persistence backend seeds it on startup and receives the full snapshot
//! after every successful mutation.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::ArchivedMessage;

/// Default archive file name, matching the browser storage key
pub const ARCHIVE_FILE: &str = "archived-messages.json";

/// Trait for loading and saving the whole archive
pub trait ArchivePersistence: Send + Sync {
    /// Load all archived messages in stored order
    fn load(&self) -> Result<Vec<ArchivedMessage>>;

    /// Replace the stored archive with `messages`
    fn save(&self, messages: &[ArchivedMessage]) -> Result<()>;
}

/// Archive stored as a JSON array in a single file
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchivePersistence for JsonFilePersistence {
    fn load(&self) -> Result<Vec<ArchivedMessage>> {
        if !self.path.exists() {
            debug!("No archive file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        config::load_json_file(&self.path)
    }

    fn save(&self, messages: &[ArchivedMessage]) -> Result<()> {
        config::save_json_file(&self.path, &messages)?;
        debug!("Saved {} archived messages to {}", messages.len(), self.path.display());
        Ok(())
    }
}

/// Archive kept in process memory
///
/// Useful for tests and dry runs where nothing should touch the disk.
#[derive(Default)]
pub struct MemoryPersistence {
    messages: Mutex<Vec<ArchivedMessage>>,
    saves: Mutex<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<ArchivedMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
            saves: Mutex::new(0),
        }
    }

    /// Messages from the most recent save
    pub fn saved(&self) -> Vec<ArchivedMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ArchivePersistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<ArchivedMessage>> {
        Ok(self.saved())
    }

    fn save(&self, messages: &[ArchivedMessage]) -> Result<()> {
        *self.messages.lock().unwrap_or_else(|e| e.into_inner()) = messages.to_vec();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
