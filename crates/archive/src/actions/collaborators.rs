//! Collaborators the archive controller calls out to

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::ArchivedMessage;
use crate::stats::ArchiveStats;

/// Irreversible action awaiting the user's approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRequest {
    DeletePermanently { count: usize },
    ClearAll { count: usize },
}

impl ConfirmRequest {
    /// Question shown to the user
    pub fn prompt(&self) -> String {
        match self {
            ConfirmRequest::DeletePermanently { count } => format!(
                "Permanently delete {} archived message(s)? This action cannot be undone.",
                count
            ),
            ConfirmRequest::ClearAll { count } => format!(
                "Clear all {} archived message(s)? This action cannot be undone.",
                count
            ),
        }
    }
}

/// Yes/no prompt invoked before irreversible actions
///
/// Returning `false` aborts the action with no effect.
pub trait Confirm {
    fn confirm(&self, request: &ConfirmRequest) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&ConfirmRequest) -> bool,
{
    fn confirm(&self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}

/// Destination for exported archives (e.g. a download folder)
pub trait ExportSink {
    fn write(&self, filename: &str, contents: &str) -> Result<()>;
}

impl<S: ExportSink + ?Sized> ExportSink for Arc<S> {
    fn write(&self, filename: &str, contents: &str) -> Result<()> {
        (**self).write(filename, contents)
    }
}

/// Name of an export file created on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("archived-messages-{}.json", date.format("%Y-%m-%d"))
}

/// Writes exports as files in a directory
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path an export with `filename` is written to
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ExportSink for DirectoryExportSink {
    fn write(&self, filename: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create export directory: {}", self.dir.display()))?;
        let path = self.path_for(filename);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write export: {}", path.display()))
    }
}

/// Keeps exports in memory
#[derive(Default)]
pub struct MemoryExportSink {
    files: Mutex<Vec<(String, String)>>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(filename, contents)` pairs in write order
    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ExportSink for MemoryExportSink {
    fn write(&self, filename: &str, contents: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

/// Derived state published after every refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveView {
    /// Messages matching the current query, in display order
    pub messages: Vec<ArchivedMessage>,
    /// Statistics over the whole archive
    pub stats: ArchiveStats,
    /// Statistics over `messages` only
    pub visible_stats: ArchiveStats,
}

/// Receives the view whenever the controller re-derives it
pub trait ArchiveObserver {
    fn on_refresh(&self, view: &ArchiveView);
}

impl<F> ArchiveObserver for F
where
    F: Fn(&ArchiveView),
{
    fn on_refresh(&self, view: &ArchiveView) {
        self(view)
    }
}
