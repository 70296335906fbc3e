//! Archive actions
//!
//! The controller mutates the store and notifies collaborators; the
//! collaborator traits let callers plug in persistence, mailboxes,
//! confirmation prompts, export destinations and view observers.

mod collaborators;
mod controller;

pub use collaborators::{
    ArchiveObserver, ArchiveView, Confirm, ConfirmRequest, DirectoryExportSink, ExportSink,
    MemoryExportSink, export_filename,
};
pub use controller::{
    ArchiveController, ArchiveControllerBuilder, ExportSummary, RestoreFailure, RestoreOutcome,
};
