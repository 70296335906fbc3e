//! Wires settings, storage backends and collaborators into a controller

use anyhow::Result;
use archive::actions::{ConfirmRequest, DirectoryExportSink};
use archive::query::QuerySpec;
use archive::settings::{ArchiveSettings, Backend};
use archive::storage::{
    ArchivePersistence, InMemoryArchiveStore, JsonFilePersistence, Mailboxes, SqlitePersistence,
};
use archive::{ArchiveController, ArchiveError, ArchivedMessage};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Per-invocation options that override settings
#[derive(Debug, Default)]
pub struct OpenOptions {
    /// Answer yes to every confirmation prompt
    pub assume_yes: bool,
    /// Export directory overriding the configured one
    pub export_dir: Option<PathBuf>,
}

/// Open the archive described by `settings`
pub fn open(settings: &ArchiveSettings, options: OpenOptions) -> Result<ArchiveController> {
    let persistence: Arc<dyn ArchivePersistence> = match settings.backend {
        Backend::Json => Arc::new(JsonFilePersistence::new(settings.archive_file()?)),
        Backend::Sqlite => Arc::new(SqlitePersistence::new(settings.database_file()?)?),
    };
    let data_dir = settings.data_dir()?;
    let export_dir = match options.export_dir {
        Some(dir) => dir,
        None => settings.export_dir()?,
    };
    info!(
        "Opening {} archive in {}",
        settings.backend,
        data_dir.display()
    );

    let assume_yes = options.assume_yes;
    ArchiveController::builder(Arc::new(InMemoryArchiveStore::new()))
        .persistence(persistence)
        .mailboxes(Mailboxes::json_files(&data_dir))
        .confirm(move |request: &ConfirmRequest| assume_yes || prompt_confirm(request))
        .export(DirectoryExportSink::new(export_dir))
        .query(QuerySpec::sorted_by(settings.default_sort))
        .build()
}

/// Ask a y/N question on stdin
fn prompt_confirm(request: &ConfirmRequest) -> bool {
    print!("{} [y/N] ", request.prompt());
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            warn!("Failed to read confirmation: {}", e);
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Archive each message, skipping ones that are already archived or invalid
///
/// Returns the number of messages added.
pub fn archive_all(
    controller: &mut ArchiveController,
    messages: Vec<ArchivedMessage>,
) -> Result<usize> {
    let mut added = 0;
    for message in messages {
        let id = message.id.clone();
        match controller.archive_message(message) {
            Ok(()) => added += 1,
            Err(e) => match e.downcast_ref::<ArchiveError>() {
                Some(ArchiveError::DuplicateId(_) | ArchiveError::InvalidMessage { .. }) => {
                    warn!("Skipping {}: {}", id, e);
                }
                _ => return Err(e),
            },
        }
    }
    Ok(added)
}
