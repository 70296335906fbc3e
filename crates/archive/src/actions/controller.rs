//! Archive controller
//!
//! Coordinates user actions between the store, the derived view and the
//! external collaborators (persistence, mailboxes, confirmation, export).

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use super::collaborators::{
    ArchiveObserver, ArchiveView, Confirm, ConfirmRequest, ExportSink, export_filename,
};
use crate::error::ArchiveError;
use crate::models::{ArchivedMessage, MessageId};
use crate::query::{QuerySpec, run_query};
use crate::stats::compute_stats;
use crate::storage::{ArchivePersistence, ArchiveStore, Mailboxes, MessagePatch};

/// A message that could not be restored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure {
    pub id: MessageId,
    pub reason: String,
}

/// Result of a batch restore
///
/// Restores are not atomic across IDs: messages handed off successfully
/// leave the archive even when others fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// IDs handed back to their mailbox and removed from the archive
    pub restored: Vec<MessageId>,
    /// IDs left in the archive
    pub failed: Vec<RestoreFailure>,
}

impl RestoreOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Restored IDs, or `ArchiveError::PartialFailure` listing the failed ones
    pub fn into_result(self) -> Result<Vec<MessageId>, ArchiveError> {
        if self.failed.is_empty() {
            Ok(self.restored)
        } else {
            Err(ArchiveError::PartialFailure {
                failed: self.failed.into_iter().map(|f| f.id).collect(),
            })
        }
    }
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub filename: String,
    pub count: usize,
    pub bytes: usize,
}

/// Orchestrates archive actions
///
/// Every successful mutation follows the same steps:
/// 1. Mutate the store
/// 2. Re-derive the view with the current query and publish it to observers
/// 3. Save the full snapshot through the persistence collaborator
///
/// A persistence failure is returned to the caller but does not roll back
/// the in-memory change.
pub struct ArchiveController {
    store: Arc<dyn ArchiveStore>,
    persistence: Option<Arc<dyn ArchivePersistence>>,
    mailboxes: Option<Mailboxes>,
    confirm: Option<Box<dyn Confirm>>,
    export: Option<Box<dyn ExportSink>>,
    observers: Vec<Box<dyn ArchiveObserver>>,
    query: QuerySpec,
    selection: BTreeSet<MessageId>,
    view: ArchiveView,
}

impl ArchiveController {
    /// Create a controller builder around a store
    pub fn builder(store: Arc<dyn ArchiveStore>) -> ArchiveControllerBuilder {
        ArchiveControllerBuilder::new(store)
    }

    /// The most recently published view
    pub fn view(&self) -> &ArchiveView {
        &self.view
    }

    /// The current query
    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ArchiveStore> {
        &self.store
    }

    /// Replace the query and re-derive the view
    pub fn set_query(&mut self, query: QuerySpec) -> Result<()> {
        self.query = query;
        self.refresh()
    }

    /// Register an observer; it receives every view published from now on
    pub fn add_observer(&mut self, observer: impl ArchiveObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add a message coming from one of the active mailboxes
    pub fn archive_message(&mut self, message: ArchivedMessage) -> Result<()> {
        let id = message.id.clone();
        self.store.insert(message)?;
        info!("Archived message {}", id);
        self.after_mutation()
    }

    /// Hand messages back to the mailbox they came from
    ///
    /// Sent messages go to the sent mailbox, drafts to drafts and received
    /// messages to the inbox. An ID whose handoff fails, or that is not in
    /// the archive, stays put and is reported in `failed`.
    pub fn restore(&mut self, ids: &[MessageId]) -> Result<RestoreOutcome> {
        let mailboxes = self
            .mailboxes
            .as_ref()
            .ok_or(ArchiveError::Unconfigured("mailboxes"))?;

        let mut outcome = RestoreOutcome::default();
        let mut seen = HashSet::new();

        for id in ids {
            if !seen.insert(id) {
                continue;
            }

            let Some(message) = self.store.get(id)? else {
                outcome.failed.push(RestoreFailure {
                    id: id.clone(),
                    reason: ArchiveError::NotFound(id.clone()).to_string(),
                });
                continue;
            };

            let mailbox = mailboxes.for_status(message.status);
            match mailbox.append(message) {
                Ok(()) => {
                    debug!("Handed {} to {} mailbox", id, mailbox.name());
                    outcome.restored.push(id.clone());
                }
                Err(e) => {
                    warn!("Failed to restore {} to {}: {:#}", id, mailbox.name(), e);
                    outcome.failed.push(RestoreFailure {
                        id: id.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        if !outcome.restored.is_empty() {
            let restored: HashSet<MessageId> = outcome.restored.iter().cloned().collect();
            self.store.remove_many(&restored)?;
            info!(
                "Restored {} message(s), {} failed",
                outcome.restored.len(),
                outcome.failed.len()
            );
            self.after_mutation()?;
        }

        Ok(outcome)
    }

    /// Permanently delete messages after confirmation
    ///
    /// Only IDs present in the archive are counted in the prompt. Returns
    /// `None` if the user declined, otherwise the number removed.
    pub fn delete_permanently(&mut self, ids: &[MessageId]) -> Result<Option<usize>> {
        let mut targets = HashSet::new();
        for id in ids {
            if self.store.contains(id)? {
                targets.insert(id.clone());
            }
        }
        if targets.is_empty() {
            return Ok(Some(0));
        }

        let request = ConfirmRequest::DeletePermanently {
            count: targets.len(),
        };
        if !self.ask(&request)? {
            info!("Permanent delete of {} message(s) declined", targets.len());
            return Ok(None);
        }

        let removed = self.store.remove_many(&targets)?;
        info!("Permanently deleted {} message(s)", removed);
        if removed > 0 {
            self.after_mutation()?;
        }
        Ok(Some(removed))
    }

    /// Toggle the starred flag
    ///
    /// Returns the new starred state.
    pub fn toggle_star(&mut self, id: &MessageId) -> Result<bool> {
        let message = self
            .store
            .get(id)?
            .ok_or_else(|| ArchiveError::NotFound(id.clone()))?;

        let new_starred = !message.is_starred;
        self.store.update(id, &MessagePatch::starred(new_starred))?;
        info!(
            "Toggled star for {} to {}",
            id,
            if new_starred { "starred" } else { "unstarred" }
        );

        self.after_mutation()?;
        Ok(new_starred)
    }

    /// Empty the archive after confirmation
    ///
    /// Returns `None` if the user declined, otherwise the number removed.
    pub fn clear_all(&mut self) -> Result<Option<usize>> {
        let count = self.store.len()?;
        if count == 0 {
            return Ok(Some(0));
        }

        if !self.ask(&ConfirmRequest::ClearAll { count })? {
            info!("Clearing archive declined");
            return Ok(None);
        }

        self.store.clear()?;
        info!("Cleared {} archived message(s)", count);
        self.after_mutation()?;
        Ok(Some(count))
    }

    /// Write the full archive (not the filtered view) as JSON to the export sink
    pub fn export_snapshot(&self) -> Result<ExportSummary> {
        let sink = self
            .export
            .as_ref()
            .ok_or(ArchiveError::Unconfigured("export sink"))?;

        let snapshot = self.store.snapshot()?;
        let contents = serde_json::to_string_pretty(&snapshot)?;
        let filename = export_filename(Utc::now().date_naive());

        sink.write(&filename, &contents)?;
        info!("Exported {} message(s) to {}", snapshot.len(), filename);

        Ok(ExportSummary {
            filename,
            count: snapshot.len(),
            bytes: contents.len(),
        })
    }

    // === Bulk selection ===

    /// Currently selected IDs in ascending order
    pub fn selected(&self) -> Vec<MessageId> {
        self.selection.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &MessageId) -> bool {
        self.selection.contains(id)
    }

    /// Add a message to the selection
    pub fn select(&mut self, id: &MessageId) -> Result<()> {
        if !self.store.contains(id)? {
            return Err(ArchiveError::NotFound(id.clone()).into());
        }
        self.selection.insert(id.clone());
        Ok(())
    }

    pub fn deselect(&mut self, id: &MessageId) {
        self.selection.remove(id);
    }

    /// Flip selection for a message; returns whether it is now selected
    pub fn toggle_selected(&mut self, id: &MessageId) -> Result<bool> {
        if self.selection.remove(id) {
            return Ok(false);
        }
        self.select(id)?;
        Ok(true)
    }

    /// Select every message in the current view
    pub fn select_all_visible(&mut self) {
        self.selection
            .extend(self.view.messages.iter().map(|m| m.id.clone()));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Restore the selected messages
    pub fn restore_selected(&mut self) -> Result<RestoreOutcome> {
        let ids = self.selected();
        self.restore(&ids)
    }

    /// Permanently delete the selected messages after confirmation
    pub fn delete_selected(&mut self) -> Result<Option<usize>> {
        let ids = self.selected();
        self.delete_permanently(&ids)
    }

    // === Internals ===

    fn ask(&self, request: &ConfirmRequest) -> Result<bool> {
        let confirm = self
            .confirm
            .as_ref()
            .ok_or(ArchiveError::Unconfigured("confirmation handler"))?;
        Ok(confirm.confirm(request))
    }

    /// Re-derive the view from the current store contents and publish it
    fn refresh(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot()?;
        self.publish(&snapshot);
        Ok(())
    }

    fn publish(&mut self, snapshot: &[ArchivedMessage]) {
        let messages = run_query(snapshot, &self.query);
        let present: HashSet<&MessageId> = snapshot.iter().map(|m| &m.id).collect();
        self.selection.retain(|id| present.contains(id));

        self.view = ArchiveView {
            stats: compute_stats(snapshot),
            visible_stats: compute_stats(&messages),
            messages,
        };
        debug!(
            "Refreshed archive view: {} of {} message(s) visible",
            self.view.messages.len(),
            snapshot.len()
        );

        for observer in &self.observers {
            observer.on_refresh(&self.view);
        }
    }

    fn after_mutation(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot()?;
        self.publish(&snapshot);

        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.save(&snapshot)
        {
            warn!("Archive changed in memory but could not be saved: {:#}", e);
            return Err(e);
        }
        Ok(())
    }
}

/// Builder for ArchiveController
pub struct ArchiveControllerBuilder {
    store: Arc<dyn ArchiveStore>,
    persistence: Option<Arc<dyn ArchivePersistence>>,
    mailboxes: Option<Mailboxes>,
    confirm: Option<Box<dyn Confirm>>,
    export: Option<Box<dyn ExportSink>>,
    observers: Vec<Box<dyn ArchiveObserver>>,
    query: QuerySpec,
}

impl ArchiveControllerBuilder {
    fn new(store: Arc<dyn ArchiveStore>) -> Self {
        Self {
            store,
            persistence: None,
            mailboxes: None,
            confirm: None,
            export: None,
            observers: Vec::new(),
            query: QuerySpec::default(),
        }
    }

    /// Backend that seeds the store on build and is saved after each mutation
    pub fn persistence(mut self, persistence: Arc<dyn ArchivePersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn mailboxes(mut self, mailboxes: Mailboxes) -> Self {
        self.mailboxes = Some(mailboxes);
        self
    }

    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    pub fn export(mut self, export: impl ExportSink + 'static) -> Self {
        self.export = Some(Box::new(export));
        self
    }

    pub fn observer(mut self, observer: impl ArchiveObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Initial query (defaults to no filters, most recently archived first)
    pub fn query(mut self, query: QuerySpec) -> Self {
        self.query = query;
        self
    }

    /// Seed the store from persistence and publish the initial view
    ///
    /// Stored messages that are duplicates or invalid are skipped with a
    /// warning rather than failing startup. They are not written back, so
    /// the next save drops them from the backend.
    pub fn build(self) -> Result<ArchiveController> {
        if let Some(persistence) = &self.persistence {
            let stored = persistence.load()?;
            let total = stored.len();
            let mut loaded = 0;
            for message in stored {
                let id = message.id.clone();
                match self.store.insert(message) {
                    Ok(()) => loaded += 1,
                    Err(e) => warn!(
                        "Skipping stored message {}: {:#} (it will be dropped on the next save)",
                        id, e
                    ),
                }
            }
            info!("Loaded {} of {} archived message(s)", loaded, total);
        }

        let mut controller = ArchiveController {
            store: self.store,
            persistence: self.persistence,
            mailboxes: self.mailboxes,
            confirm: self.confirm,
            export: self.export,
            observers: self.observers,
            query: self.query,
            selection: BTreeSet::new(),
            view: ArchiveView::default(),
        };
        controller.refresh()?;
        Ok(controller)
    }
}
