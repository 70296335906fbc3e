//! Integration tests for the archive crate
//!
//! These tests verify the complete flow from persistence through the
//! controller to the derived view.

use std::sync::Arc;

use archive::actions::ConfirmRequest;
use archive::fixtures::sample_archive;
use archive::models::{ArchivedMessage, MessageId, MessageStatus, Priority, sender};
use archive::query::{QuerySpec, SortKey, StarFilter, parse_query, run_query};
use archive::stats::compute_stats;
use archive::storage::{
    ArchivePersistence, ArchiveStore, InMemoryArchiveStore, JsonFileMailbox, JsonFilePersistence,
    Mailboxes, SqlitePersistence,
};
use archive::{ArchiveController, ArchiveError, DirectoryExportSink};
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn ids(messages: &[ArchivedMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

fn controller_with(persistence: Arc<dyn ArchivePersistence>, dir: &TempDir) -> ArchiveController {
    ArchiveController::builder(Arc::new(InMemoryArchiveStore::new()))
        .persistence(persistence)
        .mailboxes(Mailboxes::json_files(dir.path()))
        .confirm(|_: &ConfirmRequest| true)
        .export(DirectoryExportSink::new(dir.path().join("exports")))
        .build()
        .unwrap()
}

#[test]
fn test_json_persistence_round_trip_through_controller() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archived-messages.json");
    JsonFilePersistence::new(&path).save(&sample_archive()).unwrap();

    let mut controller = controller_with(Arc::new(JsonFilePersistence::new(&path)), &dir);
    assert_eq!(controller.view().stats.starred, 3);

    controller.toggle_star(&MessageId::new("arch-4")).unwrap();
    controller
        .delete_permanently(&[MessageId::new("arch-1"), MessageId::new("arch-2")])
        .unwrap();

    // A fresh controller sees the saved state
    let reopened = controller_with(Arc::new(JsonFilePersistence::new(&path)), &dir);
    assert_eq!(
        ids(&reopened.view().messages),
        vec!["arch-3", "arch-4", "arch-5", "arch-6"]
    );
    assert_eq!(reopened.view().stats.starred, 2);
}

#[test]
fn test_sqlite_persistence_round_trip_through_controller() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("archive.db");
    SqlitePersistence::new(&db_path)
        .unwrap()
        .save(&sample_archive())
        .unwrap();

    {
        let persistence = Arc::new(SqlitePersistence::new(&db_path).unwrap());
        let mut controller = controller_with(persistence, &dir);
        let outcome = controller
            .restore(&[MessageId::new("arch-1"), MessageId::new("arch-3")])
            .unwrap();
        assert!(outcome.is_complete());
    }

    let persistence = Arc::new(SqlitePersistence::new(&db_path).unwrap());
    let reopened = controller_with(persistence, &dir);
    assert_eq!(
        ids(&reopened.view().messages),
        vec!["arch-2", "arch-4", "arch-5", "arch-6"]
    );

    let sent = JsonFileMailbox::new("sent", dir.path().join("sent.json"));
    let drafts = JsonFileMailbox::new("drafts", dir.path().join("drafts.json"));
    assert_eq!(ids(&sent.messages().unwrap()), vec!["arch-1"]);
    assert_eq!(ids(&drafts.messages().unwrap()), vec!["arch-3"]);
}

#[test]
fn test_export_writes_full_archive() {
    let dir = TempDir::new().unwrap();
    let persistence = Arc::new(JsonFilePersistence::new(dir.path().join("archive.json")));
    persistence.save(&sample_archive()).unwrap();
    let mut controller = controller_with(persistence, &dir);
    controller.set_query(parse_query("is:starred")).unwrap();

    let summary = controller.export_snapshot().unwrap();

    let written = dir.path().join("exports").join(&summary.filename);
    let exported: Vec<ArchivedMessage> =
        serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(exported.len(), 6);
    assert_eq!(summary.count, 6);
}

#[test]
fn test_unfiltered_query_preserves_order() {
    let messages = sample_archive();
    let view = run_query(&messages, &QuerySpec::default());
    assert_eq!(view, messages);
}

#[test]
fn test_filters_are_subsets_and_idempotent() {
    let messages = sample_archive();
    let specs = [
        QuerySpec::default().status(MessageStatus::Received),
        QuerySpec::default().priority(Priority::Medium),
        QuerySpec::default().starred(StarFilter::Unstarred),
        QuerySpec::default().course("CS201"),
        parse_query("is:starred review"),
    ];

    for spec in &specs {
        let once = run_query(&messages, spec);
        assert!(once.len() <= messages.len());
        assert!(once.iter().all(|m| messages.contains(m)));
        assert_eq!(run_query(&once, spec), once);
    }
}

#[test]
fn test_sort_is_stable() {
    let messages = sample_archive();
    let sorted = run_query(&messages, &QuerySpec::sorted_by(SortKey::PriorityDesc));
    assert_eq!(
        ids(&sorted),
        vec!["arch-1", "arch-2", "arch-4", "arch-6", "arch-3", "arch-5"]
    );
}

#[test]
fn test_conference_search() {
    let messages = sample_archive();
    let view = run_query(&messages, &QuerySpec::default().search("CONFERENCE"));
    assert_eq!(ids(&view), vec!["arch-1"]);
}

#[test]
fn test_remove_many_is_idempotent() {
    let store = InMemoryArchiveStore::with_messages(sample_archive()).unwrap();
    let targets = [MessageId::new("arch-2"), MessageId::new("missing")]
        .into_iter()
        .collect();

    assert_eq!(store.remove_many(&targets).unwrap(), 1);
    assert_eq!(store.remove_many(&targets).unwrap(), 0);
    assert_eq!(store.len().unwrap(), 5);
}

#[test]
fn test_insert_snapshot_query_contains_once() {
    let store = InMemoryArchiveStore::with_messages(sample_archive()).unwrap();
    let original = Utc::now() - Duration::days(3);
    let message = ArchivedMessage::builder(
        "arch-new",
        sender("adm-1", "Registrar", "registrar@university.edu"),
    )
    .subject("Transcript Request")
    .content("Your transcript is ready for pickup.")
    .original_date(original)
    .build();

    store.insert(message).unwrap();
    let err = store
        .insert(store.get(&MessageId::new("arch-new")).unwrap().unwrap())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ArchiveError>(),
        Some(&ArchiveError::DuplicateId(MessageId::new("arch-new")))
    );

    let view = run_query(&store.snapshot().unwrap(), &QuerySpec::default());
    assert_eq!(view.iter().filter(|m| m.id.as_str() == "arch-new").count(), 1);
    assert_eq!(view[0].id.as_str(), "arch-new");
}

#[test]
fn test_stats_follow_view() {
    let messages = sample_archive();
    let starred = run_query(&messages, &QuerySpec::default().starred(StarFilter::Starred));
    let stats = compute_stats(&starred);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.starred, 3);
    assert_eq!(stats.oldest.unwrap().id.as_str(), "arch-5");
}
