//! Filtering and sorting of archive snapshots

use std::cmp::Reverse;

use super::{QuerySpec, SortKey};
use crate::models::ArchivedMessage;

/// Derive an ordered view from a snapshot
///
/// Returns the messages matching every filter in `spec`, sorted by
/// `spec.sort`. The sort is stable: messages with equal keys keep their
/// input order. The input is never modified.
pub fn run_query(messages: &[ArchivedMessage], spec: &QuerySpec) -> Vec<ArchivedMessage> {
    let needle = normalized_search(spec);
    let mut view: Vec<ArchivedMessage> = messages
        .iter()
        .filter(|m| matches(m, spec, needle.as_deref()))
        .cloned()
        .collect();

    sort_messages(&mut view, spec.sort);
    view
}

/// Check a single message against the filters of `spec`
pub fn matches_spec(message: &ArchivedMessage, spec: &QuerySpec) -> bool {
    matches(message, spec, normalized_search(spec).as_deref())
}

/// Lowercased search text, or `None` when blank
fn normalized_search(spec: &QuerySpec) -> Option<String> {
    spec.search_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn matches(message: &ArchivedMessage, spec: &QuerySpec, needle: Option<&str>) -> bool {
    if let Some(needle) = needle
        && !matches_text(message, needle)
    {
        return false;
    }

    spec.status.is_none_or(|s| message.status == s)
        && spec.message_type.is_none_or(|t| message.message_type == t)
        && spec.priority.is_none_or(|p| message.priority == p)
        && spec.starred.matches(message.is_starred)
        && spec
            .course
            .as_deref()
            .is_none_or(|c| message.course.as_deref() == Some(c))
}

/// `needle` must already be lowercase
fn matches_text(message: &ArchivedMessage, needle: &str) -> bool {
    message.subject.to_lowercase().contains(needle)
        || message.content.to_lowercase().contains(needle)
        || message.counterpart_name().to_lowercase().contains(needle)
        || message.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Sort in place with a stable sort
pub fn sort_messages(messages: &mut [ArchivedMessage], key: SortKey) {
    match key {
        SortKey::ArchivedDesc => messages.sort_by_key(|m| Reverse(m.archived_at)),
        SortKey::OriginalDesc => messages.sort_by_key(|m| Reverse(m.original_date)),
        SortKey::SubjectAsc => messages.sort_by(|a, b| a.subject.cmp(&b.subject)),
        SortKey::SubjectDesc => messages.sort_by(|a, b| b.subject.cmp(&a.subject)),
        SortKey::CounterpartAsc => {
            messages.sort_by(|a, b| a.counterpart_name().cmp(b.counterpart_name()))
        }
        SortKey::SizeDesc => messages.sort_by_key(|m| Reverse(m.size())),
        SortKey::PriorityDesc => messages.sort_by_key(|m| Reverse(m.priority)),
    }
}
