//! Summary statistics over archived messages

use serde::{Deserialize, Serialize};

use crate::models::ArchivedMessage;

/// Aggregates over a sequence of archived messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Number of archived messages
    pub total: usize,
    /// Number of starred messages
    pub starred: usize,
    /// Number of messages with at least one attachment
    pub with_attachments: usize,
    /// Sum of thread lengths
    pub total_thread_messages: u64,
    /// Sum of content sizes in characters
    pub total_size: usize,
    /// Sum of estimated read times in minutes
    pub total_read_time: usize,
    /// Message with the earliest original date
    pub oldest: Option<ArchivedMessage>,
}

/// Compute statistics over `messages`
///
/// On ties for the oldest message, the first one in input order wins. An
/// empty input yields all zeros and no oldest message.
pub fn compute_stats(messages: &[ArchivedMessage]) -> ArchiveStats {
    let mut stats = ArchiveStats {
        total: messages.len(),
        ..ArchiveStats::default()
    };

    for message in messages {
        if message.is_starred {
            stats.starred += 1;
        }
        if message.has_attachments() {
            stats.with_attachments += 1;
        }
        stats.total_thread_messages += u64::from(message.message_count);
        stats.total_size += message.size();
        stats.total_read_time += message.estimated_read_time();
    }

    // min_by_key returns the first of several equal minimums
    stats.oldest = messages.iter().min_by_key(|m| m.original_date).cloned();
    stats
}

/// Format a byte count for display (e.g. "1.5 KB")
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
