//! Plain-text rendering of archive views

use archive::actions::RestoreOutcome;
use archive::models::{ArchivedMessage, Counterpart};
use archive::stats::{ArchiveStats, format_size};
use chrono::{DateTime, Datelike, Local, Utc};

const SUBJECT_WIDTH: usize = 36;
const NAME_WIDTH: usize = 24;

/// Render the message list as a table
pub fn message_table(messages: &[ArchivedMessage]) -> String {
    if messages.is_empty() {
        return "No archived messages\n".to_string();
    }

    let id_width = messages
        .iter()
        .map(|m| m.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = format!(
        "{:<id_width$}  {}  {:<SUBJECT_WIDTH$}  {:<NAME_WIDTH$}  {:<7}  {:<6}  {}\n",
        "ID", " ", "SUBJECT", "WITH", "COURSE", "PRI", "ARCHIVED"
    );
    for message in messages {
        out.push_str(&format!(
            "{:<id_width$}  {}  {:<SUBJECT_WIDTH$}  {:<NAME_WIDTH$}  {:<7}  {:<6}  {}\n",
            message.id.as_str(),
            if message.is_starred { "*" } else { " " },
            truncate(&message.subject, SUBJECT_WIDTH),
            truncate(&counterpart_label(&message.counterpart), NAME_WIDTH),
            message.course.as_deref().unwrap_or("-"),
            message.priority.as_str(),
            format_date(message.archived_at),
        ));
    }
    out
}

/// Render full details of one message
pub fn message_detail(message: &ArchivedMessage) -> String {
    let contact = message.counterpart.contact();
    let mut out = String::new();

    out.push_str(&format!("{}\n", message.subject));
    out.push_str(&format!("{}\n\n", "=".repeat(message.subject.chars().count())));
    out.push_str(&format!("ID:         {}\n", message.id));
    out.push_str(&format!(
        "{}       {} <{}>\n",
        if message.counterpart.is_sender() { "From:" } else { "To:  " },
        contact.name,
        contact.email
    ));
    out.push_str(&format!("Status:     {}\n", message.status));
    out.push_str(&format!("Type:       {}\n", message.message_type));
    out.push_str(&format!("Priority:   {}\n", message.priority));
    if let Some(course) = &message.course {
        out.push_str(&format!("Course:     {}\n", course));
    }
    out.push_str(&format!("Sent:       {}\n", format_timestamp(message.original_date)));
    out.push_str(&format!("Archived:   {}\n", format_timestamp(message.archived_at)));
    out.push_str(&format!(
        "Thread:     {} message(s), last activity {}\n",
        message.message_count,
        format_timestamp(message.last_activity)
    ));
    if !message.tags.is_empty() {
        out.push_str(&format!("Tags:       {}\n", message.tags.join(", ")));
    }
    if message.is_starred {
        out.push_str("Starred:    yes\n");
    }
    if message.has_unread_replies {
        out.push_str("Unread replies waiting\n");
    }
    if let Some(reason) = &message.archive_reason {
        out.push_str(&format!("Reason:     {}\n", reason));
    }

    if !message.attachments.is_empty() {
        out.push_str("\nAttachments:\n");
        for attachment in &message.attachments {
            out.push_str(&format!(
                "  {} ({}, {})\n",
                attachment.name,
                format_size(attachment.size),
                attachment.mime_type
            ));
        }
    }

    out.push_str(&format!(
        "\n{}\n\n({} characters, about {} min read)\n",
        message.content,
        message.size(),
        message.estimated_read_time()
    ));
    out
}

/// Render archive statistics
pub fn stats_summary(stats: &ArchiveStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Archived messages:  {}\n", stats.total));
    out.push_str(&format!("Starred:            {}\n", stats.starred));
    out.push_str(&format!("With attachments:   {}\n", stats.with_attachments));
    out.push_str(&format!("Thread messages:    {}\n", stats.total_thread_messages));
    out.push_str(&format!("Content length:     {} characters\n", stats.total_size));
    out.push_str(&format!("Reading time:       {} min\n", stats.total_read_time));
    match &stats.oldest {
        Some(oldest) => out.push_str(&format!(
            "Oldest:             {} ({})\n",
            oldest.subject,
            format_date(oldest.original_date)
        )),
        None => out.push_str("Oldest:             -\n"),
    }
    out
}

/// Render the result of a restore
pub fn restore_report(outcome: &RestoreOutcome) -> String {
    let mut out = format!("Restored {} message(s)\n", outcome.restored.len());
    for failure in &outcome.failed {
        out.push_str(&format!("  failed {}: {}\n", failure.id, failure.reason));
    }
    out
}

fn counterpart_label(counterpart: &Counterpart) -> String {
    match counterpart {
        Counterpart::Recipient(contact) => format!("To: {}", contact.name),
        Counterpart::Sender(contact) => format!("From: {}", contact.name),
    }
}

/// Shorten to `max` characters, ending with an ellipsis when cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn format_date(ts: DateTime<Utc>) -> String {
    let local = ts.with_timezone(&Local);
    let now = Utc::now().with_timezone(&Local);

    if local.date_naive() == now.date_naive() {
        // Today: show time
        local.format("%H:%M").to_string()
    } else if local.year() == now.year() {
        local.format("%b %d").to_string()
    } else {
        local.format("%b %d %Y").to_string()
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    let local: DateTime<Local> = ts.into();
    local.format("%b %d %Y at %H:%M").to_string()
}
