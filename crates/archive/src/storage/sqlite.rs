//! SQLite-backed archive persistence

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, Row, params};
use rusqlite_migration::{M, Migrations};

use super::ArchivePersistence;
use crate::models::{ArchivedMessage, Contact, Counterpart, MessageId};

/// Database migrations
///
/// Each migration is applied in order. The user_version pragma tracks which
/// migrations have been applied.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // Migration 1: Initial schema
        M::up(
            r#"
            CREATE TABLE archived_messages (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                subject TEXT NOT NULL,
                content TEXT NOT NULL,
                counterpart_role TEXT NOT NULL CHECK (counterpart_role IN ('recipient', 'sender')),
                counterpart_id TEXT NOT NULL,
                counterpart_name TEXT NOT NULL,
                counterpart_email TEXT NOT NULL,
                counterpart_avatar TEXT,
                course TEXT,
                message_type TEXT NOT NULL,
                priority TEXT NOT NULL,
                attachments TEXT NOT NULL DEFAULT '[]',  -- JSON array
                original_date TEXT NOT NULL,
                archived_at TEXT NOT NULL,
                status TEXT NOT NULL,
                message_count INTEGER NOT NULL DEFAULT 1,
                last_activity TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',  -- JSON array
                is_starred INTEGER NOT NULL DEFAULT 0,
                has_unread_replies INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_archived_messages_position
                ON archived_messages(position ASC);
            "#,
        ),
        // Migration 2: Record why a message was archived
        M::up("ALTER TABLE archived_messages ADD COLUMN archive_reason TEXT;"),
    ])
}

const SELECT_COLUMNS: &str = "id, subject, content, counterpart_role, counterpart_id,
    counterpart_name, counterpart_email, counterpart_avatar, course, message_type,
    priority, attachments, original_date, archived_at, status, message_count,
    last_activity, tags, is_starred, has_unread_replies, archive_reason";

/// SQLite-based archive persistence
///
/// `save` rewrites the whole table in one transaction; the `position`
/// column keeps the store's insertion order.
pub struct SqlitePersistence {
    conn: Mutex<Connection>,
}

impl SqlitePersistence {
    /// Open (or create) the archive database at `db_path`
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", db_path.as_ref()))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        // Enable WAL mode
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;

        migrations()
            .to_latest(&mut conn)
            .context("Failed to run database migrations")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Archive database lock poisoned"))
    }
}

/// Raw column values for one archived message
struct StoredRow {
    id: String,
    subject: String,
    content: String,
    counterpart_role: String,
    counterpart: Contact,
    course: Option<String>,
    message_type: String,
    priority: String,
    attachments: String,
    original_date: String,
    archived_at: String,
    status: String,
    message_count: u32,
    last_activity: String,
    tags: String,
    is_starred: bool,
    has_unread_replies: bool,
    archive_reason: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject: row.get(1)?,
            content: row.get(2)?,
            counterpart_role: row.get(3)?,
            counterpart: Contact {
                id: row.get(4)?,
                name: row.get(5)?,
                email: row.get(6)?,
                avatar: row.get(7)?,
            },
            course: row.get(8)?,
            message_type: row.get(9)?,
            priority: row.get(10)?,
            attachments: row.get(11)?,
            original_date: row.get(12)?,
            archived_at: row.get(13)?,
            status: row.get(14)?,
            message_count: row.get(15)?,
            last_activity: row.get(16)?,
            tags: row.get(17)?,
            is_starred: row.get(18)?,
            has_unread_replies: row.get(19)?,
            archive_reason: row.get(20)?,
        })
    }

    fn into_message(self) -> Result<ArchivedMessage> {
        let counterpart = match self.counterpart_role.as_str() {
            "sender" => Counterpart::Sender(self.counterpart),
            _ => Counterpart::Recipient(self.counterpart),
        };

        Ok(ArchivedMessage {
            subject: self.subject,
            content: self.content,
            counterpart,
            course: self.course,
            message_type: self.message_type.parse()?,
            priority: self.priority.parse()?,
            attachments: serde_json::from_str(&self.attachments)
                .with_context(|| format!("Invalid attachments for {}", self.id))?,
            original_date: parse_timestamp(&self.original_date)?,
            archived_at: parse_timestamp(&self.archived_at)?,
            status: self.status.parse()?,
            message_count: self.message_count,
            last_activity: parse_timestamp(&self.last_activity)?,
            tags: serde_json::from_str(&self.tags)
                .with_context(|| format!("Invalid tags for {}", self.id))?,
            is_starred: self.is_starred,
            has_unread_replies: self.has_unread_replies,
            archive_reason: self.archive_reason,
            id: MessageId::new(self.id),
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp: {}", value))?
        .with_timezone(&Utc))
}

impl ArchivePersistence for SqlitePersistence {
    fn load(&self) -> Result<Vec<ArchivedMessage>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM archived_messages ORDER BY position ASC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::into_message).collect()
    }

    fn save(&self, messages: &[ArchivedMessage]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM archived_messages", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO archived_messages
                 (id, position, subject, content, counterpart_role, counterpart_id,
                  counterpart_name, counterpart_email, counterpart_avatar, course,
                  message_type, priority, attachments, original_date, archived_at,
                  status, message_count, last_activity, tags, is_starred,
                  has_unread_replies, archive_reason)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;

            for (position, message) in messages.iter().enumerate() {
                let role = if message.counterpart.is_sender() {
                    "sender"
                } else {
                    "recipient"
                };
                let contact = message.counterpart.contact();

                stmt.execute(params![
                    message.id.as_str(),
                    position as i64,
                    message.subject,
                    message.content,
                    role,
                    contact.id,
                    contact.name,
                    contact.email,
                    contact.avatar,
                    message.course,
                    message.message_type.as_str(),
                    message.priority.as_str(),
                    serde_json::to_string(&message.attachments)?,
                    message.original_date.to_rfc3339(),
                    message.archived_at.to_rfc3339(),
                    message.status.as_str(),
                    message.message_count,
                    message.last_activity.to_rfc3339(),
                    serde_json::to_string(&message.tags)?,
                    message.is_starred,
                    message.has_unread_replies,
                    message.archive_reason,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Saved {} archived messages to SQLite", messages.len());
        Ok(())
    }
}
