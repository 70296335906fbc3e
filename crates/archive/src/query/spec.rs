//! Filter and sort specification for archive views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{MessageStatus, MessageType, ParseKindError, Priority};

/// Starred filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StarFilter {
    #[default]
    Any,
    Starred,
    Unstarred,
}

impl StarFilter {
    pub fn matches(&self, is_starred: bool) -> bool {
        match self {
            StarFilter::Any => true,
            StarFilter::Starred => is_starred,
            StarFilter::Unstarred => !is_starred,
        }
    }
}

/// Ordering applied to a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recently archived first
    #[default]
    ArchivedDesc,
    /// Most recent original date first
    OriginalDesc,
    SubjectAsc,
    SubjectDesc,
    /// Counterpart display name, A to Z
    CounterpartAsc,
    /// Largest content first
    SizeDesc,
    /// High, then medium, then low
    PriorityDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::ArchivedDesc,
        SortKey::OriginalDesc,
        SortKey::SubjectAsc,
        SortKey::SubjectDesc,
        SortKey::CounterpartAsc,
        SortKey::SizeDesc,
        SortKey::PriorityDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ArchivedDesc => "archived-desc",
            SortKey::OriginalDesc => "original-desc",
            SortKey::SubjectAsc => "subject-asc",
            SortKey::SubjectDesc => "subject-desc",
            SortKey::CounterpartAsc => "counterpart-asc",
            SortKey::SizeDesc => "size-desc",
            SortKey::PriorityDesc => "priority-desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseKindError;

    /// Accepts the canonical names plus the short forms used in the search box
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_lowercase().as_str() {
            "archived-desc" | "archived" | "archive-date" => SortKey::ArchivedDesc,
            "original-desc" | "original" | "date" => SortKey::OriginalDesc,
            "subject-asc" | "subject" => SortKey::SubjectAsc,
            "subject-desc" => SortKey::SubjectDesc,
            "counterpart-asc" | "counterpart" | "name" => SortKey::CounterpartAsc,
            "size-desc" | "size" => SortKey::SizeDesc,
            "priority-desc" | "priority" => SortKey::PriorityDesc,
            _ => {
                return Err(ParseKindError {
                    kind: "sort key",
                    value: s.to_string(),
                });
            }
        };
        Ok(key)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters and sort key used to derive a view from the store
///
/// Every filter is optional; `None` means no constraint. Filters combine
/// with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Case-insensitive substring matched against subject, content,
    /// counterpart name and tags
    pub search_text: Option<String>,
    pub status: Option<MessageStatus>,
    pub message_type: Option<MessageType>,
    pub priority: Option<Priority>,
    pub starred: StarFilter,
    pub course: Option<String>,
    pub sort: SortKey,
}

impl QuerySpec {
    /// Spec with no filters and the given ordering
    pub fn sorted_by(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn status(mut self, status: MessageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn starred(mut self, starred: StarFilter) -> Self {
        self.starred = starred;
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    /// Check if no filter is set (the sort key is ignored)
    pub fn has_no_filters(&self) -> bool {
        self.search_text
            .as_deref()
            .is_none_or(|t| t.trim().is_empty())
            && self.status.is_none()
            && self.message_type.is_none()
            && self.priority.is_none()
            && self.starred == StarFilter::Any
            && self.course.is_none()
    }
}
