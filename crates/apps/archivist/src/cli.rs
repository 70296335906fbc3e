//! Command-line arguments

use archive::models::{MessageStatus, MessageType, Priority};
use archive::query::{QuerySpec, SortKey, StarFilter, parse_query_with};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Archivist - manage archived EduLink messages
#[derive(Parser, Debug)]
#[command(name = "archivist")]
#[command(version)]
#[command(about = "Browse, restore and export archived EduLink messages", long_about = None)]
pub struct Cli {
    /// Path to an archive settings file (defaults to ~/.config/edulink/archive.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List archived messages
    List(ListArgs),
    /// Show archive statistics
    Stats,
    /// Show a single archived message
    Show {
        /// Message ID
        id: String,
    },
    /// Toggle the star on a message
    Star {
        /// Message ID
        id: String,
    },
    /// Move messages back to the mailbox they were archived from
    Restore {
        /// Message IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Permanently delete messages
    Delete {
        /// Message IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Permanently delete every archived message
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the whole archive as JSON
    Export {
        /// Directory to write the export to (overrides settings)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Archive messages from a JSON file
    Import {
        /// JSON array of archived messages
        file: PathBuf,
    },
    /// Load the demo archive
    Seed,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Search box query, e.g. 'is:starred course:CS201 midterm'
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only messages archived from this mailbox (sent, received, draft)
    #[arg(long)]
    pub status: Option<MessageStatus>,

    /// Only messages of this type (academic, administrative, general)
    #[arg(long = "type")]
    pub message_type: Option<MessageType>,

    /// Only messages with this priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Only starred messages
    #[arg(long, conflicts_with = "unstarred")]
    pub starred: bool,

    /// Only unstarred messages
    #[arg(long)]
    pub unstarred: bool,

    /// Only messages for this course code
    #[arg(long)]
    pub course: Option<String>,

    /// Sort order (archived, original, subject, subject-desc, name, size, priority)
    #[arg(short, long)]
    pub sort: Option<SortKey>,
}

impl ListArgs {
    /// Combine the query string and flags; flags win over query operators
    pub fn to_query(&self, default_sort: SortKey) -> QuerySpec {
        let base = QuerySpec::sorted_by(default_sort);
        let mut spec = match self.query.as_deref() {
            Some(query) => parse_query_with(base, query),
            None => base,
        };
        if let Some(sort) = self.sort {
            spec.sort = sort;
        }

        if self.status.is_some() {
            spec.status = self.status;
        }
        if self.message_type.is_some() {
            spec.message_type = self.message_type;
        }
        if self.priority.is_some() {
            spec.priority = self.priority;
        }
        if self.course.is_some() {
            spec.course = self.course.clone();
        }
        if self.starred {
            spec.starred = StarFilter::Starred;
        } else if self.unstarred {
            spec.starred = StarFilter::Unstarred;
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::parse_from([
            "archivist", "list", "--type", "academic", "--priority", "HIGH", "--starred",
        ]);
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };

        let spec = args.to_query(SortKey::ArchivedDesc);
        assert_eq!(spec.message_type, Some(MessageType::Academic));
        assert_eq!(spec.priority, Some(Priority::High));
        assert_eq!(spec.starred, StarFilter::Starred);
    }

    #[test]
    fn test_flags_override_query_operators() {
        let args = ListArgs {
            query: Some("status:sent sort:subject lab".to_string()),
            status: Some(MessageStatus::Draft),
            ..Default::default()
        };

        let spec = args.to_query(SortKey::PriorityDesc);
        assert_eq!(spec.status, Some(MessageStatus::Draft));
        assert_eq!(spec.sort, SortKey::SubjectAsc);
        assert_eq!(spec.search_text.as_deref(), Some("lab"));
    }

    #[test]
    fn test_query_sort_operator_beats_default() {
        let args = ListArgs {
            query: Some("sort:archived".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_query(SortKey::PriorityDesc).sort, SortKey::ArchivedDesc);

        let overridden = ListArgs {
            sort: Some(SortKey::SizeDesc),
            ..args
        };
        assert_eq!(overridden.to_query(SortKey::PriorityDesc).sort, SortKey::SizeDesc);
    }

    #[test]
    fn test_default_sort_from_settings() {
        let spec = ListArgs::default().to_query(SortKey::SizeDesc);
        assert_eq!(spec.sort, SortKey::SizeDesc);
        assert!(spec.search_text.is_none());
    }

    #[test]
    fn test_starred_conflicts_with_unstarred() {
        let result = Cli::try_parse_from(["archivist", "list", "--starred", "--unstarred"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["archivist", "stats", "--config", "/tmp/archive.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/archive.json")));
        assert!(matches!(cli.command, Command::Stats));
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["archivist", "delete", "--yes"]).is_err());
    }
}
