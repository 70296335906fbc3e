//! Archive settings
//!
//! Loaded from (in order of priority):
//! 1. An explicitly given JSON file
//! 2. `archive.json` in the EduLink config directory
//! 3. Built-in defaults
//!
//! `EDULINK_ARCHIVE_BACKEND` and `EDULINK_DATA_DIR` override whatever was loaded.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::MessageStatus;
use crate::query::SortKey;
use crate::storage::{ARCHIVE_FILE, mailbox_file};

/// Settings filename in the EduLink config directory
pub const SETTINGS_FILE: &str = "archive.json";

/// SQLite database filename used by the sqlite backend
pub const DATABASE_FILE: &str = "archive.db";

const BACKEND_ENV: &str = "EDULINK_ARCHIVE_BACKEND";
const DATA_DIR_ENV: &str = "EDULINK_DATA_DIR";

/// Where the archive is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
            other => bail!("Unknown archive backend: {}", other),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Json => write!(f, "json"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveSettings {
    pub backend: Backend,
    /// Directory holding the archive and mailbox files (defaults to the config directory)
    pub data_dir: Option<PathBuf>,
    /// Directory exports are written to (defaults to `<data_dir>/exports`)
    pub export_dir: Option<PathBuf>,
    pub default_sort: SortKey,
}

impl ArchiveSettings {
    /// Load settings using the priority order described in the module docs
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None if config::config_exists(SETTINGS_FILE) => config::load_json(SETTINGS_FILE)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        debug!("Archive settings: {:?}", settings);
        Ok(settings)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse archive settings JSON")
    }

    /// Apply environment overrides, reading variables through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(BACKEND_ENV).filter(|v| !v.is_empty()) {
            self.backend = backend
                .parse()
                .with_context(|| format!("Invalid {}", BACKEND_ENV))?;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Directory holding archive data
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => config::config_dir().context("Could not determine config directory"),
        }
    }

    /// JSON archive file used by the json backend
    pub fn archive_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(ARCHIVE_FILE))
    }

    /// SQLite database used by the sqlite backend
    pub fn database_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(DATABASE_FILE))
    }

    /// File of the mailbox that receives restored messages with `status`
    pub fn mailbox_file(&self, status: MessageStatus) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(mailbox_file(status)))
    }

    /// Directory exports are written to
    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("exports")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let json = r#"{
            "backend": "sqlite",
            "dataDir": "/var/lib/edulink",
            "exportDir": "/tmp/exports",
            "defaultSort": "priority-desc"
        }"#;

        let settings = ArchiveSettings::from_json(json).unwrap();
        assert_eq!(settings.backend, Backend::Sqlite);
        assert_eq!(settings.default_sort, SortKey::PriorityDesc);
        assert_eq!(
            settings.database_file().unwrap(),
            PathBuf::from("/var/lib/edulink/archive.db")
        );
        assert_eq!(settings.export_dir().unwrap(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = ArchiveSettings::from_json("{}").unwrap();
        assert_eq!(settings, ArchiveSettings::default());
        assert_eq!(settings.backend, Backend::Json);
        assert_eq!(settings.default_sort, SortKey::ArchivedDesc);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ArchiveSettings::from_json(r#"{ "backend": "redis" }"#).is_err());
    }

    #[test]
    fn test_derived_paths() {
        let settings = ArchiveSettings {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };

        assert_eq!(
            settings.archive_file().unwrap(),
            PathBuf::from("/data/archived-messages.json")
        );
        assert_eq!(
            settings.mailbox_file(MessageStatus::Received).unwrap(),
            PathBuf::from("/data/inbox.json")
        );
        assert_eq!(settings.export_dir().unwrap(), PathBuf::from("/data/exports"));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = ArchiveSettings::default();
        settings
            .apply_overrides(|key| match key {
                "EDULINK_ARCHIVE_BACKEND" => Some("SQLite".to_string()),
                "EDULINK_DATA_DIR" => Some("/srv/archive".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(settings.backend, Backend::Sqlite);
        assert_eq!(settings.data_dir, Some(PathBuf::from("/srv/archive")));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut settings = ArchiveSettings {
            backend: Backend::Sqlite,
            ..Default::default()
        };
        settings.apply_overrides(|_| Some(String::new())).unwrap();
        assert_eq!(settings.backend, Backend::Sqlite);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_invalid_env_backend() {
        let mut settings = ArchiveSettings::default();
        let result = settings.apply_overrides(|key| {
            (key == "EDULINK_ARCHIVE_BACKEND").then(|| "redis".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.json");
        std::fs::write(&path, r#"{ "backend": "json", "defaultSort": "subject-asc" }"#).unwrap();

        let settings = ArchiveSettings::from_file(&path).unwrap();
        assert_eq!(settings.default_sort, SortKey::SubjectAsc);
    }
}
