//! Settings management.
//!
//! Settings are an explicit value passed into the sync engine, never ambient
//! global state. Persistence goes through the [`SettingsStore`] trait so the
//! engine can checkpoint the pagination cursor at page boundaries without
//! knowing where settings live.
//!
//! The file-backed store keeps a single JSON document at
//! `~/.cubox-sync/config.json` (overridable via `CUBOX_SYNC_CONFIG` or the
//! `--config` flag) and writes it atomically: temp file, fsync, rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Cursor;

/// Persisted configuration and sync state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cubox service domain, e.g. `cubox.pro` or `cubox.cc`.
    pub domain: String,
    /// Cubox third-party API key. May be left empty and supplied via the
    /// `CUBOX_API_KEY` environment variable instead.
    pub api_key: String,
    /// Anchor page that synced articles are tagged with and linked from.
    pub target_page_name: String,
    /// Comma-separated folder display names; empty means all folders.
    pub sync_folders: String,
    /// Only sync articles that carry at least one highlight.
    pub only_annotated: bool,
    /// Logseq HTTP server endpoint.
    pub logseq_endpoint: String,
    /// Logseq HTTP server authorization token. May be supplied via
    /// `LOGSEQ_API_TOKEN` instead.
    pub logseq_token: String,
    /// Pagination resumption state, advanced per fully-processed page.
    pub cursor: Cursor,
    /// When the last sync run completed.
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            api_key: String::new(),
            target_page_name: "Cubox".to_string(),
            sync_folders: String::new(),
            only_annotated: false,
            logseq_endpoint: "http://127.0.0.1:12315".to_string(),
            logseq_token: String::new(),
            cursor: Cursor::default(),
            last_sync_time: None,
        }
    }
}

impl Settings {
    /// Configured folder names: trimmed, empties dropped.
    #[must_use]
    pub fn folder_names(&self) -> Vec<String> {
        self.sync_folders
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }

    /// The effective API key: `CUBOX_API_KEY` wins over the config file.
    #[must_use]
    pub fn resolve_api_key(&self) -> String {
        std::env::var("CUBOX_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }

    /// The effective Logseq token: `LOGSEQ_API_TOKEN` wins over the config file.
    #[must_use]
    pub fn resolve_logseq_token(&self) -> String {
        std::env::var("LOGSEQ_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or_else(|| self.logseq_token.clone())
    }

    /// Whether the remote side can be reached at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.domain.trim().is_empty() && !self.resolve_api_key().trim().is_empty()
    }
}

/// Settings persistence collaborator.
///
/// `save` persists the full settings value; the engine calls it at page
/// boundaries (cursor checkpoint) and the CLI at the end of a run.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// File-backed [`SettingsStore`] holding one JSON document.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the config file path.
    ///
    /// Priority:
    /// 1. Explicit path from the `--config` flag
    /// 2. `CUBOX_SYNC_CONFIG` environment variable
    /// 3. `~/.cubox-sync/config.json`
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path.to_path_buf()));
        }

        if let Ok(path) = std::env::var("CUBOX_SYNC_CONFIG") {
            if !path.trim().is_empty() {
                return Ok(Self::new(PathBuf::from(path)));
            }
        }

        directories::BaseDirs::new()
            .map(|dirs| Self::new(dirs.home_dir().join(".cubox-sync").join("config.json")))
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
    }

    /// Where this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    /// Load settings, falling back to defaults if the file does not exist yet.
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {e}", self.path.display())))?;
        Ok(settings)
    }

    /// Write settings atomically: temp file, fsync, rename.
    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
