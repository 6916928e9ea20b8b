// JSON file persistence for the exchange history.
//
// The whole history is one JSON document: read in full at startup,
// rewritten in full after a commit. Writes go to a sibling temp file
// first and are renamed into place so a crash mid-write cannot corrupt
// the recorded years.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::exchange::History;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read history file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("history file {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode history: {source}")]
    Encode { source: serde_json::Error },

    #[error("failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// File-backed history storage.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HistoryStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the recorded history.
    ///
    /// A missing file yields the built-in seed record. A present,
    /// parseable file is authoritative; built-in years are merged in only
    /// where the file lacks them, so written history is never lost. A
    /// file that exists but cannot be parsed is an error, never silently
    /// discarded.
    pub fn load(&self) -> Result<History, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no history file, using built-in record");
            return Ok(History::builtin());
        }

        let text = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        let mut history: History =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                source: e,
            })?;

        history.merge_defaults(History::builtin());
        info!(
            path = %self.path.display(),
            years = history.len(),
            "history loaded"
        );
        Ok(history)
    }

    /// Persist the complete history, replacing the previous file content.
    ///
    /// Writes the full document to `<path>.tmp` and renames it over the
    /// target, so readers never observe a half-written file.
    pub fn save(&self, history: &History) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(history)
            .map_err(|e| StoreError::Encode { source: e })?;

        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, json).map_err(|e| StoreError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            // Leave no stray temp file behind on failure.
            let _ = std::fs::remove_file(&tmp_path);
            warn!(path = %self.path.display(), "failed to replace history file: {e}");
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: e,
            });
        }

        info!(path = %self.path.display(), years = history.len(), "history saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
