// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent run history.
//!
//! The history file is a JSON document `{"runs": [...]}` holding the most
//! recent run summaries, oldest first.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::RunSummary;

/// Ordered list of past run summaries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub runs: Vec<RunSummary>,
}

impl History {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Append a run, evicting the oldest runs beyond `cap`.
    pub fn push_capped(&mut self, summary: RunSummary, cap: usize) {
        self.runs.push(summary);
        if self.runs.len() > cap {
            let excess = self.runs.len() - cap;
            self.runs.drain(..excess);
        }
    }

    /// Runs recorded strictly before `timestamp`, oldest first.
    ///
    /// Overlapping runs may append out of timestamp order, so every entry is
    /// checked rather than assuming the file is sorted.
    pub fn preceding(&self, timestamp: DateTime<Utc>) -> Vec<RunSummary> {
        let mut runs: Vec<RunSummary> = self
            .runs
            .iter()
            .filter(|r| r.timestamp < timestamp)
            .cloned()
            .collect();
        runs.sort_by_key(|r| r.timestamp);
        runs
    }

    /// The last `n` runs.
    pub fn last_n(&self, n: usize) -> &[RunSummary] {
        let start = self.runs.len().saturating_sub(n);
        &self.runs[start..]
    }
}

/// History file on disk with a retention cap.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_runs: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_runs: usize) -> Self {
        Self {
            path: path.into(),
            max_runs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load history, treating a missing or unreadable file as empty.
    pub fn load(&self) -> History {
        match self.try_load() {
            Ok(history) => history,
            Err(HistoryError::Read(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                History::default()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring history: {e}");
                History::default()
            }
        }
    }

    fn try_load(&self) -> Result<History, HistoryError> {
        let content = std::fs::read_to_string(&self.path).map_err(HistoryError::Read)?;
        serde_json::from_str(&content).map_err(|e| HistoryError::Parse(e.to_string()))
    }

    /// Append a run and rewrite the file, returning the updated history.
    pub fn append(&self, summary: RunSummary) -> Result<History, HistoryError> {
        let mut history = self.load();
        history.push_capped(summary, self.max_runs);
        self.save(&history)?;
        Ok(history)
    }

    /// Replace the file contents atomically.
    pub fn save(&self, history: &History) -> Result<(), HistoryError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(HistoryError::Write)?;

        let content = serde_json::to_string_pretty(history)
            .map_err(|e| HistoryError::Serialize(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(HistoryError::Write)?;
        tmp.write_all(content.as_bytes())
            .map_err(HistoryError::Write)?;
        tmp.persist(&self.path)
            .map_err(|e| HistoryError::Write(e.error))?;
        Ok(())
    }
}

/// Errors that can occur during history operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to read history: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse history: {0}")]
    Parse(String),

    #[error("failed to serialize history: {0}")]
    Serialize(String),

    #[error("failed to write history: {0}")]
    Write(#[source] std::io::Error),
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
