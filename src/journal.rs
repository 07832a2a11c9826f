//! Append-only journal of real file moves, consumed by an undo pass.
//!
//! The journal lives as a hidden file inside the organized directory. Every
//! successful real move appends one JSON object on its own line; an undo run
//! reads the whole file, replays it in reverse, and removes it. Records are
//! structured JSON rather than a delimited `destination|source` line so that
//! paths containing any particular character round-trip safely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Journal file kept inside the organized directory.
pub const JOURNAL_FILE_NAME: &str = ".sortbox_journal.jsonl";

/// One journal entry: where a file went and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The path the file occupied before the move.
    pub source: PathBuf,
    /// The path the file was moved to.
    pub destination: PathBuf,
    /// The category folder the file was filed under.
    pub category: String,
    /// When the move happened.
    pub moved_at: DateTime<Utc>,
}

impl MoveRecord {
    /// Creates a record for a move that just happened.
    pub fn new(source: PathBuf, destination: PathBuf, category: &str) -> Self {
        Self {
            source,
            destination,
            category: category.to_string(),
            moved_at: Utc::now(),
        }
    }
}

/// Errors raised by journal operations.
#[derive(Debug)]
pub enum JournalError {
    /// Failed to read the journal file.
    ReadFailed { path: PathBuf, source: std::io::Error },
    /// Failed to append to or remove the journal file.
    WriteFailed { path: PathBuf, source: std::io::Error },
    /// A journal line is not a valid record.
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl std::fmt::Display for JournalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read journal {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write journal {}: {}", path.display(), source)
            }
            Self::Corrupt { path, line, reason } => {
                write!(
                    f,
                    "corrupt journal {} at line {}: {}",
                    path.display(),
                    line,
                    reason
                )
            }
        }
    }
}

impl std::error::Error for JournalError {}

/// Durable, ordered record of the moves performed by real organize runs.
///
/// The struct only names the file; nothing is held open between calls, so a
/// journal value is cheap and the file appears on the first append.
#[derive(Debug)]
pub struct UndoJournal {
    path: PathBuf,
}

impl UndoJournal {
    /// The journal for a directory being organized.
    pub fn for_dir(base_path: &Path) -> Self {
        Self {
            path: base_path.join(JOURNAL_FILE_NAME),
        }
    }

    /// Where this journal is persisted.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the journal file if needed.
    pub fn append(&mut self, record: &MoveRecord) -> Result<(), JournalError> {
        let line = serde_json::to_string(record).map_err(|e| JournalError::WriteFailed {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| JournalError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;

        writeln!(file, "{}", line).map_err(|e| JournalError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Reads every record in append order.
    ///
    /// A missing journal file is an empty journal, not an error.
    pub fn read_all(&self) -> Result<Vec<MoveRecord>, JournalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| JournalError::ReadFailed {
                path: self.path.clone(),
                source: e,
            })?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| JournalError::Corrupt {
                    path: self.path.clone(),
                    line: index + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Removes all records. Safe to call when no journal file exists.
    pub fn clear(&self) -> Result<(), JournalError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| JournalError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}
