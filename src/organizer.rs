//! Organize a directory: snapshot, classify, move, journal.
//!
//! The engine takes its collaborators — config, journal, activity log — as
//! arguments and returns a structured [`RunResult`]; it prints nothing. The
//! directory snapshot is taken once before any mutation and processed
//! strictly in order, one file at a time. A per-file failure is recorded and
//! the batch continues; only the pre-scan validation errors are fatal, and
//! they fire before anything on disk has changed.

use crate::activity::{ACTIVITY_LOG_FILE_NAME, ActivityLog};
use crate::classifier::classify;
use crate::config::Config;
use crate::journal::{JOURNAL_FILE_NAME, JournalError, MoveRecord, UndoJournal};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fatal, pre-mutation errors. Any of these means no file was touched.
#[derive(Debug)]
pub enum OrganizeError {
    /// The folder path does not exist.
    PathNotFound(PathBuf),
    /// The path exists but is not a directory.
    NotADirectory(PathBuf),
    /// The directory could not be listed due to permissions.
    PermissionDenied {
        path: PathBuf,
        source: io::Error,
    },
    /// The directory could not be listed for another reason.
    ScanFailed {
        path: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => write!(f, "folder does not exist: {}", path.display()),
            Self::NotADirectory(path) => write!(f, "not a folder: {}", path.display()),
            Self::PermissionDenied { path, source } => {
                write!(f, "permission denied for {}: {}", path.display(), source)
            }
            Self::ScanFailed { path, source } => {
                write!(f, "failed to list {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Per-file failures. These are accumulated into [`RunResult::errors`] and
/// never abort the batch.
#[derive(Debug)]
pub enum MoveError {
    /// Failed to create the category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// A different file already occupies the destination path.
    DestinationOccupied { path: PathBuf },
    /// The rename itself failed.
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The file moved but the journal append failed; the move will not be
    /// part of a later undo.
    JournalAppendFailed(JournalError),
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "failed to create {}: {}", path.display(), source)
            }
            Self::DestinationOccupied { path } => {
                write!(f, "destination already exists: {}", path.display())
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::JournalAppendFailed(e) => {
                write!(f, "moved, but recording for undo failed: {}", e)
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// The classification decision for one snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDecision {
    /// The file's name within the organized directory.
    pub file_name: String,
    /// Target folder name; `None` means the file stays where it is.
    pub target: Option<String>,
}

/// Aggregated outcome of one organize run. Returned to the caller, never
/// persisted.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Files matched by a category rule.
    pub classified: usize,
    /// Files matched by no rule (sent to the unknown folder or left alone).
    pub unclassified: usize,
    /// One decision per snapshot entry, in snapshot order. Identical between
    /// a dry run and a real run over the same snapshot.
    pub decisions: Vec<FileDecision>,
    /// Per-file failures as (file name, reason), in snapshot order.
    pub errors: Vec<(String, String)>,
    /// Files placed (or, in a dry run, to be placed) per target folder.
    pub category_counts: HashMap<String, usize>,
}

impl RunResult {
    /// Total files the run planned or performed a move for.
    pub fn total_moves(&self) -> usize {
        self.category_counts.values().sum()
    }
}

/// Drives one organize pass over a directory.
pub struct Organizer<'c> {
    config: &'c Config,
    dry_run: bool,
}

impl<'c> Organizer<'c> {
    pub fn new(config: &'c Config, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    /// Organizes the immediate entries of `base_path`.
    ///
    /// Validates the path, snapshots the directory once, then classifies and
    /// (unless this is a dry run) moves each regular file, appending a
    /// journal record after every successful move. Every snapshot entry ends
    /// in exactly one of: moved to a category, moved to the unknown folder,
    /// left in place, or failed with an entry in [`RunResult::errors`].
    pub fn run(
        &self,
        base_path: &Path,
        journal: &mut UndoJournal,
        activity: &mut ActivityLog,
    ) -> Result<RunResult, OrganizeError> {
        if !base_path.exists() {
            return Err(OrganizeError::PathNotFound(base_path.to_path_buf()));
        }
        if !base_path.is_dir() {
            return Err(OrganizeError::NotADirectory(base_path.to_path_buf()));
        }

        let entries = fs::read_dir(base_path).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                OrganizeError::PermissionDenied {
                    path: base_path.to_path_buf(),
                    source: e,
                }
            } else {
                OrganizeError::ScanFailed {
                    path: base_path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        // Snapshot once; the directory is not re-read while files move.
        let mut snapshot: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Skips directories, symlinks to directories, and specials.
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name == JOURNAL_FILE_NAME || name == ACTIVITY_LOG_FILE_NAME {
                continue;
            }
            if !self.config.filters.should_include(&name) {
                continue;
            }
            snapshot.push((name, path));
        }

        let mut result = RunResult::default();

        for (name, path) in &snapshot {
            let target = match classify(name, self.config) {
                Some(category) => {
                    result.classified += 1;
                    Some(category.to_string())
                }
                None => {
                    result.unclassified += 1;
                    self.config
                        .unknown_enabled
                        .then(|| self.config.unknown_name.clone())
                }
            };

            if let Some(folder) = &target {
                if self.dry_run {
                    *result.category_counts.entry(folder.clone()).or_insert(0) += 1;
                } else {
                    match self.move_into(base_path, path, name, folder, journal) {
                        Ok(()) => {
                            *result.category_counts.entry(folder.clone()).or_insert(0) += 1;
                            activity.record(&format!("{} -> {}", name, folder));
                        }
                        Err(e) => result.errors.push((name.clone(), e.to_string())),
                    }
                }
            }

            result.decisions.push(FileDecision {
                file_name: name.clone(),
                target,
            });
        }

        Ok(result)
    }

    /// Moves one file into `base_path/folder` and journals the move.
    fn move_into(
        &self,
        base_path: &Path,
        file_path: &Path,
        file_name: &str,
        folder: &str,
        journal: &mut UndoJournal,
    ) -> Result<(), MoveError> {
        let target_dir = base_path.join(folder);
        fs::create_dir_all(&target_dir).map_err(|e| MoveError::DirectoryCreationFailed {
            path: target_dir.clone(),
            source: e,
        })?;

        let destination = target_dir.join(file_name);
        // rename would silently replace an existing destination.
        if destination.exists() {
            return Err(MoveError::DestinationOccupied { path: destination });
        }

        fs::rename(file_path, &destination).map_err(|e| MoveError::RenameFailed {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        journal
            .append(&MoveRecord::new(
                file_path.to_path_buf(),
                destination,
                folder,
            ))
            .map_err(MoveError::JournalAppendFailed)
    }
}
