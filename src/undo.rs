//! Reverse-replay the undo journal and clear it.
//!
//! Records are processed most-recent-first, so a file whose destination
//! folder was created by an earlier move is put back before that folder's
//! other occupants. The pass is single-shot: the journal is cleared
//! unconditionally at the end, whether or not every record could be
//! restored, so a second undo immediately after reports nothing to undo.

use crate::activity::ActivityLog;
use crate::journal::{JournalError, MoveRecord, UndoJournal};
use std::fs;
use std::path::PathBuf;

/// What a completed undo pass did.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Files moved back to their original paths.
    pub restored: usize,
    /// Records whose destination no longer existed, as (destination, note).
    /// A skip is a no-op, not an error.
    pub skipped: Vec<(PathBuf, String)>,
    /// Records that could not be restored, as (path, reason).
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// True when every record was restored.
    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of an undo request.
#[derive(Debug)]
pub enum UndoOutcome {
    /// The journal had no records. Informational, not an error.
    NothingToUndo,
    /// A pass ran; the journal has been cleared.
    Undone(UndoReport),
}

/// Restores every journaled move in reverse insertion order, then clears
/// the journal.
///
/// Per record: a destination that no longer exists is skipped silently; an
/// original path that is currently occupied is refused rather than
/// overwritten and counted as a failure; otherwise the source's parent
/// directory is recreated if needed and the file is moved back. One record's
/// failure never stops the rest. The journal is cleared even when records
/// were skipped or failed, so the pass is non-retryable.
///
/// # Errors
///
/// Only reading the journal can fail the whole pass, and that happens
/// before any file is touched.
pub fn undo(
    journal: &UndoJournal,
    activity: &mut ActivityLog,
) -> Result<UndoOutcome, JournalError> {
    let records = journal.read_all()?;
    if records.is_empty() {
        return Ok(UndoOutcome::NothingToUndo);
    }

    let mut report = UndoReport::default();
    for record in records.iter().rev() {
        match restore(record) {
            Restore::Restored => {
                report.restored += 1;
                activity.record(&format!(
                    "restored {} -> {}",
                    record.destination.display(),
                    record.source.display()
                ));
            }
            Restore::Skipped(note) => report.skipped.push((record.destination.clone(), note)),
            Restore::Failed(path, reason) => report.failed.push((path, reason)),
        }
    }

    if let Err(e) = journal.clear() {
        report
            .failed
            .push((journal.path().to_path_buf(), format!("could not clear journal: {}", e)));
    }
    activity.record(&format!(
        "undo completed: {} restored, {} skipped, {} failed",
        report.restored,
        report.skipped.len(),
        report.failed.len()
    ));

    Ok(UndoOutcome::Undone(report))
}

enum Restore {
    Restored,
    Skipped(String),
    Failed(PathBuf, String),
}

fn restore(record: &MoveRecord) -> Restore {
    if !record.destination.exists() {
        return Restore::Skipped("no longer at recorded destination".to_string());
    }

    // Never clobber whatever now occupies the original path.
    if record.source.exists() {
        return Restore::Failed(
            record.source.clone(),
            "original path is occupied; refusing to overwrite".to_string(),
        );
    }

    if let Some(parent) = record.source.parent()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return Restore::Failed(
            parent.to_path_buf(),
            format!("could not recreate original folder: {}", e),
        );
    }

    match fs::rename(&record.destination, &record.source) {
        Ok(()) => Restore::Restored,
        Err(e) => Restore::Failed(
            record.destination.clone(),
            format!("failed to move back: {}", e),
        ),
    }
}
