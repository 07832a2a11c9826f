//! Human-readable activity log of real moves and undo passes.
//!
//! The log is an append handle owned by the caller for the duration of one
//! run, not a process-wide global. Dry runs use the disabled handle, so a
//! simulation leaves no trace on disk. Writes are best-effort: the log is a
//! record of what the engines did, never a reason for them to fail.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Activity log file kept inside the organized directory.
pub const ACTIVITY_LOG_FILE_NAME: &str = ".sortbox_log.txt";

/// Append-only, timestamped activity log for one run.
#[derive(Debug)]
pub struct ActivityLog {
    target: Option<PathBuf>,
    file: Option<File>,
}

impl ActivityLog {
    /// A log that appends to the activity file of the given directory.
    ///
    /// The file is only created once the first line is recorded, so a run
    /// that moves nothing leaves no log behind.
    pub fn for_dir(base_path: &Path) -> Self {
        Self {
            target: Some(base_path.join(ACTIVITY_LOG_FILE_NAME)),
            file: None,
        }
    }

    /// A log that discards everything. Used for dry runs.
    pub fn disabled() -> Self {
        Self {
            target: None,
            file: None,
        }
    }

    /// Appends one timestamped line, e.g. `2026-08-08 14:03:52 - report.pdf -> Documents`.
    ///
    /// Best-effort: an open or write failure disables the log for the rest
    /// of the run instead of surfacing an error.
    pub fn record(&mut self, message: &str) {
        let Some(target) = &self.target else {
            return;
        };

        if self.file.is_none() {
            match OpenOptions::new().create(true).append(true).open(target) {
                Ok(file) => self.file = Some(file),
                Err(_) => {
                    self.target = None;
                    return;
                }
            }
        }

        if let Some(file) = &mut self.file {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            if writeln!(file, "{} - {}", timestamp, message).is_err() {
                self.target = None;
                self.file = None;
            }
        }
    }
}
