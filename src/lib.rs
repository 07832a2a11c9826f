//! sortbox - organize a folder's files into category subfolders by suffix
//!
//! This library implements the classify -> move -> journal -> undo pipeline:
//! configuration maps filename suffixes to category folders, the organizer
//! moves each file of a directory into its category (or simulates the run),
//! every real move is appended to an undo journal, and a later undo pass
//! replays the journal in reverse to put everything back.

pub mod activity;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod journal;
pub mod organizer;
pub mod output;
pub mod undo;

pub use activity::ActivityLog;
pub use classifier::classify;
pub use cli::{Cli, Command};
pub use config::{CategoryRule, CompiledFilters, Config, ConfigError};
pub use journal::{JournalError, MoveRecord, UndoJournal};
pub use organizer::{FileDecision, MoveError, OrganizeError, Organizer, RunResult};
pub use undo::{UndoOutcome, UndoReport, undo};
