//! Command-line interface module for sortbox.
//!
//! A thin shell over the engines: it parses arguments, loads configuration,
//! wires up the journal and activity log for the target folder, and renders
//! the structured results. Every run ends with exactly one status line;
//! fatal errors are returned to `main`, which reports them and exits
//! non-zero.

use crate::activity::ActivityLog;
use crate::config::Config;
use crate::journal::UndoJournal;
use crate::organizer::{Organizer, RunResult};
use crate::output::OutputFormatter;
use crate::undo::{self, UndoOutcome};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "sortbox",
    version,
    about = "Organize a folder's files into category subfolders, with dry-run and undo."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the folder's files by suffix and move them into category subfolders.
    Organize {
        /// Folder to organize (immediate entries only).
        path: PathBuf,

        /// Report the decisions without moving anything.
        #[arg(long)]
        dry_run: bool,

        /// Configuration file to use instead of the default lookup.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Move the files from the most recent organize run back where they came from.
    Undo {
        /// Folder that was organized.
        path: PathBuf,
    },
}

/// Runs a parsed command to completion.
///
/// # Errors
///
/// Returns the fatal error message; per-file failures are reported in the
/// batch summary and do not fail the run.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Organize {
            path,
            dry_run,
            config,
        } => organize(&path, dry_run, config.as_deref()),
        Command::Undo { path } => undo_last_run(&path),
    }
}

fn organize(path: &Path, dry_run: bool, config_path: Option<&Path>) -> Result<(), String> {
    let config = Config::load(config_path).map_err(|e| e.to_string())?;

    let mut journal = UndoJournal::for_dir(path);
    let mut activity = if dry_run {
        ActivityLog::disabled()
    } else {
        ActivityLog::for_dir(path)
    };

    if dry_run {
        OutputFormatter::info(&format!("DRY RUN: analyzing contents of {}", path.display()));
    } else {
        OutputFormatter::info(&format!("Organizing contents of {}", path.display()));
    }

    let result = Organizer::new(&config, dry_run)
        .run(path, &mut journal, &mut activity)
        .map_err(|e| e.to_string())?;

    render_decisions(&result, dry_run);

    if !result.decisions.is_empty() {
        OutputFormatter::summary_table(&result.category_counts, result.total_moves());
    }

    if !result.errors.is_empty() {
        OutputFormatter::warning("Some files could not be organized:");
        for (file_name, reason) in &result.errors {
            OutputFormatter::error(&format!("{}: {}", file_name, reason));
        }
    }

    if dry_run {
        OutputFormatter::success("Dry run completed. No files were moved.");
    } else {
        OutputFormatter::success("Folder organization complete.");
        if result.total_moves() > 0 {
            OutputFormatter::plain(&format!(
                "Use 'sortbox undo {}' to revert this run.",
                path.display()
            ));
        }
    }

    Ok(())
}

fn render_decisions(result: &RunResult, dry_run: bool) {
    if result.decisions.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return;
    }

    for decision in &result.decisions {
        match (&decision.target, dry_run) {
            (Some(folder), true) => {
                OutputFormatter::dry_run_notice(&format!(
                    "{} -> {}/",
                    decision.file_name, folder
                ));
            }
            (Some(folder), false) => {
                OutputFormatter::plain(&format!(" - {} -> {}/", decision.file_name, folder));
            }
            (None, _) => {
                OutputFormatter::plain(&format!(
                    " - {} (no matching category, left in place)",
                    decision.file_name
                ));
            }
        }
    }
}

fn undo_last_run(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("folder does not exist: {}", path.display()));
    }

    let journal = UndoJournal::for_dir(path);
    let mut activity = ActivityLog::for_dir(path);

    match undo::undo(&journal, &mut activity).map_err(|e| e.to_string())? {
        UndoOutcome::NothingToUndo => {
            OutputFormatter::success("Nothing to undo.");
        }
        UndoOutcome::Undone(report) => {
            OutputFormatter::plain(&format!("Restored: {}", report.restored));

            if !report.skipped.is_empty() {
                OutputFormatter::plain(&format!("Skipped: {}", report.skipped.len()));
                for (path, note) in &report.skipped {
                    OutputFormatter::plain(&format!(" - {}: {}", path.display(), note));
                }
            }

            if !report.failed.is_empty() {
                OutputFormatter::warning(&format!("Failed: {}", report.failed.len()));
                for (path, reason) in &report.failed {
                    OutputFormatter::error(&format!("{}: {}", path.display(), reason));
                }
            }

            OutputFormatter::success("Undo operation completed.");
        }
    }

    Ok(())
}
