// ABOUTME: Typed errors for the migration runner and external tool failures
// ABOUTME: Maps failures onto the exit codes reported by the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that stop a migration run before or during the batch.
///
/// Per-file failures are not errors: they are recorded as
/// [`crate::migrate::MigrationOutcome::Failed`] and the batch keeps going.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("{var} not set. Please configure {config_file}")]
    ConfigurationMissing {
        var: &'static str,
        config_file: String,
    },

    #[error("Migrations directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error(
        "{0} not found. Please install PostgreSQL client tools.\n\
         Alternatively, run the SQL files manually in the Supabase SQL Editor"
    )]
    ToolMissing(String),

    #[error("Failed to read migrations directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to reset database: {0}")]
    ResetFailed(String),

    #[error("Failed to query database tables: {0}")]
    QueryFailed(String),
}

/// An external tool ran but exited unsuccessfully.
#[derive(Debug, Error)]
#[error("Command failed with exit code {code}: {command}")]
pub struct ToolFailed {
    pub command: String,
    pub code: i32,
}

/// Exit code the CLI should terminate with for `err`.
///
/// A failing external tool propagates its own exit code; everything else is 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ToolFailed>() {
        Some(failed) if failed.code != 0 => failed.code,
        _ => 1,
    }
}
