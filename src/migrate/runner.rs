// ABOUTME: Applies discovered migrations through the external SQL client
// ABOUTME: Tolerates "already exists" failures and keeps going after other failures

use std::io;
use std::path::Path;

use crate::config::RunConfig;
use crate::error::MigrateError;
use crate::output;
use crate::process::{CapturedOutput, CommandSpec, ProcessRunner};
use crate::utils::redact_connection_string;

use super::discovery::{discover_migrations, MigrationFile};

/// External SQL client used to apply migration files
pub const SQL_CLIENT: &str = "psql";

/// Substring in the client's stderr that marks an already-applied migration.
///
/// Matched anywhere in stderr, so an unrelated error that happens to contain
/// the phrase is also treated as a skip. Kept for compatibility with existing
/// migration sets that rely on re-running partially applied batches.
pub const ALREADY_EXISTS_MARKER: &str = "already exists";

/// Leading lines of client output echoed after a successful migration
pub const OUTPUT_PREVIEW_LINES: usize = 5;

/// Result of applying a single migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    SkippedAlreadyExists,
    Failed(String),
}

/// Classify a finished client invocation
pub fn classify(output: &CapturedOutput) -> MigrationOutcome {
    if output.success() {
        MigrationOutcome::Applied
    } else if output.stderr.contains(ALREADY_EXISTS_MARKER) {
        MigrationOutcome::SkippedAlreadyExists
    } else {
        MigrationOutcome::Failed(output.stderr.clone())
    }
}

/// Non-empty lines among the first [`OUTPUT_PREVIEW_LINES`] lines of `stdout`
pub fn preview_lines(stdout: &str) -> Vec<&str> {
    stdout
        .trim()
        .lines()
        .take(OUTPUT_PREVIEW_LINES)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Overall state of a batch that ran to the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    CompletedWithErrors,
}

/// Per-file outcomes of a batch, in execution order
#[derive(Debug, Default)]
pub struct MigrationReport {
    entries: Vec<(MigrationFile, MigrationOutcome)>,
}

impl MigrationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file: MigrationFile, outcome: MigrationOutcome) {
        self.entries.push((file, outcome));
    }

    pub fn entries(&self) -> &[(MigrationFile, MigrationOutcome)] {
        &self.entries
    }

    pub fn applied_count(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Applied))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::SkippedAlreadyExists))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &MigrationFile> {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, MigrationOutcome::Failed(_)))
            .map(|(file, _)| file)
    }

    pub fn status(&self) -> BatchStatus {
        if self.has_failures() {
            BatchStatus::CompletedWithErrors
        } else {
            BatchStatus::Completed
        }
    }

    fn count(&self, pred: impl Fn(&MigrationOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn print_summary(&self) {
        println!();
        println!(
            "Applied: {}  Skipped: {}  Failed: {}",
            self.applied_count(),
            self.skipped_count(),
            self.failed_count()
        );
        match self.status() {
            BatchStatus::Completed => output::success("Database migrations completed!"),
            BatchStatus::CompletedWithErrors => {
                let failed: Vec<&str> = self.failed().map(MigrationFile::name).collect();
                output::warning(&format!(
                    "Database migrations completed with errors ({} failed: {})",
                    failed.len(),
                    failed.join(", ")
                ));
            }
        }
    }
}

/// Terminal state of a run that was not aborted
#[derive(Debug)]
pub enum RunOutcome {
    NoMigrations,
    DryRun(Vec<MigrationFile>),
    Completed(MigrationReport),
}

/// Applies migration files strictly in order, one client process at a time
pub struct MigrationRunner<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a RunConfig,
    client: String,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, config: &'a RunConfig) -> Self {
        Self {
            runner,
            config,
            client: SQL_CLIENT.to_string(),
        }
    }

    /// Use a different client executable (same `<conn> -f <file>` arguments)
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Discover the migrations in `dir` and apply them, or list them on a dry run
    pub fn run(&self, dir: &Path) -> Result<RunOutcome, MigrateError> {
        let files = discover_migrations(dir)?;
        if files.is_empty() {
            output::warning("No migration files found");
            return Ok(RunOutcome::NoMigrations);
        }

        output::success(&format!("Found {} migration file(s):", files.len()));
        for file in &files {
            output::detail(&format!("- {}", file.name()));
        }

        if self.config.dry_run {
            output::warning("Dry run mode - no migrations executed");
            return Ok(RunOutcome::DryRun(files));
        }

        let report = self.apply_all(&files)?;
        Ok(RunOutcome::Completed(report))
    }

    /// Apply every file in order.
    ///
    /// Per-file failures are recorded and the batch continues. A missing
    /// client aborts the whole batch with [`MigrateError::ToolMissing`].
    pub fn apply_all(&self, files: &[MigrationFile]) -> Result<MigrationReport, MigrateError> {
        output::header("Executing Migrations");
        tracing::info!(
            "Applying {} migration(s) to {}",
            files.len(),
            redact_connection_string(&self.config.connection_string)
        );

        let mut report = MigrationReport::new();
        for file in files {
            let outcome = self.apply_one(file)?;
            report.record(file.clone(), outcome);
        }
        Ok(report)
    }

    fn apply_one(&self, file: &MigrationFile) -> Result<MigrationOutcome, MigrateError> {
        output::header(&format!("Running: {}", file.name()));

        let spec = CommandSpec::new(&self.client)
            .arg(&self.config.connection_string)
            .arg("-f")
            .arg(file.path());

        let captured = match self.runner.capture(&spec) {
            Ok(captured) => captured,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!("{} could not be started: {}", self.client, e);
                return Err(MigrateError::ToolMissing(self.client.clone()));
            }
            Err(e) => {
                let message = format!("Failed to run {}: {}", self.client, e);
                output::error(&format!(
                    "Error running migration {}: {}",
                    file.name(),
                    e
                ));
                return Ok(MigrationOutcome::Failed(message));
            }
        };

        let outcome = classify(&captured);
        match &outcome {
            MigrationOutcome::Applied => {
                output::success(&format!("Migration {} completed", file.name()));
                for line in preview_lines(&captured.stdout) {
                    output::detail(line.trim_end());
                }
            }
            MigrationOutcome::SkippedAlreadyExists => {
                output::warning(&format!(
                    "Migration {} - objects already exist (skipped)",
                    file.name()
                ));
            }
            MigrationOutcome::Failed(stderr) => {
                output::error(&format!("Migration {} failed:", file.name()));
                eprintln!("{}", stderr.trim_end());
                tracing::warn!(
                    "Migration {} exited with {:?}",
                    file.name(),
                    captured.status_code
                );
            }
        }
        Ok(outcome)
    }
}
