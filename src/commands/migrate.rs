// ABOUTME: Applies the SQL migrations in the migrations directory through psql
// ABOUTME: Supports listing pending files (dry run) and an optional fresh-start reset

use anyhow::Result;

use super::CommandContext;
use crate::config::RunConfig;
use crate::error::MigrateError;
use crate::migrate::{
    list_public_tables, print_tables, reset_database, MigrationRunner, RunOutcome,
};
use crate::output;

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
    pub dry_run: bool,
    /// Drop everything in the public schema first
    pub fresh: bool,
    /// Skip the fresh-start confirmation prompt
    pub yes: bool,
}

pub fn migrate(ctx: &CommandContext, opts: MigrateOptions) -> Result<()> {
    migrate_with_confirm(ctx, opts, confirm_reset)
}

/// [`migrate`] with the fresh-start confirmation supplied by the caller
pub fn migrate_with_confirm<F>(ctx: &CommandContext, opts: MigrateOptions, confirm: F) -> Result<()>
where
    F: FnOnce() -> Result<bool>,
{
    output::header("Running Database Migrations");

    let migrations_dir = &ctx.layout.migrations_dir;
    if !migrations_dir.is_dir() {
        return Err(MigrateError::DirectoryMissing(migrations_dir.clone()).into());
    }

    let config = RunConfig::from_env(ctx.env, ctx.layout, opts.dry_run)?;

    if opts.fresh {
        if config.dry_run {
            output::warning("Dry run mode - database would be reset before migrating");
        } else {
            if !opts.yes && !confirm()? {
                output::warning("Operation cancelled");
                return Ok(());
            }
            reset_database(ctx.runner, &config)?;
        }
    }

    match MigrationRunner::new(ctx.runner, &config).run(migrations_dir)? {
        RunOutcome::NoMigrations | RunOutcome::DryRun(_) => {}
        RunOutcome::Completed(report) => {
            report.print_summary();
            if report.has_failures() {
                tracing::warn!(
                    "{} of {} migration(s) failed",
                    report.failed_count(),
                    report.entries().len()
                );
            }
            match list_public_tables(ctx.runner, &config) {
                Ok(tables) => print_tables(&tables),
                Err(e) => output::warning(&e.to_string()),
            }
        }
    }
    Ok(())
}

fn confirm_reset() -> Result<bool> {
    use dialoguer::{theme::ColorfulTheme, Confirm};

    output::warning("WARNING: This will DROP ALL TABLES in the database!");
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you want to continue?")
        .default(false)
        .interact()?;
    Ok(confirmed)
}
