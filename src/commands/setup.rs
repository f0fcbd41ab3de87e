// ABOUTME: One-shot development environment setup
// ABOUTME: Creates config.env, installs dependencies, builds the backend and applies migrations

use anyhow::{bail, Context, Result};
use std::fs;

use super::CommandContext;
use crate::config::RunConfig;
use crate::migrate::{MigrationRunner, RunOutcome};
use crate::output;
use crate::process::CommandSpec;

pub fn setup(ctx: &CommandContext) -> Result<()> {
    output::header("Setting Up EMS Development Environment");
    let layout = ctx.layout;

    // a freshly copied config file is not part of the startup snapshot
    let copied_env;
    let env = if layout.config_file.exists() {
        ctx.env
    } else {
        if !layout.config_example.exists() {
            bail!("{} not found", layout.config_example.display());
        }
        output::warning(&format!(
            "Copying {} to {}",
            layout.config_example.display(),
            layout.config_file.display()
        ));
        fs::copy(&layout.config_example, &layout.config_file).with_context(|| {
            format!("Failed to create {}", layout.config_file.display())
        })?;
        output::success(&format!(
            "Config file created. Please edit {} with your settings.",
            layout.config_file_name()
        ));
        copied_env = ctx.env.clone().with_file_fallback(&layout.config_file)?;
        &copied_env
    };

    if layout.client_dir.exists() {
        output::header("Installing Frontend Dependencies");
        ctx.run(&CommandSpec::new("npm").arg("ci").current_dir(&layout.client_dir))?;
        output::success("Frontend dependencies installed");
    }

    if layout.server_dir.exists() {
        output::header("Building Backend");
        ctx.run(&CommandSpec::new("cargo").arg("build").current_dir(&layout.server_dir))?;
        output::success("Backend built successfully");
    }

    output::header("Running Database Migrations");
    let config = RunConfig::from_env(env, layout, false)?;
    if layout.migrations_dir.is_dir() {
        if let RunOutcome::Completed(report) =
            MigrationRunner::new(ctx.runner, &config).run(&layout.migrations_dir)?
        {
            report.print_summary();
        }
    } else {
        output::warning(&format!(
            "Migrations directory not found: {} (skipped)",
            layout.migrations_dir.display()
        ));
    }

    output::success("Development environment setup completed!");
    output::warning(&format!(
        "Please configure {} before running the application",
        layout.config_file_name()
    ));
    Ok(())
}
