// ABOUTME: Command implementations for each workflow subcommand
// ABOUTME: Shared context, frontend/backend scope and tool invocation helpers

pub mod build;
pub mod clean;
pub mod dev;
pub mod format;
pub mod lint;
pub mod migrate;
pub mod setup;
pub mod status;
pub mod test;

pub use build::build;
pub use clean::clean;
pub use dev::dev;
pub use format::format;
pub use lint::lint;
pub use migrate::{migrate, MigrateOptions};
pub use setup::setup;
pub use status::status;
pub use test::test;

use anyhow::{bail, Result};
use std::io;

use crate::config::{EnvConfig, ProjectLayout};
use crate::error::ToolFailed;
use crate::process::{describe_cwd, CommandSpec, ProcessRunner};

/// Everything a command needs, built once in `main`
pub struct CommandContext<'a> {
    pub layout: &'a ProjectLayout,
    pub env: &'a EnvConfig,
    pub runner: &'a dyn ProcessRunner,
}

/// Which halves of the project a command touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub frontend: bool,
    pub backend: bool,
}

impl Scope {
    /// `--frontend-only` excludes the backend and vice versa
    pub fn from_flags(frontend_only: bool, backend_only: bool) -> Self {
        Self {
            frontend: !backend_only,
            backend: !frontend_only,
        }
    }

    pub fn both() -> Self {
        Self::from_flags(false, false)
    }
}

impl CommandContext<'_> {
    /// Run a tool with inherited stdio; a non-zero exit is an error.
    pub fn run(&self, spec: &CommandSpec) -> Result<()> {
        match self.run_status(spec)? {
            Some(0) => Ok(()),
            code => {
                let command = spec.display();
                crate::output::error(&format!(
                    "Command failed with exit code {}: {}",
                    code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()),
                    command
                ));
                Err(ToolFailed {
                    command,
                    code: code.unwrap_or(1),
                }
                .into())
            }
        }
    }

    /// Run a tool with inherited stdio and report whether it succeeded
    pub fn run_allow_failure(&self, spec: &CommandSpec) -> Result<bool> {
        Ok(self.run_status(spec)? == Some(0))
    }

    /// `spec` with the configuration snapshot set in the child's environment
    pub fn with_config_env(&self, spec: CommandSpec) -> CommandSpec {
        spec.envs(self.env.iter())
    }

    fn run_status(&self, spec: &CommandSpec) -> Result<Option<i32>> {
        println!(
            "Running: {} (in {})",
            spec.display(),
            describe_cwd(spec, &self.layout.root)
        );
        match self.runner.stream(&self.with_config_env(spec.clone())) {
            Ok(code) => Ok(code),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                bail!("{} not found. Is it installed and on PATH?", spec.program)
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to run {}", spec.display()))),
        }
    }
}
