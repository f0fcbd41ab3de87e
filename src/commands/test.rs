// ABOUTME: Runs the frontend and backend test suites
// ABOUTME: Frontend tests only run when package.json defines a test script

use anyhow::Result;

use super::{CommandContext, Scope};
use crate::output;
use crate::process::CommandSpec;
use crate::utils::package_script_exists;

pub fn test(ctx: &CommandContext, scope: Scope) -> Result<()> {
    output::header("Running EMS Tests");

    if scope.frontend {
        output::header("Running Frontend Tests");
        let client_dir = &ctx.layout.client_dir;
        if !client_dir.exists() {
            output::warning("Frontend directory not found");
        } else {
            match package_script_exists(client_dir, "test")? {
                None => output::warning("Frontend package.json not found"),
                Some(false) => output::warning("No test script found in frontend package.json"),
                Some(true) => {
                    ctx.run(
                        &CommandSpec::new("npm")
                            .args(["test", "--", "--watchAll=false"])
                            .current_dir(client_dir),
                    )?;
                    output::success("Frontend tests completed");
                }
            }
        }
    }

    if scope.backend {
        output::header("Running Backend Tests");
        let server_dir = &ctx.layout.server_dir;
        if server_dir.exists() {
            ctx.run(&CommandSpec::new("cargo").arg("test").current_dir(server_dir))?;
            output::success("Backend tests completed");
        } else {
            output::warning("Backend directory not found");
        }
    }

    output::success("All tests completed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::scaffold;
    use crate::config::{EnvConfig, ProjectLayout};
    use crate::process::testing::{exit, ScriptedRunner};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_runs_npm_test_when_script_defined() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        fs::write(
            layout.client_dir.join("package.json"),
            r#"{"scripts": {"test": "vitest run"}}"#,
        )
        .unwrap();
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        test(&ctx, Scope::both()).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["npm test -- --watchAll=false", "cargo test"]
        );
    }

    #[test]
    fn test_skips_frontend_without_test_script() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        fs::write(layout.client_dir.join("package.json"), r#"{"scripts": {}}"#).unwrap();
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        test(&ctx, Scope::both()).unwrap();

        assert_eq!(runner.command_lines(), vec!["cargo test"]);
    }

    #[test]
    fn test_missing_directories_only_warn() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        test(&ctx, Scope::both()).unwrap();
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_backend_failure_propagates() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(101, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        let err = test(&ctx, Scope::from_flags(false, true)).unwrap_err();
        assert_eq!(crate::error::exit_code(&err), 101);
    }
}
