// ABOUTME: Lints the frontend with the package lint script and the backend with clippy
// ABOUTME: Lint findings are warnings; only a failing cargo check aborts

use anyhow::Result;

use super::{CommandContext, Scope};
use crate::output;
use crate::process::CommandSpec;

pub fn lint(ctx: &CommandContext, scope: Scope, fix: bool) -> Result<()> {
    output::header("Running EMS Linting");

    if scope.frontend {
        output::header("Linting Frontend");
        let client_dir = &ctx.layout.client_dir;
        if client_dir.exists() {
            let mut spec = CommandSpec::new("npm")
                .args(["run", "lint"])
                .current_dir(client_dir);
            if fix {
                spec = spec.args(["--", "--fix"]);
            }
            if ctx.run_allow_failure(&spec)? {
                output::success("Frontend linting completed");
            } else {
                output::warning("Frontend linting found issues");
            }
        } else {
            output::warning("Frontend directory not found");
        }
    }

    if scope.backend {
        output::header("Linting Backend");
        let server_dir = &ctx.layout.server_dir;
        if server_dir.exists() {
            ctx.run(&CommandSpec::new("cargo").arg("check").current_dir(server_dir))?;

            let clippy = if fix {
                CommandSpec::new("cargo").args(["clippy", "--fix", "--allow-dirty", "--allow-staged"])
            } else {
                CommandSpec::new("cargo").args(["clippy", "--all-targets", "--", "-D", "warnings"])
            };
            if ctx.run_allow_failure(&clippy.current_dir(server_dir))? {
                output::success("Backend linting completed");
            } else {
                output::warning("Backend linting found issues");
            }
        } else {
            output::warning("Backend directory not found");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::scaffold;
    use crate::config::EnvConfig;
    use crate::process::testing::{exit, ScriptedRunner};
    use tempfile::tempdir;

    #[test]
    fn test_lint_findings_are_not_fatal() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|spec| {
            if spec.args.first().is_some_and(|a| a == "check") {
                exit(0, "", "")
            } else {
                exit(1, "", "")
            }
        });
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        lint(&ctx, Scope::both(), false).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "npm run lint",
                "cargo check",
                "cargo clippy --all-targets -- -D warnings"
            ]
        );
    }

    #[test]
    fn test_lint_fix_arguments() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        lint(&ctx, Scope::both(), true).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "npm run lint -- --fix",
                "cargo check",
                "cargo clippy --fix --allow-dirty --allow-staged"
            ]
        );
    }

    #[test]
    fn test_failing_cargo_check_aborts() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(101, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        assert!(lint(&ctx, Scope::from_flags(false, true), false).is_err());
        assert_eq!(runner.command_lines(), vec!["cargo check"]);
    }
}
