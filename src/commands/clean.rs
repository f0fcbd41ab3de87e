// ABOUTME: Removes build artifacts from the client and server
// ABOUTME: Deep clean also drops installed frontend dependencies

use anyhow::Result;

use super::{CommandContext, Scope};
use crate::output;
use crate::process::CommandSpec;
use crate::utils::remove_if_exists;

pub fn clean(ctx: &CommandContext, scope: Scope, deep: bool) -> Result<()> {
    output::header("Cleaning EMS Build Artifacts");

    if scope.frontend {
        output::header("Cleaning Frontend");
        let client_dir = &ctx.layout.client_dir;
        if client_dir.exists() {
            if remove_if_exists(&client_dir.join("dist"))? {
                output::success("Removed frontend dist directory");
            }
            if deep {
                if remove_if_exists(&client_dir.join("node_modules"))? {
                    output::success("Removed node_modules directory");
                }
                if remove_if_exists(&client_dir.join("package-lock.json"))? {
                    output::success("Removed package-lock.json");
                }
            }
        } else {
            output::warning("Frontend directory not found");
        }
    }

    if scope.backend {
        output::header("Cleaning Backend");
        let server_dir = &ctx.layout.server_dir;
        if server_dir.exists() {
            ctx.run(&CommandSpec::new("cargo").arg("clean").current_dir(server_dir))?;
            output::success("Backend cleaning completed");
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
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_clean_keeps_dependencies_without_deep() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        fs::create_dir_all(layout.client_dir.join("dist")).unwrap();
        fs::create_dir_all(layout.client_dir.join("node_modules")).unwrap();
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        clean(&ctx, Scope::both(), false).unwrap();

        assert!(!layout.client_dir.join("dist").exists());
        assert!(layout.client_dir.join("node_modules").exists());
        assert_eq!(runner.command_lines(), vec!["cargo clean"]);
    }

    #[test]
    fn test_deep_clean_removes_dependencies() {
        let dir = tempdir().unwrap();
        let layout = scaffold(dir.path());
        fs::create_dir_all(layout.client_dir.join("node_modules/react")).unwrap();
        fs::write(layout.client_dir.join("package-lock.json"), "{}").unwrap();
        let env = EnvConfig::default();
        let runner = ScriptedRunner::new(|_| exit(0, "", ""));
        let ctx = CommandContext {
            layout: &layout,
            env: &env,
            runner: &runner,
        };

        clean(&ctx, Scope::from_flags(true, false), true).unwrap();

        assert!(!layout.client_dir.join("node_modules").exists());
        assert!(!layout.client_dir.join("package-lock.json").exists());
        assert_eq!(runner.call_count(), 0);
    }
}
