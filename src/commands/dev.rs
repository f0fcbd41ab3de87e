// ABOUTME: Starts the frontend and backend development servers together
// ABOUTME: Missing halves are reported but never block the other server

use anyhow::{bail, Result};

use super::build::ensure_node_modules;
use super::{CommandContext, Scope};
use crate::devserver::{run_servers, ServerExit, ServerSpec};
use crate::output;
use crate::process::CommandSpec;

pub const BACKEND_BIN: &str = "ems-server";

/// Work out which servers to launch, installing frontend dependencies on the way
pub fn plan_servers(ctx: &CommandContext, scope: Scope, production: bool) -> Result<Vec<ServerSpec>> {
    if !scope.frontend && !scope.backend {
        bail!("--frontend-only and --backend-only cannot be used together");
    }

    let layout = ctx.layout;
    let mut servers = Vec::new();

    if scope.frontend {
        if layout.client_dir.exists() {
            ensure_node_modules(ctx)?;
            let script = if production { "preview" } else { "start" };
            servers.push(ServerSpec::new(
                "Frontend",
                ctx.with_config_env(
                    CommandSpec::new("npm")
                        .args(["run", script])
                        .current_dir(&layout.client_dir),
                ),
            ));
        } else {
            output::error(&format!(
                "Frontend directory not found: {}",
                layout.client_dir.display()
            ));
        }
    }

    if scope.backend {
        if layout.server_dir.exists() {
            servers.push(ServerSpec::new(
                "Backend",
                ctx.with_config_env(
                    CommandSpec::new("cargo")
                        .args(["run", "--bin", BACKEND_BIN])
                        .current_dir(&layout.server_dir),
                ),
            ));
        } else {
            output::error(&format!(
                "Backend directory not found: {}",
                layout.server_dir.display()
            ));
        }
    }

    Ok(servers)
}

pub async fn dev(ctx: &CommandContext<'_>, scope: Scope, production: bool) -> Result<()> {
    output::header("Starting Development Servers");
    let servers = plan_servers(ctx, scope, production)?;
    if servers.is_empty() {
        output::warning("Nothing to start");
        return Ok(());
    }

    println!("Press Ctrl+C to stop all servers");
    match run_servers(&servers).await? {
        ServerExit::Interrupted => output::success("All servers stopped"),
        ServerExit::Finished(exits) => {
            for (name, status) in exits {
                if status.success() {
                    output::success(&format!("{} server exited", name));
                } else {
                    output::warning(&format!("{} server exited with {}", name, status));
                }
            }
        }
    }
    Ok(())
}
