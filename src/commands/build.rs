// ABOUTME: Builds the frontend bundle and the backend crate
// ABOUTME: Installs frontend dependencies first when node_modules is missing

use anyhow::{bail, Result};

use super::{CommandContext, Scope};
use crate::output;
use crate::process::CommandSpec;

pub fn build(ctx: &CommandContext, scope: Scope, release: bool) -> Result<()> {
    output::header("Building EMS Components");

    if scope.frontend {
        output::header("Building Frontend");
        let client_dir = &ctx.layout.client_dir;
        if !client_dir.exists() {
            bail!("Client directory not found: {}", client_dir.display());
        }

        ensure_node_modules(ctx)?;
        ctx.run(&CommandSpec::new("npm").args(["run", "build"]).current_dir(client_dir))?;
        output::success("Frontend build completed");
    }

    if scope.backend {
        output::header("Building Backend");
        let server_dir = &ctx.layout.server_dir;
        if !server_dir.exists() {
            bail!("Server directory not found: {}", server_dir.display());
        }

        let mut spec = CommandSpec::new("cargo").arg("build").current_dir(server_dir);
        if release {
            spec = spec.arg("--release");
        }
        ctx.run(&spec)?;
        output::success("Backend build completed");
    }

    output::success("Build completed successfully!");
    Ok(())
}

/// `npm ci` in the client directory unless dependencies are already installed
pub(crate) fn ensure_node_modules(ctx: &CommandContext) -> Result<()> {
    let client_dir = &ctx.layout.client_dir;
    if client_dir.join("node_modules").exists() {
        return Ok(());
    }
    output::warning("node_modules not found. Installing dependencies...");
    ctx.run(&CommandSpec::new("npm").arg("ci").current_dir(client_dir))
}
