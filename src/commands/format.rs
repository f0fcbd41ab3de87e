// ABOUTME: Formats frontend and backend sources
// ABOUTME: Uses the package format script and cargo fmt

use anyhow::Result;

use super::{CommandContext, Scope};
use crate::output;
use crate::process::CommandSpec;
use crate::utils::package_script_exists;

pub fn format(ctx: &CommandContext, scope: Scope) -> Result<()> {
    output::header("Formatting EMS Code");

    if scope.frontend {
        output::header("Formatting Frontend");
        let client_dir = &ctx.layout.client_dir;
        if !client_dir.exists() {
            output::warning("Frontend directory not found");
        } else {
            match package_script_exists(client_dir, "format")? {
                None => output::warning("Frontend package.json not found"),
                Some(false) => output::warning("No format script found in frontend package.json"),
                Some(true) => {
                    ctx.run(
                        &CommandSpec::new("npm")
                            .args(["run", "format"])
                            .current_dir(client_dir),
                    )?;
                    output::success("Frontend formatting completed");
                }
            }
        }
    }

    if scope.backend {
        output::header("Formatting Backend");
        let server_dir = &ctx.layout.server_dir;
        if server_dir.exists() {
            ctx.run(&CommandSpec::new("cargo").arg("fmt").current_dir(server_dir))?;
            output::success("Backend formatting completed");
        } else {
            output::warning("Backend directory not found");
        }
    }

    Ok(())
}
