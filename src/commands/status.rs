// ABOUTME: Reports which parts of the project are present, installed and built
// ABOUTME: Read-only; never fails on a missing component

use anyhow::Result;
use std::path::Path;

use super::CommandContext;
use crate::output;

/// One line of the status report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Ok(String),
    Warn(String),
    Missing(String),
}

impl StatusLine {
    fn print(&self) {
        match self {
            StatusLine::Ok(msg) => output::success(msg),
            StatusLine::Warn(msg) => output::warning(msg),
            StatusLine::Missing(msg) => output::error(msg),
        }
    }
}

fn presence(path: &Path, found: &str, absent: &str) -> StatusLine {
    if path.exists() {
        StatusLine::Ok(found.to_string())
    } else {
        StatusLine::Warn(absent.to_string())
    }
}

/// Collect the status report without printing it
pub fn collect_status(ctx: &CommandContext) -> Vec<StatusLine> {
    let layout = ctx.layout;
    let mut lines = Vec::new();

    if layout.client_dir.exists() {
        lines.push(StatusLine::Ok("Frontend directory found".to_string()));
        lines.push(presence(
            &layout.client_dir.join("node_modules"),
            "Frontend dependencies installed",
            "Frontend dependencies not installed",
        ));
        lines.push(presence(
            &layout.client_dir.join("dist"),
            "Frontend build artifacts found",
            "Frontend not built",
        ));
    } else {
        lines.push(StatusLine::Missing("Frontend directory not found".to_string()));
    }

    if layout.server_dir.exists() {
        lines.push(StatusLine::Ok("Backend directory found".to_string()));
        lines.push(presence(
            &layout.server_dir.join("target"),
            "Backend build artifacts found",
            "Backend not built",
        ));
    } else {
        lines.push(StatusLine::Missing("Backend directory not found".to_string()));
    }

    lines.push(presence(
        &layout.config_file,
        "Configuration file found",
        "Configuration file not found",
    ));

    lines
}

pub fn status(ctx: &CommandContext) -> Result<()> {
    output::header("EMS Component Status");
    for line in collect_status(ctx) {
        line.print();
    }
    Ok(())
}
