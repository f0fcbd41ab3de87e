// ABOUTME: Runs long-lived development servers side by side
// ABOUTME: Waits for all of them and forwards Ctrl+C as SIGTERM

use anyhow::{Context, Result};
use futures::future::join_all;
use std::process::ExitStatus;
use tokio::process::{Child, Command};

use crate::output;
use crate::process::CommandSpec;

/// A named server process, e.g. "Frontend" running `npm run start`
#[derive(Debug, Clone)]
pub struct ServerSpec {
    pub name: String,
    pub command: CommandSpec,
}

impl ServerSpec {
    pub fn new(name: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }

    fn spawn(&self) -> Result<Child> {
        Command::from(self.command.to_command())
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to start {} server ({})",
                    self.name,
                    self.command.display()
                )
            })
    }
}

/// How a supervised run ended
#[derive(Debug)]
pub enum ServerExit {
    /// Every server exited by itself
    Finished(Vec<(String, ExitStatus)>),
    /// Ctrl+C was received and the servers were stopped
    Interrupted,
}

/// Spawn every server and wait until all have exited or Ctrl+C arrives.
///
/// A server that fails to spawn stops the ones already started.
pub async fn run_servers(specs: &[ServerSpec]) -> Result<ServerExit> {
    run_servers_until(specs, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// [`run_servers`] with the interrupt supplied by the caller
pub async fn run_servers_until<S>(specs: &[ServerSpec], interrupt: S) -> Result<ServerExit>
where
    S: std::future::Future<Output = ()>,
{
    let mut children: Vec<(String, Child)> = Vec::with_capacity(specs.len());
    for spec in specs {
        println!("Starting {} server: {}", spec.name, spec.command.display());
        match spec.spawn() {
            Ok(child) => children.push((spec.name.clone(), child)),
            Err(e) => {
                stop_all(&mut children).await;
                return Err(e);
            }
        }
    }

    if children.is_empty() {
        return Ok(ServerExit::Finished(Vec::new()));
    }

    let names: Vec<String> = children.iter().map(|(name, _)| name.clone()).collect();
    let finished = tokio::select! {
        statuses = join_all(children.iter_mut().map(|(_, child)| child.wait())) => Some(statuses),
        _ = interrupt => None,
    };

    match finished {
        Some(statuses) => {
            let mut exits = Vec::with_capacity(statuses.len());
            for (name, status) in names.into_iter().zip(statuses) {
                let status =
                    status.with_context(|| format!("Failed to wait for {} server", name))?;
                if !status.success() {
                    tracing::warn!("{} server exited with {}", name, status);
                }
                exits.push((name, status));
            }
            Ok(ServerExit::Finished(exits))
        }
        None => {
            println!();
            output::warning("Shutting down servers...");
            stop_all(&mut children).await;
            Ok(ServerExit::Interrupted)
        }
    }
}

async fn stop_all(children: &mut [(String, Child)]) {
    for (name, child) in children.iter_mut() {
        terminate(child);
        match child.wait().await {
            Ok(_) => output::success(&format!("{} server stopped", name)),
            Err(e) => tracing::warn!("Failed to wait for {} server: {}", name, e),
        }
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
    // id() is None once the child has been reaped
    if let Some(pid) = child.id() {
        let result = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if result != 0 {
            tracing::debug!(
                "SIGTERM to {} failed: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::debug!("Failed to kill child: {}", e);
    }
}
