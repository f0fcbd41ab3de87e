// ABOUTME: External process capability shared by every command
// ABOUTME: Wraps captured runs, streamed runs and PATH lookup behind a trait

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Exit status and captured streams of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// `None` when the process was terminated by a signal
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    /// Passed to the child exactly; paths need not be UTF-8
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    /// Set on top of the inherited environment
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.envs
            .extend(envs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Value of an explicitly set child variable
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Command line as shown to the operator
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }
}

/// Narrow capability for running external programs.
///
/// Both run methods return an `io::Error` of kind `NotFound` when the
/// executable cannot be located, so callers can tell a missing tool apart
/// from a tool that ran and failed.
pub trait ProcessRunner {
    /// Run to completion, capturing stdout and stderr.
    fn capture(&self, spec: &CommandSpec) -> io::Result<CapturedOutput>;

    /// Run to completion with inherited stdio and return the exit code.
    fn stream(&self, spec: &CommandSpec) -> io::Result<Option<i32>>;

    /// Resolve `program` against PATH.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// [`ProcessRunner`] backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn capture(&self, spec: &CommandSpec) -> io::Result<CapturedOutput> {
        tracing::debug!("Capturing: {}", spec.display());
        let output = spec.to_command().output()?;
        Ok(CapturedOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn stream(&self, spec: &CommandSpec) -> io::Result<Option<i32>> {
        tracing::debug!("Streaming: {}", spec.display());
        let status = spec.to_command().status()?;
        Ok(status.code())
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Human readable location used in "Running: ..." lines
pub fn describe_cwd(spec: &CommandSpec, default_root: &Path) -> String {
    spec.cwd
        .as_deref()
        .unwrap_or(default_root)
        .display()
        .to_string()
}
