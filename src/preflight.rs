// ABOUTME: Pre-flight validation run before every workflow command
// ABOUTME: Checks required developer tools and the configured environment variables

use std::fmt;

use crate::config::{EnvConfig, ProjectLayout};
use crate::process::{CommandSpec, ProcessRunner};

/// A tool that must be installed, with the hint shown when it is not
struct Prerequisite {
    program: &'static str,
    label: &'static str,
    install_hint: &'static str,
}

static PREREQUISITES: [Prerequisite; 4] = [
    Prerequisite {
        program: "node",
        label: "Node.js",
        install_hint: "Install Node.js 18+ from https://nodejs.org",
    },
    Prerequisite {
        program: "npm",
        label: "npm",
        install_hint: "npm ships with Node.js; reinstall Node.js 18+",
    },
    Prerequisite {
        program: "rustc",
        label: "Rust",
        install_hint: "Install Rust 1.70+ via https://rustup.rs",
    },
    Prerequisite {
        program: "cargo",
        label: "Cargo",
        install_hint: "Cargo ships with rustup: rustup component add cargo",
    },
];

/// Individual check result
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Issue with suggested fixes
#[derive(Debug, Clone)]
pub struct PreflightIssue {
    pub title: String,
    pub explanation: String,
    pub fixes: Vec<String>,
}

/// Complete pre-flight results
#[derive(Debug, Default)]
pub struct PreflightResult {
    pub prerequisites: Vec<CheckResult>,
    pub environment: Vec<CheckResult>,
    pub issues: Vec<PreflightIssue>,
}

impl PreflightResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.issues.len()
    }

    /// Write the report to stdout
    pub fn print(&self) {
        print!("{}", self);
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, checks: &[CheckResult]) -> fmt::Result {
    if checks.is_empty() {
        return Ok(());
    }
    writeln!(f, "=== {} ===", title)?;
    for check in checks {
        let icon = if check.passed { "✓" } else { "✗" };
        writeln!(f, "{} {}", icon, check.message)?;
        if let Some(ref details) = check.details {
            writeln!(f, "  {}", details)?;
        }
    }
    writeln!(f)
}

impl fmt::Display for PreflightResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "Checking Prerequisites", &self.prerequisites)?;
        write_section(f, "Checking Environment Variables", &self.environment)?;

        if self.all_passed() {
            return writeln!(f, "✓ All pre-flight checks passed");
        }
        writeln!(f, "✗ {} pre-flight issue(s) found", self.failed_count())?;
        for issue in &self.issues {
            writeln!(f)?;
            writeln!(f, "{}: {}", issue.title, issue.explanation)?;
            for fix in &issue.fixes {
                writeln!(f, "  - {}", fix)?;
            }
        }
        Ok(())
    }
}

/// Run all pre-flight checks
pub fn run_preflight_checks(
    runner: &dyn ProcessRunner,
    layout: &ProjectLayout,
    env: &EnvConfig,
) -> PreflightResult {
    let mut result = PreflightResult::new();
    check_prerequisites(runner, &mut result);
    check_environment(layout, env, &mut result);
    result
}

/// Every prerequisite must be on PATH and answer `--version` successfully
pub fn check_prerequisites(runner: &dyn ProcessRunner, result: &mut PreflightResult) {
    let mut missing = Vec::new();

    for tool in &PREREQUISITES {
        let Some(path) = runner.locate(tool.program) else {
            missing.push(tool);
            result.prerequisites.push(CheckResult::fail(
                tool.program,
                format!("{} not found in PATH", tool.label),
            ));
            continue;
        };

        let version = runner
            .capture(&CommandSpec::new(path.display().to_string()).arg("--version"))
            .ok()
            .filter(|out| out.success())
            .map(|out| out.stdout.lines().next().unwrap_or_default().trim().to_string());

        match version {
            Some(version) => {
                result.prerequisites.push(
                    CheckResult::pass(tool.program, format!("{} found: {}", tool.label, version))
                        .with_details(path.display().to_string()),
                );
            }
            None => {
                missing.push(tool);
                result.prerequisites.push(
                    CheckResult::fail(tool.program, format!("{} is not working", tool.label))
                        .with_details(format!("{} --version failed", path.display())),
                );
            }
        }
    }

    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|t| t.label).collect();
        result.issues.push(PreflightIssue {
            title: "Missing developer tools".to_string(),
            explanation: format!("Required tools not available: {}", names.join(", ")),
            fixes: missing.iter().map(|t| t.install_hint.to_string()).collect(),
        });
    }
}

/// The config file must exist and every required variable must hold a real value
pub fn check_environment(layout: &ProjectLayout, env: &EnvConfig, result: &mut PreflightResult) {
    let config_name = layout.config_file_name();

    if !layout.config_file.exists() {
        result.environment.push(CheckResult::fail(
            "config_file",
            format!("Config file not found: {}", layout.config_file.display()),
        ));
        result.issues.push(PreflightIssue {
            title: "Missing configuration file".to_string(),
            explanation: format!("{} is required for local development", config_name),
            fixes: vec![
                format!("Copy {0}.example to {0} and configure it", config_name),
                "Or run: ems-dev --skip-checks setup".to_string(),
            ],
        });
        return;
    }

    for var in crate::config::REQUIRED_ENV_VARS {
        if env.is_configured(var) {
            result
                .environment
                .push(CheckResult::pass(var, format!("{} is configured", var)));
        } else {
            result.environment.push(CheckResult::fail(
                var,
                format!("{} is missing or unconfigured", var),
            ));
        }
    }

    let missing = env.missing_required();
    if !missing.is_empty() {
        result.issues.push(PreflightIssue {
            title: "Missing or unconfigured environment variables".to_string(),
            explanation: missing.join(", "),
            fixes: vec![format!("Configure these variables in {}", config_name)],
        });
    }
}
