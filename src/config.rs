// ABOUTME: Project layout and configuration value objects
// ABOUTME: Reads config.env as a fallback without mutating the process environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MigrateError;

pub const DEFAULT_CLIENT_DIR: &str = "packages/ems-client";
pub const DEFAULT_SERVER_DIR: &str = "packages/ems-server";
pub const DEFAULT_MIGRATIONS_DIR: &str = "packages/ems-db";
pub const DEFAULT_CONFIG_FILE: &str = "config.env";
pub const LAYOUT_FILE: &str = "ems.toml";

pub const DATABASE_URL: &str = "DATABASE_URL";

/// Variables that must be configured before any workflow command runs
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    DATABASE_URL,
    "SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "JWT_SECRET",
];

/// Values shipped in config.env.example that count as "not configured"
pub const PLACEHOLDER_VALUES: [&str; 5] = [
    "your-password",
    "your-project",
    "your-anon-key-here",
    "your-service-role-key-here",
    "your-super-secret-jwt-key-here",
];

/// Where the client, server, migrations and config file live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub client_dir: PathBuf,
    pub server_dir: PathBuf,
    pub migrations_dir: PathBuf,
    pub config_file: PathBuf,
    pub config_example: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    #[serde(default)]
    layout: LayoutOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutOverrides {
    client_dir: Option<String>,
    server_dir: Option<String>,
    migrations_dir: Option<String>,
    config_file: Option<String>,
}

impl ProjectLayout {
    /// Default layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            client_dir: root.join(DEFAULT_CLIENT_DIR),
            server_dir: root.join(DEFAULT_SERVER_DIR),
            migrations_dir: root.join(DEFAULT_MIGRATIONS_DIR),
            config_file: root.join(DEFAULT_CONFIG_FILE),
            config_example: root.join(example_name(DEFAULT_CONFIG_FILE)),
            root,
        }
    }

    /// Default layout, adjusted by `ems.toml` when the root contains one
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let mut layout = Self::new(root);
        let layout_path = layout.root.join(LAYOUT_FILE);
        if !layout_path.exists() {
            return Ok(layout);
        }

        let content = fs::read_to_string(&layout_path)
            .with_context(|| format!("Failed to read {}", layout_path.display()))?;
        let parsed: LayoutFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", layout_path.display()))?;
        tracing::debug!("Loaded layout overrides from {}", layout_path.display());

        let overrides = parsed.layout;
        if let Some(dir) = overrides.client_dir {
            layout.client_dir = layout.root.join(dir);
        }
        if let Some(dir) = overrides.server_dir {
            layout.server_dir = layout.root.join(dir);
        }
        if let Some(dir) = overrides.migrations_dir {
            layout.migrations_dir = layout.root.join(dir);
        }
        if let Some(file) = overrides.config_file {
            layout.config_example = layout.root.join(example_name(&file));
            layout.config_file = layout.root.join(file);
        }
        Ok(layout)
    }

    /// Config file name relative to the root, for operator messages
    pub fn config_file_name(&self) -> String {
        self.config_file
            .strip_prefix(&self.root)
            .unwrap_or(&self.config_file)
            .display()
            .to_string()
    }
}

fn example_name(config_file: &str) -> String {
    format!("{}.example", config_file)
}

/// Entries of a `config.env` file, in file order.
///
/// One `KEY=VALUE` per line, split at the first `=` with both sides trimmed.
/// Blank lines, `#` comments and lines without `=` are skipped. Values are
/// literal: no quoting, escapes or `$VAR` expansion.
pub fn parse_config_lines(content: &str) -> Vec<(&str, &str)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Immutable snapshot of configuration values.
///
/// Built once at startup from the process environment, with `config.env`
/// filling in keys that are unset or empty. Commands receive this value
/// instead of reading `std::env` themselves.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    values: BTreeMap<String, String>,
    file_loaded: bool,
}

impl EnvConfig {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file_loaded: false,
        }
    }

    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Process environment plus the layout's config file, if it exists
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let env = Self::from_process();
        if layout.config_file.exists() {
            env.with_file_fallback(&layout.config_file)
        } else {
            Ok(env)
        }
    }

    /// Fill in keys that are unset or empty from a `KEY=VALUE` file.
    ///
    /// Values already present are never overridden.
    pub fn with_file_fallback(mut self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        for (key, value) in parse_config_lines(&content) {
            if self.get(key).is_none() {
                self.values.insert(key.to_string(), value.to_string());
            }
        }
        self.file_loaded = true;
        Ok(self)
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set and not one of the known placeholder values
    pub fn is_configured(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| !PLACEHOLDER_VALUES.contains(&v))
            .unwrap_or(false)
    }

    /// Required variables that are unset or still hold a placeholder
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|var| !self.is_configured(var))
            .collect()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.get(DATABASE_URL)
    }

    pub fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Every key/value pair, including ones filled from the config file
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Settings for one migration run, fixed before the batch starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub connection_string: String,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(connection_string: impl Into<String>, dry_run: bool) -> Self {
        Self {
            connection_string: connection_string.into(),
            dry_run,
        }
    }

    pub fn from_env(
        env: &EnvConfig,
        layout: &ProjectLayout,
        dry_run: bool,
    ) -> Result<Self, MigrateError> {
        let url = env
            .database_url()
            .ok_or_else(|| MigrateError::ConfigurationMissing {
                var: DATABASE_URL,
                config_file: layout.config_file_name(),
            })?;
        Ok(Self::new(url, dry_run))
    }
}
