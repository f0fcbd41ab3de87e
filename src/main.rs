// ABOUTME: CLI entry point for ems-dev
// ABOUTME: Parses commands, runs pre-flight checks and routes to handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ems_dev::commands::{self, CommandContext, MigrateOptions, Scope};
use ems_dev::config::{EnvConfig, ProjectLayout};
use ems_dev::error::exit_code;
use ems_dev::output;
use ems_dev::preflight::run_preflight_checks;
use ems_dev::process::SystemRunner;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ems-dev")]
#[command(about = "Development workflow tool for the EMS project", long_about = None)]
#[command(version)]
struct Cli {
    /// Skip the prerequisite and environment checks
    #[arg(long, global = true)]
    skip_checks: bool,
    /// Project root containing packages/ and config.env
    #[arg(long, global = true, env = "EMS_ROOT", default_value = ".")]
    root: PathBuf,
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy, Default)]
struct ScopeArgs {
    /// Only the frontend (client) package
    #[arg(long)]
    frontend_only: bool,
    /// Only the backend (server) package
    #[arg(long)]
    backend_only: bool,
}

impl From<ScopeArgs> for Scope {
    fn from(args: ScopeArgs) -> Self {
        Scope::from_flags(args.frontend_only, args.backend_only)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the frontend and backend
    Build {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Build the backend in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run the frontend and backend test suites
    Test {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Lint the frontend and run cargo check and clippy on the backend
    Lint {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Apply automatic fixes
        #[arg(long)]
        fix: bool,
    },
    /// Format frontend and backend sources
    Format {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Remove build artifacts
    Clean {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Also remove node_modules and package-lock.json
        #[arg(long)]
        deep: bool,
    },
    /// Start the development servers
    Dev {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Serve the production frontend build
        #[arg(long)]
        production: bool,
    },
    /// Set up the development environment from scratch
    Setup,
    /// Apply the SQL migrations with psql
    Migrate {
        /// List the migrations that would run without touching the database
        #[arg(long)]
        dry_run: bool,
        /// Drop everything in the public schema before migrating
        #[arg(long)]
        fresh: bool,
        /// Skip the confirmation prompt for --fresh
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show which components are present and built
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        output::error(&format!("{:#}", err));
        std::process::exit(exit_code(&err));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let layout = ProjectLayout::load(cli.root.clone())?;
    let env = EnvConfig::load(&layout)?;
    tracing::debug!(
        "Project root {} (config file loaded: {})",
        layout.root.display(),
        env.file_loaded()
    );

    let runner = SystemRunner;
    let ctx = CommandContext {
        layout: &layout,
        env: &env,
        runner: &runner,
    };

    if !cli.skip_checks {
        let result = run_preflight_checks(&runner, &layout, &env);
        if !result.all_passed() {
            result.print();
            anyhow::bail!(
                "Pre-flight checks failed. Fix the issues above or pass --skip-checks"
            );
        }
        tracing::debug!("Pre-flight checks passed");
    }

    match cli.command {
        Commands::Build { scope, release } => commands::build(&ctx, scope.into(), release),
        Commands::Test { scope } => commands::test(&ctx, scope.into()),
        Commands::Lint { scope, fix } => commands::lint(&ctx, scope.into(), fix),
        Commands::Format { scope } => commands::format(&ctx, scope.into()),
        Commands::Clean { scope, deep } => commands::clean(&ctx, scope.into(), deep),
        Commands::Dev { scope, production } => {
            commands::dev(&ctx, scope.into(), production).await
        }
        Commands::Setup => commands::setup(&ctx),
        Commands::Migrate {
            dry_run,
            fresh,
            yes,
        } => commands::migrate(
            &ctx,
            MigrateOptions {
                dry_run,
                fresh,
                yes,
            },
        ),
        Commands::Status => commands::status(&ctx),
    }
}
