// ABOUTME: Migration runner for the SQL files in the migrations directory
// ABOUTME: Discovers files in filename order and applies them one at a time through psql

pub mod discovery;
pub mod info;
pub mod reset;
pub mod runner;

pub use discovery::{discover_migrations, is_migration_name, MigrationFile};
pub use info::{list_public_tables, print_tables, TableInfo};
pub use reset::{reset_database, RESET_SQL};
pub use runner::{
    classify, preview_lines, BatchStatus, MigrationOutcome, MigrationReport, MigrationRunner,
    RunOutcome, ALREADY_EXISTS_MARKER, OUTPUT_PREVIEW_LINES, SQL_CLIENT,
};
