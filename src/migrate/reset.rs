// ABOUTME: Fresh-start reset that empties the public schema before migrating
// ABOUTME: Runs a single DO block through the SQL client with ON_ERROR_STOP

use std::io;

use crate::config::RunConfig;
use crate::error::MigrateError;
use crate::output;
use crate::process::{CommandSpec, ProcessRunner};

use super::runner::SQL_CLIENT;

/// Drops every table, sequence, function and user-defined type in `public`
pub const RESET_SQL: &str = r#"
DO $$
DECLARE
    r RECORD;
BEGIN
    FOR r IN (SELECT tablename FROM pg_tables WHERE schemaname = 'public')
    LOOP
        EXECUTE 'DROP TABLE IF EXISTS public.' || quote_ident(r.tablename) || ' CASCADE';
    END LOOP;

    FOR r IN (SELECT sequencename FROM pg_sequences WHERE schemaname = 'public')
    LOOP
        EXECUTE 'DROP SEQUENCE IF EXISTS public.' || quote_ident(r.sequencename) || ' CASCADE';
    END LOOP;

    FOR r IN (SELECT p.proname, oidvectortypes(p.proargtypes) AS argtypes
              FROM pg_proc p
              JOIN pg_namespace ns ON p.pronamespace = ns.oid
              WHERE ns.nspname = 'public' AND p.prokind = 'f')
    LOOP
        EXECUTE 'DROP FUNCTION IF EXISTS public.' || quote_ident(r.proname)
            || '(' || r.argtypes || ') CASCADE';
    END LOOP;

    FOR r IN (SELECT t.typname
              FROM pg_type t
              JOIN pg_namespace ns ON t.typnamespace = ns.oid
              WHERE ns.nspname = 'public' AND t.typtype IN ('e', 'd'))
    LOOP
        EXECUTE 'DROP TYPE IF EXISTS public.' || quote_ident(r.typname) || ' CASCADE';
    END LOOP;
END $$;
"#;

/// Empty the public schema of the configured database.
///
/// Unlike migration files, any failure here is fatal: applying migrations on
/// top of a half-dropped schema would only produce confusing errors.
pub fn reset_database(runner: &dyn ProcessRunner, config: &RunConfig) -> Result<(), MigrateError> {
    output::header("Resetting Database");
    tracing::info!("Dropping all objects in the public schema");

    let spec = CommandSpec::new(SQL_CLIENT)
        .arg(&config.connection_string)
        .args(["-v", "ON_ERROR_STOP=1", "-c", RESET_SQL]);

    let captured = match runner.capture(&spec) {
        Ok(captured) => captured,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MigrateError::ToolMissing(SQL_CLIENT.to_string()));
        }
        Err(e) => return Err(MigrateError::ResetFailed(e.to_string())),
    };

    if !captured.success() {
        return Err(MigrateError::ResetFailed(captured.stderr.trim().to_string()));
    }

    output::success("All tables, sequences, functions and types dropped");
    Ok(())
}
