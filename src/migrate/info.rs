// ABOUTME: Lists the tables in the public schema after a migration run
// ABOUTME: Queried through the SQL client with unaligned, tuples-only output

use std::io;

use crate::config::RunConfig;
use crate::error::MigrateError;
use crate::process::{CommandSpec, ProcessRunner};

use super::runner::SQL_CLIENT;

const FIELD_SEPARATOR: &str = "|";

pub const LIST_TABLES_SQL: &str = "SELECT schemaname, tablename, tableowner \
     FROM pg_tables WHERE schemaname = 'public' ORDER BY tablename";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    pub owner: String,
}

fn parse_rows(stdout: &str) -> Vec<TableInfo> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(3, FIELD_SEPARATOR).map(str::trim);
            TableInfo {
                schema: fields.next().unwrap_or_default().to_string(),
                name: fields.next().unwrap_or_default().to_string(),
                owner: fields.next().unwrap_or_default().to_string(),
            }
        })
        .collect()
}

pub fn list_public_tables(
    runner: &dyn ProcessRunner,
    config: &RunConfig,
) -> Result<Vec<TableInfo>, MigrateError> {
    let spec = CommandSpec::new(SQL_CLIENT)
        .arg(&config.connection_string)
        .args(["-X", "-A", "-t", "-F", FIELD_SEPARATOR, "-c", LIST_TABLES_SQL]);

    let captured = match runner.capture(&spec) {
        Ok(captured) => captured,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MigrateError::ToolMissing(SQL_CLIENT.to_string()));
        }
        Err(e) => return Err(MigrateError::QueryFailed(e.to_string())),
    };
    if !captured.success() {
        return Err(MigrateError::QueryFailed(captured.stderr.trim().to_string()));
    }
    Ok(parse_rows(&captured.stdout))
}

pub fn print_tables(tables: &[TableInfo]) {
    println!();
    println!("Database Tables:");
    if tables.is_empty() {
        println!("No tables found in the public schema.");
        return;
    }
    println!("{:<25} {:<25} Owner", "Schema", "Table");
    println!("{:-<75}", "");
    for table in tables {
        println!("{:<25} {:<25} {}", table.schema, table.name, table.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::{exit, ScriptedRunner};

    #[test]
    fn test_list_public_tables_parses_rows() {
        let runner = ScriptedRunner::new(|_| {
            exit(0, "public|people|postgres\npublic|tenants|postgres\n\n", "")
        });
        let config = RunConfig::new("postgresql://postgres@localhost/ems", false);

        let tables = list_public_tables(&runner, &config).unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(
            tables[1],
            TableInfo {
                schema: "public".to_string(),
                name: "tenants".to_string(),
                owner: "postgres".to_string(),
            }
        );
        let calls = runner.calls.borrow();
        assert_eq!(calls[0].args[calls[0].args.len() - 2], "-c");
        print_tables(&tables);
    }

    #[test]
    fn test_query_failure_is_reported() {
        let runner = ScriptedRunner::new(|_| exit(2, "", "psql: error: connection refused\n"));
        let config = RunConfig::new("postgresql://postgres@localhost/ems", false);

        let err = list_public_tables(&runner, &config).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::QueryFailed(ref msg) if msg == "psql: error: connection refused"
        ));
    }
}
