// ABOUTME: Finds migration files and orders them for execution
// ABOUTME: Only non-hidden *.sql files are candidates, sorted by filename

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MigrateError;

/// A discovered SQL migration. Ordered by filename.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MigrationFile {
    // field order matters for the derived Ord
    name: String,
    path: PathBuf,
}

impl MigrationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True for `*.sql` names that are not hidden (`.`-prefixed)
pub fn is_migration_name(name: &str) -> bool {
    !name.starts_with('.')
        && Path::new(name)
            .extension()
            .map(|ext| ext == "sql")
            .unwrap_or(false)
}

/// List the migrations in `dir` in the order they must be applied.
///
/// The directory must exist; callers check that first. An empty result means
/// there is nothing to do.
pub fn discover_migrations(dir: &Path) -> Result<Vec<MigrationFile>, MigrateError> {
    let io_err = |source| MigrateError::Discovery {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_migration_name(&name) {
            continue;
        }
        if !entry.path().is_file() {
            tracing::debug!("Ignoring non-file entry {}", name);
            continue;
        }
        files.push(MigrationFile::new(entry.path()));
    }

    files.sort();
    tracing::debug!("Discovered {} migration(s) in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(files: &[MigrationFile]) -> Vec<&str> {
        files.iter().map(MigrationFile::name).collect()
    }

    #[test]
    fn test_is_migration_name() {
        assert!(is_migration_name("001_create_tenants_table.sql"));
        assert!(!is_migration_name(".hidden.sql"));
        assert!(!is_migration_name("readme.txt"));
        assert!(!is_migration_name("001_init.sql.bak"));
        assert!(!is_migration_name("001_init.SQL"));
        assert!(!is_migration_name("sql"));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["002_b.sql", "001_a.sql", ".hidden.sql", "readme.txt"] {
            fs::write(dir.path().join(name), "SELECT 1;").unwrap();
        }

        let files = discover_migrations(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["001_a.sql", "002_b.sql"]);
        assert_eq!(files[0].path(), dir.path().join("001_a.sql"));
    }

    #[test]
    fn test_discover_uses_string_order() {
        let dir = tempdir().unwrap();
        for name in ["10_late.sql", "9_early.sql", "101_people.sql", "000_setup.sql"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = discover_migrations(dir.path()).unwrap();
        assert_eq!(
            names(&files),
            vec!["000_setup.sql", "101_people.sql", "10_late.sql", "9_early.sql"]
        );
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover_migrations(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_skips_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("archive.sql")).unwrap();
        fs::write(dir.path().join("001_a.sql"), "").unwrap();

        let files = discover_migrations(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["001_a.sql"]);
    }

    #[test]
    fn test_discover_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover_migrations(&missing).unwrap_err();
        assert!(matches!(err, MigrateError::Discovery { .. }));
    }
}
