use crate::error::{Error, Kind};
use crate::Migration;
use regex::Regex;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::{DirEntry, WalkDir};

const STEM_RE: &str = r"^m\d{6}_\d{6}_\w+$";

fn stem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STEM_RE).expect("migration name regex is valid"))
}

/// enum containing the migration types used to search for migrations,
/// either Rust modules or directories of SQL scripts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationType {
    /// `m{YYMMDD_HHMMSS}_{name}.rs` files declaring `up` and `down` functions
    Mod,
    /// `m{YYMMDD_HHMMSS}_{name}/` directories holding `up.sql` and optionally `down.sql`
    Sql,
}

impl MigrationType {
    // the version a matching entry stands for
    fn version_of(&self, entry: &DirEntry) -> Option<String> {
        let path = entry.path();
        match self {
            MigrationType::Mod => {
                if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("rs")) {
                    return None;
                }
                path.file_stem().and_then(OsStr::to_str).map(str::to_string)
            }
            MigrationType::Sql => {
                if !entry.file_type().is_dir() || !path.join("up.sql").is_file() {
                    return None;
                }
                path.file_name().and_then(OsStr::to_str).map(str::to_string)
            }
        }
    }
}

/// Checks `name` follows the `m{YYMMDD_HHMMSS}_{name}` convention and returns it as a version.
pub fn parse_migration_name(name: &str) -> Result<String, Error> {
    if stem_re().is_match(name) {
        Ok(name.to_string())
    } else {
        Err(Error::new(Kind::InvalidName(name.to_string()), None))
    }
}

/// find migrations on file system recursively across directories given a location and [MigrationType]
pub fn find_migration_files(
    location: impl AsRef<Path>,
    migration_type: MigrationType,
) -> Result<impl Iterator<Item = PathBuf>, Error> {
    let location: &Path = location.as_ref();
    let location = location.canonicalize().map_err(|err| {
        Error::new(
            Kind::InvalidMigrationPath(location.to_path_buf(), err),
            None,
        )
    })?;

    let mut result: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(&location)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let version = match migration_type.version_of(&entry) {
            Some(version) => version,
            None => continue,
        };

        if parse_migration_name(&version).is_err() {
            log::warn!(
                "\"{}\" does not adhere to the migration naming convention. Migrations must be named in the format m{{YYMMDD_HHMMSS}}_{{name}}, where {{name}} only holds word characters.",
                entry.path().display()
            );
            continue;
        }

        if result.iter().any(|(found, _)| *found == version) {
            return Err(Error::new(Kind::RepeatedVersion(version), None));
        }
        result.push((version, entry.into_path()));
    }

    result.sort();
    Ok(result.into_iter().map(|(_, path)| path))
}

fn read_script(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path)
        .map_err(|err| Error::new(Kind::InvalidMigrationFile(path.to_path_buf(), err), None))
}

/// Loads every SQL migration directory under `location`, sorted by version.
pub fn load_sql_migrations(location: impl AsRef<Path>) -> Result<Vec<Migration>, Error> {
    let mut migrations = Vec::new();

    for path in find_migration_files(location, MigrationType::Sql)? {
        let version = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::new(Kind::InvalidName(path.display().to_string()), None))?;

        let up = read_script(&path.join("up.sql"))?;
        let down_path = path.join("down.sql");
        let down = if down_path.is_file() {
            Some(read_script(&down_path)?)
        } else {
            None
        };

        migrations.push(Migration::from_sql(version, &up, down.as_deref())?);
    }

    Ok(migrations)
}
