use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::cli::GenerateArgs;

const UP_SQL: &str = "-- Write your UP migration SQL here\n";
const DOWN_SQL: &str = "-- Write your DOWN migration SQL here\n";

const RUST_MODULE: &str = "use strata::{Error, Schema};

pub fn up(schema: &mut Schema) -> Result<(), Error> {
    todo!()
}

// remove to make this migration irreversible
pub fn down(schema: &mut Schema) -> Result<(), Error> {
    todo!()
}
";

pub fn handle_generate_command(args: GenerateArgs) -> Result<()> {
    let name = migration_name(&args.name, OffsetDateTime::now_utc())?;

    if args.rust {
        create_rust_migration(&args.path, &name)
    } else {
        create_sql_migration(&args.path, &name)
    }
}

fn migration_name(name: &str, now: OffsetDateTime) -> Result<String> {
    let slug = sanitize_name(name);
    if slug.is_empty() {
        bail!("migration name {:?} has no usable characters", name);
    }

    let timestamp = now
        .format(format_description!(
            "[year repr:last_two][month][day]_[hour][minute][second]"
        ))
        .context("could not format the migration timestamp")?;
    Ok(format!("m{}_{}", timestamp, slug))
}

fn sanitize_name(name: &str) -> String {
    let lowercase = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase();

    let mut result = String::with_capacity(lowercase.len());
    let mut last_was_underscore = false;

    for c in lowercase.chars() {
        if c == '_' {
            if !last_was_underscore {
                result.push(c);
            }
            last_was_underscore = true;
        } else {
            result.push(c);
            last_was_underscore = false;
        }
    }

    result.trim_matches('_').to_string()
}

fn create_dir(base_path: &Path) -> Result<()> {
    if !base_path.exists() {
        fs::create_dir_all(base_path).with_context(|| {
            format!("Failed to create migrations directory at {:?}", base_path)
        })?;
    }
    Ok(())
}

fn create_sql_migration(base_path: &Path, migration_name: &str) -> Result<()> {
    create_dir(base_path)?;

    let migration_path = base_path.join(migration_name);
    if migration_path.exists() {
        bail!("Migration directory already exists at {:?}", migration_path);
    }

    fs::create_dir(&migration_path).with_context(|| {
        format!("Failed to create migration directory at {:?}", migration_path)
    })?;
    create_migration_file(&migration_path.join("up.sql"), UP_SQL)?;
    create_migration_file(&migration_path.join("down.sql"), DOWN_SQL)?;

    println!("Created migration: {}", migration_name);
    println!("Migration directory: {:?}", migration_path);
    println!("Don't forget to write your migration SQL in the up.sql and down.sql files!");

    Ok(())
}

fn create_rust_migration(base_path: &Path, migration_name: &str) -> Result<()> {
    create_dir(base_path)?;

    let module_path = base_path.join(format!("{}.rs", migration_name));
    if module_path.exists() {
        bail!("Migration module already exists at {:?}", module_path);
    }
    create_migration_file(&module_path, RUST_MODULE)?;

    println!("Created migration: {}", migration_name);
    println!("Migration module: {:?}", module_path);

    Ok(())
}

fn create_migration_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write migration file at {:?}", path))
}
