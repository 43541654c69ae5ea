use std::path::Path;

use anyhow::{Context, Result};
use strata_core::{load_sql_migrations, Confirm, NonInteractive, Outcome, Runner};

use crate::cli::MigrateArgs;
use crate::config::config;
use crate::prompt::Terminal;

pub fn handle_migration_command(args: MigrateArgs) -> Result<()> {
    run_migrations(
        &args.config,
        args.env_var.as_deref(),
        &args.path,
        &args.table_name,
        args.non_interactive,
    )
}

fn run_migrations(
    config_location: &Path,
    env_var_opt: Option<&str>,
    path: &Path,
    table_name: &str,
    non_interactive: bool,
) -> Result<()> {
    let migrations = load_sql_migrations(path)
        .with_context(|| format!("could not load migrations from {}", path.display()))?;
    let config = config(config_location, env_var_opt)?;

    let mut gate: Box<dyn Confirm> = if non_interactive {
        Box::new(NonInteractive)
    } else {
        Box::new(Terminal)
    };

    let mut runner = Runner::new(&migrations);
    runner.set_migration_table_name(table_name);
    let report = runner.run_with_config(&config, gate.as_mut())?;

    for applied in report.applied_migrations() {
        println!("Migration {} applied successfully.", applied);
    }
    match report.outcome() {
        Outcome::NothingToDo => println!("No new migrations found. Your system is up-to-date."),
        Outcome::Stopped(_) => println!("Migration process stopped by user."),
        _ => println!("All migrations completed."),
    }
    Ok(())
}
