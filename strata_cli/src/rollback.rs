use std::path::Path;

use anyhow::{Context, Result};
use strata_core::{load_sql_migrations, Confirm, NonInteractive, RollbackOutcome, Runner};

use crate::cli::MigrateArgs;
use crate::config::config;
use crate::prompt::Terminal;

pub fn handle_rollback_command(args: MigrateArgs) -> Result<()> {
    run_rollback(
        &args.config,
        args.env_var.as_deref(),
        &args.path,
        &args.table_name,
        args.non_interactive,
    )
}

fn run_rollback(
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
    match runner.rollback_with_config(&config, gate.as_mut())? {
        RollbackOutcome::RolledBack(migration) => {
            println!("{} rolled back successfully", migration)
        }
        RollbackOutcome::NothingToRollBack => println!("No migrations to roll back"),
        RollbackOutcome::Cancelled(_) => println!("Rollback cancelled by user."),
    }
    Ok(())
}
