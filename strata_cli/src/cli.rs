//! Defines the CLI application

use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Parser)]
#[clap(version)]
pub enum Cli {
    /// Run the strata setup hooks to generate the config file
    Setup,

    /// Generate a new migration, named after the current time
    Generate(GenerateArgs),

    /// Apply the pending migrations, asking before each one
    Migrate(MigrateArgs),

    /// Revert the most recently applied migration
    Rollback(MigrateArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Name of the migration, anything that isn't a word character becomes `_`
    pub name: String,

    /// Migrations directory path
    #[clap(short, default_value = "./migrations")]
    pub path: PathBuf,

    /// Generate a Rust module with `up` and `down` functions instead of SQL scripts
    #[clap(long)]
    pub rust: bool,
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Config file location
    #[clap(short, default_value = "./strata.toml")]
    pub config: PathBuf,

    /// Migrations directory path
    #[clap(short, default_value = "./migrations")]
    pub path: PathBuf,

    /// Load database from the given environment variable
    #[clap(short)]
    pub env_var: Option<String>,

    /// Set migration table name
    #[clap(long, default_value = "migration")]
    pub table_name: String,

    /// Don't ask for confirmation
    #[clap(long)]
    pub non_interactive: bool,
}
