//! Main entry point for the strata cli tool

mod cli;
mod config;
mod generate;
mod migrate;
mod prompt;
mod rollback;
mod setup;

use anyhow::Error;
use clap::Parser;
use cli::Cli;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

fn main() -> Result<(), Error> {
    human_panic::setup_panic!();

    let mut builder = Builder::new();
    builder
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, LevelFilter::Info)
        .target(Target::Stdout)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    match args {
        Cli::Setup => setup::handle_setup()?,
        Cli::Generate(args) => generate::handle_generate_command(args)?,
        Cli::Migrate(args) => migrate::handle_migration_command(args)?,
        Cli::Rollback(args) => rollback::handle_rollback_command(args)?,
    }
    Ok(())
}
