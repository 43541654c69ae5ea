use std::path::Path;

use anyhow::{Context, Result};
use strata_core::config::Config;

/// Reads the database config from `env_var` when given, from the config file otherwise
pub fn config(config_location: &Path, env_var_opt: Option<&str>) -> Result<Config> {
    if let Some(env_var) = env_var_opt {
        Config::from_env_var(env_var).context("could not read the database url")
    } else {
        Config::from_file_location(config_location).context("could not parse the config file")
    }
}
