use strata::include_migration_mods;

include_migration_mods!("tests/mod_migrations");
