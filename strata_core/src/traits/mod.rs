pub mod sync;

use std::collections::HashSet;

use crate::ddl::quote_ident;
use crate::{error::Kind, AppliedMigration, Error, Migration};

// Sorts the given migrations and returns the ones not recorded in the ledger, in version order.
// Fails if two migrations share a version; applied versions without a matching migration
// and pending migrations older than the latest applied one are only logged.
pub(crate) fn pending_migrations(
    applied: &[AppliedMigration],
    migrations: &[Migration],
) -> Result<Vec<Migration>, Error> {
    let mut migrations = migrations.to_vec();
    migrations.sort();

    for pair in migrations.windows(2) {
        if pair[0] == pair[1] {
            return Err(Error::new(
                Kind::RepeatedVersion(pair[1].version().to_string()),
                None,
            ));
        }
    }

    let applied_versions: HashSet<&str> = applied.iter().map(AppliedMigration::version).collect();

    for app in applied {
        if !migrations.iter().any(|m| m.version() == app.version()) {
            log::warn!(target: "strata_core::traits::missing", "applied migration {} is missing from the migration set", app);
        }
    }

    let current = applied.iter().map(AppliedMigration::version).max();
    match current {
        Some(current) => log::info!("current version: {}", current),
        None => log::info!("ledger is empty, going to apply all migrations"),
    }

    let pending: Vec<Migration> = migrations
        .into_iter()
        .filter(|m| !applied_versions.contains(m.version()))
        .collect();

    if let Some(current) = current {
        for migration in pending.iter().filter(|m| m.version() < current) {
            log::warn!(
                target: "strata_core::traits::out_of_order",
                "migration {} is older than the current version {} and was never applied, applying it now",
                migration,
                current
            );
        }
    }

    Ok(pending)
}

pub(crate) const ASSERT_LEDGER_TABLE_QUERY: &str = "CREATE TABLE IF NOT EXISTS %LEDGER_TABLE_NAME%(
             version VARCHAR(255) NOT NULL PRIMARY KEY,
             apply_time INT NOT NULL);";

pub(crate) const GET_APPLIED_MIGRATIONS_QUERY: &str =
    "SELECT version, apply_time FROM %LEDGER_TABLE_NAME% ORDER BY version ASC;";

pub(crate) const GET_APPLIED_MIGRATION_QUERY: &str =
    "SELECT version, apply_time FROM %LEDGER_TABLE_NAME% WHERE version = ?;";

// ties on apply_time, which only has second granularity, go to the lexically greatest version
pub(crate) const GET_LAST_APPLIED_MIGRATION_QUERY: &str =
    "SELECT version, apply_time FROM %LEDGER_TABLE_NAME% \
    ORDER BY apply_time DESC, version DESC LIMIT 1;";

pub(crate) const DEFAULT_LEDGER_TABLE_NAME: &str = "migration";

pub(crate) fn ledger_query(query: &str, table_name: &str) -> String {
    query.replace("%LEDGER_TABLE_NAME%", &quote_ident(table_name))
}

#[cfg(test)]
mod tests {
    use super::{ledger_query, pending_migrations, Kind, GET_APPLIED_MIGRATIONS_QUERY};
    use crate::{AppliedMigration, Migration};

    fn get_migrations() -> Vec<Migration> {
        vec![
            Migration::from_sql(
                "m250501_000000_initial",
                "CREATE TABLE persons (id int, name varchar(255), city varchar(255));",
                Some("DROP TABLE persons;"),
            )
            .unwrap(),
            Migration::from_sql(
                "m250502_000000_add_cars_table",
                "CREATE TABLE cars (id int, name varchar(255));",
                Some("DROP TABLE cars;"),
            )
            .unwrap(),
            Migration::from_sql(
                "m250503_000000_add_brand_to_cars_table",
                "ALTER TABLE cars ADD brand varchar(255);",
                None,
            )
            .unwrap(),
        ]
    }

    fn applied(migration: &Migration, at: i64) -> AppliedMigration {
        AppliedMigration::new(migration.version(), at)
    }

    #[test]
    fn pending_returns_all_migrations_if_ledger_is_empty() {
        let migrations = get_migrations();
        let result = pending_migrations(&[], &migrations).unwrap();
        assert_eq!(migrations, result);
    }

    #[test]
    fn pending_keeps_version_order_regardless_of_input_order() {
        let mut migrations = get_migrations();
        migrations.reverse();
        let result = pending_migrations(&[], &migrations).unwrap();
        let versions: Vec<&str> = result.iter().map(Migration::version).collect();
        assert_eq!(
            vec![
                "m250501_000000_initial",
                "m250502_000000_add_cars_table",
                "m250503_000000_add_brand_to_cars_table"
            ],
            versions
        );
    }

    #[test]
    fn pending_skips_applied() {
        let migrations = get_migrations();
        let ledger = vec![applied(&migrations[0], 10)];
        let result = pending_migrations(&ledger, &migrations).unwrap();
        assert_eq!(migrations[1..].to_vec(), result);
    }

    #[test]
    fn pending_includes_gaps_older_than_current() {
        let migrations = get_migrations();
        let ledger = vec![applied(&migrations[0], 10), applied(&migrations[2], 20)];
        let result = pending_migrations(&ledger, &migrations).unwrap();
        assert_eq!(vec![migrations[1].clone()], result);
    }

    #[test]
    fn pending_tolerates_applied_versions_missing_from_set() {
        let migrations = get_migrations();
        let ledger = vec![AppliedMigration::new("m240101_000000_gone", 5)];
        let result = pending_migrations(&ledger, &migrations).unwrap();
        assert_eq!(migrations, result);
    }

    #[test]
    fn pending_fails_on_repeated_version() {
        let mut migrations = get_migrations();
        let repeated = migrations[1].clone();
        migrations.push(repeated);

        let err = pending_migrations(&[], &migrations).unwrap_err();
        match err.kind() {
            Kind::RepeatedVersion(version) => {
                assert_eq!("m250502_000000_add_cars_table", version)
            }
            _ => panic!("failed test"),
        }
    }

    #[test]
    fn ledger_query_quotes_table_name() {
        assert_eq!(
            "SELECT version, apply_time FROM `schema_ledger` ORDER BY version ASC;",
            ledger_query(GET_APPLIED_MIGRATIONS_QUERY, "schema_ledger")
        );
    }
}
