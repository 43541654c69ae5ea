use time::OffsetDateTime;

use crate::error::{Kind, WrapMigrationError};
use crate::executor::{Condition, Executor, Value};
use crate::runner::{Outcome, RollbackOutcome};
use crate::traits::{
    ledger_query, pending_migrations, ASSERT_LEDGER_TABLE_QUERY, GET_APPLIED_MIGRATIONS_QUERY,
    GET_APPLIED_MIGRATION_QUERY, GET_LAST_APPLIED_MIGRATION_QUERY,
};
use crate::{AppliedMigration, Confirm, Error, Migration, Prompt, Report, Schema};

/// Read access to the ledger table, implemented by each driver as rows need decoding.
pub trait QueryLedger: Executor {
    fn query_ledger(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<Vec<AppliedMigration>, Self::Error>;
}

/// The record of which migrations are applied, kept in a table of the migrated database.
///
/// A version appears at most once; membership is what makes a migration count as applied.
pub trait Ledger: QueryLedger
where
    Self: Sized,
{
    /// Creates the ledger table if it does not exist yet.
    fn ensure_schema(&mut self, ledger_table_name: &str) -> Result<(), Error> {
        self.execute(&ledger_query(ASSERT_LEDGER_TABLE_QUERY, ledger_table_name))
            .migration_err("error asserting ledger table", None)?;
        Ok(())
    }

    /// Every ledger entry, ordered by version.
    fn list_applied(&mut self, ledger_table_name: &str) -> Result<Vec<AppliedMigration>, Error> {
        self.query_ledger(
            &ledger_query(GET_APPLIED_MIGRATIONS_QUERY, ledger_table_name),
            &[],
        )
        .migration_err("error getting applied migrations", None)
    }

    /// The entry with the latest apply time, ties going to the greatest version.
    fn most_recently_applied(
        &mut self,
        ledger_table_name: &str,
    ) -> Result<Option<AppliedMigration>, Error> {
        let mut migrations = self
            .query_ledger(
                &ledger_query(GET_LAST_APPLIED_MIGRATION_QUERY, ledger_table_name),
                &[],
            )
            .migration_err("error getting last applied migration", None)?;

        Ok(migrations.pop())
    }

    fn is_applied(&mut self, ledger_table_name: &str, version: &str) -> Result<bool, Error> {
        let found = self
            .query_ledger(
                &ledger_query(GET_APPLIED_MIGRATION_QUERY, ledger_table_name),
                &[Value::Text(version.to_string())],
            )
            .migration_err("error looking up applied migration", None)?;

        Ok(!found.is_empty())
    }

    /// Records `version` as applied, failing with [`Kind::DuplicateVersion`] if it already is.
    fn record_applied(
        &mut self,
        ledger_table_name: &str,
        version: &str,
        applied_at: i64,
    ) -> Result<(), Error> {
        if self.is_applied(ledger_table_name, version)? {
            return Err(Error::new(Kind::DuplicateVersion(version.to_string()), None));
        }

        let inserted = self.insert_row(
            ledger_table_name,
            &[
                ("version", Value::Text(version.to_string())),
                ("apply_time", Value::Int(applied_at)),
            ],
        );

        if let Err(err) = inserted {
            // another runner may have recorded it in between
            if self.is_applied(ledger_table_name, version)? {
                return Err(Error::new(Kind::DuplicateVersion(version.to_string()), None));
            }
            return Err(err).migration_err(&format!("error recording migration {}", version), None);
        }
        Ok(())
    }

    /// Removes `version` from the ledger, failing with [`Kind::NotFound`] if it is absent.
    fn remove_applied(&mut self, ledger_table_name: &str, version: &str) -> Result<(), Error> {
        let removed = self
            .delete_rows(ledger_table_name, &Condition::eq("version", version))
            .migration_err(&format!("error removing migration {}", version), None)?;

        if removed == 0 {
            return Err(Error::new(Kind::NotFound(version.to_string()), None));
        }
        Ok(())
    }
}

/// Applies the pending migrations one at a time, recording each right after it succeeds.
pub fn migrate<C, G>(
    conn: &mut C,
    migrations: &[Migration],
    ledger_table_name: &str,
    gate: &mut G,
) -> Result<Report, Error>
where
    C: Ledger,
    G: Confirm + ?Sized,
{
    conn.ensure_schema(ledger_table_name)?;
    let applied = conn.list_applied(ledger_table_name)?;
    let pending = pending_migrations(&applied, migrations)?;

    if pending.is_empty() {
        log::info!("no migrations to apply");
        return Ok(Report::new(Vec::new(), Outcome::NothingToDo));
    }

    log::info!("going to apply {} migrations.", pending.len());

    let mut applied_migrations = Vec::new();
    for migration in pending.iter() {
        if !gate.confirm(&Prompt::Apply(migration.version())) {
            log::info!("stopping at migration: {}, declined by user", migration);
            return Ok(Report::new(
                applied_migrations,
                Outcome::Stopped(migration.version().to_string()),
            ));
        }

        log::info!("applying migration: {} ...", migration);
        migration
            .apply(&mut Schema::new(&mut *conn))
            .map_err(|err| {
                log::error!("migration {} failed: {}", migration, err);
                err.with_report(&applied_migrations)
            })?;

        let applied_at = OffsetDateTime::now_utc().unix_timestamp();
        log::info!("applied migration: {} writing state to db.", migration);
        conn.record_applied(ledger_table_name, migration.version(), applied_at)
            .map_err(|err| err.with_report(&applied_migrations))?;
        applied_migrations.push(AppliedMigration::new(migration.version(), applied_at));
    }

    Ok(Report::new(applied_migrations, Outcome::Completed))
}

/// Reverts the most recently applied migration and removes it from the ledger.
pub fn rollback<C, G>(
    conn: &mut C,
    migrations: &[Migration],
    ledger_table_name: &str,
    gate: &mut G,
) -> Result<RollbackOutcome, Error>
where
    C: Ledger,
    G: Confirm + ?Sized,
{
    conn.ensure_schema(ledger_table_name)?;
    let last = match conn.most_recently_applied(ledger_table_name)? {
        Some(last) => last,
        None => {
            log::info!("no migrations to roll back");
            return Ok(RollbackOutcome::NothingToRollBack);
        }
    };

    // never drop a ledger entry that can't be reverted
    let migration = migrations
        .iter()
        .find(|m| m.version() == last.version())
        .filter(|m| m.is_reversible())
        .ok_or_else(|| Error::new(Kind::MissingScript(last.version().to_string()), None))?;

    if !gate.confirm(&Prompt::Rollback(last.version())) {
        log::info!("rollback of {} cancelled by user", last);
        return Ok(RollbackOutcome::Cancelled(last));
    }

    log::info!("reverting migration: {} ...", migration);
    migration
        .revert(&mut Schema::new(&mut *conn))
        .map_err(|err| {
            log::error!("rollback of {} failed: {}", migration, err);
            err
        })?;

    conn.remove_applied(ledger_table_name, last.version())?;
    log::info!("{} rolled back successfully", last);

    Ok(RollbackOutcome::RolledBack(last))
}
